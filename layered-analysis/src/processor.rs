//! Processing stages and their ordering.

use layered_conversation::{message_sections, Analysis, Conversation, IncrementalScope};
use layered_text::{AnalyzedText, SpanId};

use crate::ProcessResult;

/// Coarse position of a stage in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pre,
    Nlp,
    LangDetect,
    Pos,
    /// Lemmatisation, stemming and stopword detection.
    Lemma,
    Negation,
    Ner,
    Extraction,
    Post,
}

impl Phase {
    pub fn weight(self) -> i32 {
        match self {
            Phase::Pre => -500,
            Phase::Nlp => -100,
            Phase::LangDetect => -90,
            Phase::Pos => -50,
            Phase::Lemma => -40,
            Phase::Negation => -30,
            Phase::Ner => -20,
            Phase::Extraction => 0,
            Phase::Post => 100,
        }
    }
}

/// Everything a stage may read or write during one pass.
pub struct ProcessingContext<'a> {
    pub conversation: &'a Conversation,
    pub text: &'a mut AnalyzedText,
    pub analysis: &'a mut Analysis,
    pub scope: IncrementalScope,
}

impl<'a> ProcessingContext<'a> {
    /// Sections of the messages collectors work on in this pass: new user
    /// messages, with their message index.
    pub fn collected_sections(&self) -> Vec<(SpanId, usize)> {
        message_sections(self.text)
            .into_iter()
            .filter(|(_, idx)| {
                self.conversation
                    .messages
                    .get(*idx)
                    .map_or(false, |message| self.scope.collects(*idx, message))
            })
            .collect()
    }
}

/// A pipeline stage.
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    fn phase(&self) -> Phase;

    /// Offset within the phase; lower runs first.
    fn weight_offset(&self) -> i32 {
        0
    }

    fn weight(&self) -> i32 {
        self.phase().weight() + self.weight_offset()
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()>;
}

/// Message-relative offsets of `span` within `section`.
pub(crate) fn relative(text: &AnalyzedText, section: SpanId, span: SpanId) -> (usize, usize) {
    let base = text.span(section).start();
    let span = text.span(span);
    (span.start() - base, span.end() - base)
}

/// The message index as stored on a domain token.
pub(crate) fn message_idx(idx: usize) -> i32 {
    i32::try_from(idx).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let phases = [
            Phase::Pre,
            Phase::Nlp,
            Phase::LangDetect,
            Phase::Pos,
            Phase::Lemma,
            Phase::Negation,
            Phase::Ner,
            Phase::Extraction,
            Phase::Post,
        ];
        assert!(phases.windows(2).all(|w| w[0].weight() < w[1].weight()));
    }
}
