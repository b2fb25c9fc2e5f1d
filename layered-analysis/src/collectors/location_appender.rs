//! Extends location chunks with a following location type chunk.
//!
//! NER models often tag "München" and "Hauptbahnhof" separately; this stage
//! adds a chunk for "München Hauptbahnhof" so the collectors see a single
//! place. Organisations are accepted as the first part too, since station
//! names are regularly mistagged as such.

use layered_text::tags::{ner_type, NerSet, NerTag};
use layered_text::{
    combine, keys, nlp, AnalyzedText, Probability, SpanId, SpanKind, SpanKinds, Value,
};

use crate::{NerConfig, Phase, ProcessError, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "ner.location.typeappender";

/// An open location chunk waiting for a follow-up chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChunkState {
    chunk: SpanId,
    end: usize,
    /// Probability of the NER value that opened the state.
    probability: Probability,
}

/// Result of offering a span to a [`ChunkState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    /// The span was not taken; the state stays open.
    Pass,
    /// A word ran past the chunk; the state is dropped.
    Close,
    /// `next` follows the chunk: add a chunk covering both.
    Merge { next: SpanId },
    /// `next` ends with the chunk: add a location value to the chunk itself.
    Retype { next: SpanId },
}

impl Step {
    fn connects(self) -> bool {
        matches!(self, Step::Merge { .. } | Step::Retype { .. })
    }
}

impl ChunkState {
    /// Open a state for a chunk tagged with one of the `context` types or tags.
    pub(crate) fn open(text: &AnalyzedText, chunk: SpanId, context: &NerSet) -> Option<Self> {
        let span = text.span(chunk);
        let ner = span
            .values(&keys::NER)
            .iter()
            .find(|v| context.matches(&v.value))?;
        if !nlp::is_of_ner(span, context, None) {
            return None;
        }
        Some(Self {
            chunk,
            end: span.end(),
            probability: ner.probability,
        })
    }

    pub(crate) fn step(
        &self,
        text: &AnalyzedText,
        id: SpanId,
        accepted: &NerSet,
    ) -> ProcessResult<Step> {
        let span = text.span(id);
        match span.kind() {
            SpanKind::Token if span.end() <= self.end => Ok(Step::Pass),
            SpanKind::Token => Ok(Step::Close),
            SpanKind::Chunk => {
                if !nlp::is_of_ner(span, accepted, None) {
                    Ok(Step::Pass)
                } else if span.start() >= self.end {
                    Ok(Step::Merge { next: id })
                } else if span.end() == self.end
                    && !nlp::is_of_ner(text.span(self.chunk), accepted, None)
                {
                    Ok(Step::Retype { next: id })
                } else {
                    Ok(Step::Pass)
                }
            }
            kind @ (SpanKind::Text | SpanKind::Section | SpanKind::Sentence) => Err(
                ProcessError::invariant(STAGE, format!("unexpected {:?} span offered", kind)),
            ),
        }
    }

    /// Fused probability of the state's value and `next` being accepted.
    fn merged_probability(&self, text: &AnalyzedText, next: SpanId, accepted: &NerSet) -> Probability {
        combine(
            self.probability,
            Probability::new(nlp::ner_probability(text.span(next), accepted)),
        )
    }
}

pub struct LocationTypeAppender {
    context: NerSet,
    accepted: NerSet,
}

impl Default for LocationTypeAppender {
    fn default() -> Self {
        Self::new(&NerConfig::default())
    }
}

impl LocationTypeAppender {
    pub fn new(config: &NerConfig) -> Self {
        Self {
            context: NerSet::of_types(&[ner_type::LOCATION, ner_type::ORGANIZATION]),
            accepted: config.location_append_set(),
        }
    }

    fn append(&self, text: &mut AnalyzedText, section: SpanId) -> ProcessResult<()> {
        let mut open: Vec<ChunkState> = Vec::new();

        let mut cursor = text.enclosed(section, SpanKinds::CHUNK_AND_TOKEN);
        while let Some(id) = cursor.next(text) {
            let mut taken = false;
            let mut still_open = Vec::with_capacity(open.len());
            for state in open.drain(..) {
                let step = state.step(text, id, &self.accepted)?;
                match step {
                    Step::Pass => still_open.push(state),
                    Step::Close => {}
                    Step::Merge { next } => self.merge(text, &state, next)?,
                    Step::Retype { next } => self.retype(text, &state, next),
                }
                taken |= step.connects();
            }
            open = still_open;

            if !taken && text.span(id).kind() == SpanKind::Chunk {
                open.extend(ChunkState::open(text, id, &self.context));
            }
        }
        Ok(())
    }

    fn merge(&self, text: &mut AnalyzedText, state: &ChunkState, next: SpanId) -> ProcessResult<()> {
        let probability = state.merged_probability(text, next, &self.accepted);
        let (chunk, connected) = (text.span(state.chunk), text.span(next));
        let (chunk_lemma, next_lemma) = (nlp::lemma(chunk), nlp::lemma(connected));
        let lemma = if chunk_lemma.is_some() || next_lemma.is_some() {
            Some(format!(
                "{}{}{}",
                chunk_lemma.unwrap_or(text.span_text(state.chunk)),
                text.slice(chunk.end(), connected.start()),
                next_lemma.unwrap_or(text.span_text(next)),
            ))
        } else {
            None
        };
        let (start, end) = (chunk.start(), connected.end());

        let merged = text.add_chunk(text.root(), start, end)?;
        let value = Value::with_probability(
            NerTag::new(ner_type::LOCATION, ner_type::LOCATION),
            probability,
        );
        tracing::debug!(start, end, chunk = text.span_text(merged), ?value, ?lemma, "add merged location");
        let span = text.span_mut(merged);
        span.add_value(&keys::NER, value);
        if let Some(lemma) = lemma {
            span.set_annotation(&keys::LEMMA, lemma);
        }
        Ok(())
    }

    fn retype(&self, text: &mut AnalyzedText, state: &ChunkState, next: SpanId) {
        let probability = state.merged_probability(text, next, &self.accepted);
        let lemma = match (nlp::lemma(text.span(state.chunk)), nlp::lemma(text.span(next))) {
            (None, Some(next_lemma)) => Some(format!(
                "{}{}",
                text.slice(text.span(state.chunk).start(), text.span(next).start()),
                next_lemma
            )),
            _ => None,
        };
        tracing::debug!(chunk = text.span_text(state.chunk), ?probability, ?lemma, "add location type");

        let span = text.span_mut(state.chunk);
        span.add_value(
            &keys::NER,
            Value::with_probability(NerTag::new(ner_type::LOCATION, ner_type::LOCATION), probability),
        );
        if let Some(lemma) = lemma {
            span.set_annotation(&keys::LEMMA, lemma);
        }
    }
}

impl Processor for LocationTypeAppender {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Extraction
    }

    /// Before the collectors of the extraction phase.
    fn weight_offset(&self) -> i32 {
        -10
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, _) in ctx.collected_sections() {
            self.append(ctx.text, section)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated() -> (AnalyzedText, SpanId, SpanId, SpanId) {
        let mut text = AnalyzedText::new("Köln Messe Deutz");
        let section = text.add_section(0, text.text().len()).unwrap();
        let koeln = text.add_chunk(section, 0, 5).unwrap();
        text.span_mut(koeln).add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.9));
        let messe = text.add_chunk(section, 6, 11).unwrap();
        text.span_mut(messe).add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.5));
        text.tokenize(section).unwrap();
        (text, section, koeln, messe)
    }

    #[test]
    fn test_step_outcomes() {
        let (text, section, koeln, messe) = annotated();
        let accepted = NerSet::location();
        let state = ChunkState::open(&text, koeln, &NerSet::location()).unwrap();

        let word = text.enclosed_ids(section, SpanKinds::TOKEN);
        assert_eq!(state.step(&text, word[0], &accepted).unwrap(), Step::Pass);
        assert_eq!(state.step(&text, word[1], &accepted).unwrap(), Step::Close);
        assert_eq!(
            state.step(&text, messe, &accepted).unwrap(),
            Step::Merge { next: messe }
        );
        assert!(state.step(&text, section, &accepted).is_err());
    }

    #[test]
    fn test_unknown_probabilities_stay_unknown() {
        let mut text = AnalyzedText::new("Köln Messe");
        let section = text.add_section(0, text.text().len()).unwrap();
        let koeln = text.add_chunk(section, 0, 5).unwrap();
        text.span_mut(koeln).add_value(&keys::NER, Value::unknown(NerTag::location("LOC")));
        let state = ChunkState::open(&text, koeln, &NerSet::location()).unwrap();
        let messe = text.add_chunk(section, 6, 11).unwrap();
        text.span_mut(messe).add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.5));

        // A single unknown side counts as certain.
        assert_eq!(
            state.merged_probability(&text, messe, &NerSet::location()),
            Probability::new(1.0)
        );
    }
}
