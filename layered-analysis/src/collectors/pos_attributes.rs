//! Attribute tokens for adjectives ("günstige Verbindung", "Ticket ist teuer").

use std::collections::BTreeSet;

use layered_conversation::{Token, TokenType};
use layered_text::tags::ADJECTIVES;
use layered_text::{nlp, AnalyzedText, SpanId, SpanKinds};

use crate::processor::{message_idx, relative};
use crate::{Phase, PosConfig, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "token.pos";

#[derive(Debug, Default)]
pub struct PosCollector {
    /// Lowercased.
    ignored: BTreeSet<String>,
}

impl PosCollector {
    pub fn new(config: &PosConfig) -> Self {
        Self {
            ignored: config
                .ignored_adjectives
                .iter()
                .map(|a| a.to_lowercase())
                .collect(),
        }
    }

    fn is_ignored(&self, word: &str, lemma: Option<&str>) -> bool {
        self.ignored.contains(&word.to_lowercase())
            || lemma.map_or(false, |l| self.ignored.contains(&l.to_lowercase()))
    }

    fn collect(&self, text: &AnalyzedText, section: SpanId, msg_idx: usize) -> Vec<Token> {
        let mut tokens = Vec::new();
        for id in text.enclosed_ids(section, SpanKinds::TOKEN) {
            let span = text.span(id);
            let word = text.span_text(id);
            if !nlp::is_adjective(span) || nlp::is_stopword(span) || !nlp::is_alpha(word) {
                continue;
            }
            let lemma = nlp::lemma(span);
            if self.is_ignored(word, lemma) {
                tracing::trace!(word, "ignored adjective");
                continue;
            }
            let (start, end) = relative(text, section, id);
            tokens.push(
                Token::new(message_idx(msg_idx), start, end, TokenType::Attribute)
                    .with_value(lemma.unwrap_or(word))
                    .with_confidence(nlp::pos_probability(span, &ADJECTIVES) as f32),
            );
        }
        tokens
    }
}

impl Processor for PosCollector {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Extraction
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, msg_idx) in ctx.collected_sections() {
            let tokens = self.collect(ctx.text, section, msg_idx);
            tracing::debug!(msg_idx, count = tokens.len(), "attribute tokens");
            ctx.analysis.add_tokens(tokens);
        }
        Ok(())
    }
}
