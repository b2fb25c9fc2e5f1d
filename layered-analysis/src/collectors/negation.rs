//! Marks tokens inside negated chunks ("kein ICE nach Köln").

use layered_conversation::{hints, Token};
use layered_text::{keys, AnalyzedText, SpanId, SpanKinds};

use crate::processor::{message_idx, relative};
use crate::{Phase, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "token.negation";

/// Message-relative bounds of the negated chunks of `section`.
fn negated_ranges(text: &AnalyzedText, section: SpanId) -> Vec<(usize, usize)> {
    text.enclosed_ids(section, SpanKinds::CHUNK)
        .into_iter()
        .filter(|id| text.span(*id).annotation(&keys::NEGATION) == Some(&true))
        .map(|id| relative(text, section, id))
        .collect()
}

fn is_within(token: &Token, msg_idx: i32, (start, end): (usize, usize)) -> bool {
    token.message_idx == msg_idx && start <= token.start && token.end <= end
}

/// Adds the `negated` hint to tokens covered by a negated chunk.
#[derive(Debug, Default)]
pub struct NegationMarker;

impl NegationMarker {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for NegationMarker {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Post
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, idx) in ctx.collected_sections() {
            let msg_idx = message_idx(idx);
            for range in negated_ranges(ctx.text, section) {
                for token in ctx.analysis.tokens.iter_mut() {
                    if is_within(token, msg_idx, range) && token.add_hint(hints::NEGATED) {
                        tracing::debug!(?token, "negated");
                    }
                }
            }
        }
        Ok(())
    }
}
