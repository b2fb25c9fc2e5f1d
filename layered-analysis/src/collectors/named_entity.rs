//! Named entity tokens from NER annotated chunks.
//!
//! Overlapping chunks of the same token type fold into one token covering
//! all of them. A token is only emitted if it covers a content word (a noun
//! or adjective), so entities made up of function words alone are dropped.

use std::collections::BTreeMap;
use std::str::FromStr;

use layered_conversation::{hints, Token, TokenType};
use layered_text::tags::{ner_type, NerTag, PosSet, ADJECTIVES, NOUNS};
use layered_text::{combine_f32, keys, nlp, AnalyzedText, Probability, SpanId, SpanKind, SpanKinds};

use crate::processor::{message_idx, relative};
use crate::{NerConfig, Phase, ProcessError, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "token.ner";

/// Marks in-flight tokens covering a content word.
const INTERESTING_HINT: &str = "_internal.interestingWordNamedEntity";

/// Domain type of an NER tag.
///
/// Known NER types map directly; otherwise the type, and for untyped tags
/// the tag itself, may name a [`TokenType`]. Everything else is an `Entity`.
pub fn token_type_of(tag: &NerTag) -> TokenType {
    fn lookup(name: &str) -> Option<TokenType> {
        match name {
            ner_type::LOCATION => Some(TokenType::Place),
            ner_type::PERSON => Some(TokenType::Person),
            ner_type::ORGANIZATION => Some(TokenType::Organization),
            other => TokenType::from_str(other).ok(),
        }
    }
    lookup(&tag.ner_type)
        .or_else(|| if tag.is_untyped() { lookup(&tag.tag) } else { None })
        .unwrap_or(TokenType::Entity)
}

pub struct NamedEntityCollector {
    default_probability: f32,
    interesting: PosSet,
}

impl Default for NamedEntityCollector {
    fn default() -> Self {
        Self::new(&NerConfig::default())
    }
}

impl NamedEntityCollector {
    pub fn new(config: &NerConfig) -> Self {
        Self {
            default_probability: config.default_probability,
            interesting: PosSet::union(&[&NOUNS, &ADJECTIVES]),
        }
    }

    fn probability(&self, probability: Probability) -> f32 {
        match probability {
            Probability::Unknown => self.default_probability,
            Probability::Known(p) => p as f32,
        }
    }

    fn collect(&self, text: &AnalyzedText, section: SpanId, msg_idx: usize) -> ProcessResult<Vec<Token>> {
        let section_text = text.span_text(section);
        let mut active: BTreeMap<TokenType, Token> = BTreeMap::new();
        let mut tokens = Vec::new();
        let mut warned_missing_pos = false;

        let mut cursor = text.enclosed(section, SpanKinds::CHUNK_AND_TOKEN);
        while let Some(id) = cursor.next(text) {
            let span = text.span(id);
            let (start, end) = relative(text, section, id);
            match span.kind() {
                SpanKind::Token => {
                    let content_word = if !span.values(&keys::POS).is_empty() {
                        nlp::is_of_pos(span, &self.interesting, None)
                    } else if nlp::has_alphanumeric(text.span_text(id)) {
                        if !warned_missing_pos {
                            tracing::warn!(
                                msg_idx,
                                "message contains alphanumeric words without POS tags, keeping all named entities"
                            );
                            warned_missing_pos = true;
                        }
                        true
                    } else {
                        false
                    };
                    if content_word {
                        active
                            .values_mut()
                            .filter(|t| t.end >= end)
                            .for_each(|t| {
                                t.add_hint(INTERESTING_HINT);
                            });
                    }
                }
                SpanKind::Chunk => {
                    let chunk_text = text.span_text(id);
                    let value = nlp::lemma(span).unwrap_or(chunk_text);
                    for ner in span.values(&keys::NER) {
                        let token_type = token_type_of(&ner.value);
                        tracing::debug!(
                            start,
                            end,
                            chunk = chunk_text,
                            tag = %ner.value.tag,
                            ?token_type,
                            "named entity"
                        );
                        let confidence = self.probability(ner.probability);
                        let token = match active.remove(&token_type) {
                            Some(mut token) if token.end > start => {
                                if end > token.end {
                                    token.end = end;
                                    token.set_value(&section_text[token.start..end]);
                                }
                                token.set_confidence(combine_f32(token.confidence(), confidence));
                                token
                            }
                            previous => {
                                if let Some(mut previous) = previous {
                                    if previous.remove_hint(INTERESTING_HINT) {
                                        tokens.push(previous);
                                    }
                                }
                                Token::new(message_idx(msg_idx), start, end, token_type)
                                    .with_value(value)
                                    .with_confidence(confidence)
                            }
                        };
                        let token = token.with_hint(hints::entity_type(&ner.value.tag));
                        active.insert(token_type, token);
                    }
                }
                kind @ (SpanKind::Text | SpanKind::Section | SpanKind::Sentence) => {
                    return Err(ProcessError::invariant(
                        STAGE,
                        format!("unexpected {:?} span enclosed in a section", kind),
                    ));
                }
            }
        }

        tokens.extend(
            active
                .into_values()
                .filter_map(|mut t| if t.remove_hint(INTERESTING_HINT) { Some(t) } else { None }),
        );
        tokens.sort_by(Token::position_cmp);
        Ok(tokens)
    }
}

impl Processor for NamedEntityCollector {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Extraction
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, msg_idx) in ctx.collected_sections() {
            let tokens = self.collect(ctx.text, section, msg_idx)?;
            ctx.analysis.add_tokens(tokens);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_of() {
        assert_eq!(token_type_of(&NerTag::location("LOC")), TokenType::Place);
        assert_eq!(token_type_of(&NerTag::new("PER", ner_type::PERSON)), TokenType::Person);
        assert_eq!(token_type_of(&NerTag::new("ORG", ner_type::ORGANIZATION)), TokenType::Organization);
        assert_eq!(token_type_of(&NerTag::new("X", "Train")), TokenType::Train);
        assert_eq!(token_type_of(&NerTag::of_tag("Product")), TokenType::Product);
        assert_eq!(token_type_of(&NerTag::new("loc", ner_type::MISC)), TokenType::Place);
        // typed tags are not looked up by tag
        assert_eq!(token_type_of(&NerTag::new("Product", ner_type::EVENT)), TokenType::Entity);
        assert_eq!(token_type_of(&NerTag::of_tag("B-MISC")), TokenType::Entity);
    }
}
