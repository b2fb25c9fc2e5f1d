//! Keyword tokens for noun phrases containing interesting terms.
//!
//! Interesting terms are annotated on nouns and adjectives by upstream
//! extractors (one per reference corpus, the `source`). A phrase grows over
//! consecutive nouns and adjectives, bridged by adpositions ("Fahrkarte für
//! Kinder"), and is cut back to its last noun.

use std::collections::BTreeMap;

use layered_conversation::{hints, Token, TokenType};
use layered_text::tags::ADPOSITIONS;
use layered_text::{
    combine_confidence, keys, nlp, AnalyzedText, AnnotationKey, SpanId, SpanKind, SpanKinds,
};

use crate::processor::message_idx;
use crate::{Phase, ProcessError, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "keyword.interestingphrasecollector";

/// A term of a reference corpus matching a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestingTerm {
    pub source: String,
    pub term: String,
}

impl InterestingTerm {
    pub fn new(source: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            term: term.into(),
        }
    }
}

/// Interesting terms of a Token span.
pub const INTERESTING_TERM: AnnotationKey<InterestingTerm> =
    AnnotationKey::new("keyword.interesting_term");

#[derive(Debug)]
struct PhraseWord {
    end: usize,
    noun: bool,
    /// Noun or adjective; adpositions only connect.
    content: bool,
    /// Best confidence per source.
    scores: BTreeMap<String, f64>,
}

#[derive(Debug)]
struct Phrase {
    start: usize,
    words: Vec<PhraseWord>,
}

impl Phrase {
    fn end(&self) -> usize {
        self.words.last().map_or(self.start, |w| w.end)
    }

    /// Keyword token for the phrase, if it qualifies.
    fn into_token(self, text: &AnalyzedText, section: SpanId, msg_idx: usize) -> Option<Token> {
        let last_noun = self.words.iter().rposition(|w| w.noun)?;
        let contributing: Vec<&PhraseWord> =
            self.words[..=last_noun].iter().filter(|w| w.content).collect();

        let mut sources: BTreeMap<&str, f64> = BTreeMap::new();
        for word in &contributing {
            for (source, score) in &word.scores {
                *sources.entry(source.as_str()).or_default() += score;
            }
        }
        let confidence = sources
            .values()
            .map(|sum| sum / contributing.len() as f64)
            .reduce(combine_confidence)
            .unwrap_or(0.0);
        let ranked = contributing
            .iter()
            .filter(|w| w.scores.values().any(|s| *s > 0.0))
            .count();
        let ranking = ranked as f64 / contributing.len() as f64;

        let base = text.span(section).start();
        let (start, end) = (self.start - base, self.words[last_noun].end - base);
        tracing::debug!(start, end, confidence, ranking, "interesting phrase");
        if ranking <= 0.0 || confidence <= 0.0 {
            return None;
        }
        Some(
            Token::new(message_idx(msg_idx), start, end, TokenType::Keyword)
                .with_value(text.slice(self.start, self.words[last_noun].end))
                .with_confidence(confidence as f32)
                .with_hint(hints::INTERESTING_TERM),
        )
    }
}

fn scores(text: &AnalyzedText, word: SpanId) -> BTreeMap<String, f64> {
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    for value in text.span(word).values(&INTERESTING_TERM) {
        let p = value.probability.or(1.0);
        let best = scores.entry(value.value.source.clone()).or_default();
        *best = best.max(p);
    }
    scores
}

#[derive(Debug, Default)]
pub struct InterestingPhraseCollector;

impl InterestingPhraseCollector {
    pub fn new() -> Self {
        Self
    }

    fn collect(&self, text: &AnalyzedText, section: SpanId, msg_idx: usize) -> ProcessResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut phrase: Option<Phrase> = None;
        let close = |phrase: &mut Option<Phrase>, tokens: &mut Vec<Token>| {
            if let Some(done) = phrase.take() {
                tokens.extend(done.into_token(text, section, msg_idx));
            }
        };

        let kinds = SpanKinds::CHUNK_AND_TOKEN.with(SpanKind::Sentence);
        let mut cursor = text.enclosed(section, kinds);
        while let Some(id) = cursor.next(text) {
            let span = text.span(id);
            match span.kind() {
                SpanKind::Sentence => close(&mut phrase, &mut tokens),
                SpanKind::Chunk => {
                    let nominal = span.values(&keys::PHRASE).iter().any(|v| v.value.is_nominal());
                    let after_phrase = phrase.as_ref().map_or(false, |p| span.start() > p.end());
                    if nominal && after_phrase {
                        close(&mut phrase, &mut tokens);
                    }
                }
                SpanKind::Token => {
                    let noun = nlp::is_noun(span);
                    let content = noun || nlp::is_adjective(span);
                    if content {
                        let word = PhraseWord {
                            end: span.end(),
                            noun,
                            content,
                            scores: scores(text, id),
                        };
                        phrase
                            .get_or_insert_with(|| Phrase {
                                start: span.start(),
                                words: Vec::new(),
                            })
                            .words
                            .push(word);
                    } else {
                        match phrase.as_mut() {
                            Some(open) if nlp::is_of_pos(span, &ADPOSITIONS, None) => {
                                open.words.push(PhraseWord {
                                    end: span.end(),
                                    noun: false,
                                    content: false,
                                    scores: BTreeMap::new(),
                                });
                            }
                            _ => close(&mut phrase, &mut tokens),
                        }
                    }
                }
                kind @ (SpanKind::Text | SpanKind::Section) => {
                    return Err(ProcessError::invariant(
                        STAGE,
                        format!("unexpected {:?} span enclosed in a section", kind),
                    ));
                }
            }
        }
        close(&mut phrase, &mut tokens);
        Ok(tokens)
    }
}

impl Processor for InterestingPhraseCollector {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Extraction
    }

    /// After the interesting term extractors of the extraction phase.
    fn weight_offset(&self) -> i32 {
        1
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, msg_idx) in ctx.collected_sections() {
            let tokens = self.collect(ctx.text, section, msg_idx)?;
            ctx.analysis.add_tokens(tokens);
        }
        Ok(())
    }
}
