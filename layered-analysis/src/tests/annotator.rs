//! Deterministic stand-in for the upstream NLP annotators.

use std::collections::BTreeMap;

use layered_conversation::{Analysis, Conversation, Message};
use layered_text::tags::{NerTag, Pos, PosTag};
use layered_text::{keys, Value};

use crate::{InterestingTerm, Phase, Pipeline, ProcessResult, ProcessingContext, Processor, INTERESTING_TERM};

/// Tokenizes the collected sections and annotates words and phrases by their text.
#[derive(Default)]
pub struct FixtureAnnotator {
    pos: BTreeMap<&'static str, Vec<(Pos, f64)>>,
    lemmas: BTreeMap<&'static str, &'static str>,
    terms: BTreeMap<&'static str, Vec<(&'static str, f64)>>,
    entities: Vec<(&'static str, Value<NerTag>)>,
    negated: Vec<&'static str>,
}

impl FixtureAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(mut self, word: &'static str, pos: Pos) -> Self {
        self.pos.entry(word).or_default().push((pos, 1.0));
        self
    }

    pub fn nouns(mut self, words: &[&'static str]) -> Self {
        for word in words {
            self = self.pos(*word, Pos::CommonNoun);
        }
        self
    }

    pub fn lemma(mut self, word: &'static str, lemma: &'static str) -> Self {
        self.lemmas.insert(word, lemma);
        self
    }

    pub fn term(mut self, word: &'static str, source: &'static str, p: f64) -> Self {
        self.terms.entry(word).or_default().push((source, p));
        self
    }

    pub fn entity(mut self, phrase: &'static str, tag: NerTag, p: f64) -> Self {
        self.entities.push((phrase, Value::new(tag, p)));
        self
    }

    pub fn unscored_entity(mut self, phrase: &'static str, tag: NerTag) -> Self {
        self.entities.push((phrase, Value::unknown(tag)));
        self
    }

    pub fn negated(mut self, phrase: &'static str) -> Self {
        self.negated.push(phrase);
        self
    }

    /// The standard pipeline with this annotator in front.
    pub fn pipeline(self) -> Pipeline {
        Pipeline::standard().add_stage(Box::new(self))
    }
}

impl Processor for FixtureAnnotator {
    fn name(&self) -> &str {
        "nlp.fixture"
    }

    fn phase(&self) -> Phase {
        Phase::Nlp
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, _) in ctx.collected_sections() {
            for word in ctx.text.tokenize(section)? {
                let surface = ctx.text.span_text(word).to_string();
                let span = ctx.text.span_mut(word);
                for (pos, p) in self.pos.get(surface.as_str()).into_iter().flatten() {
                    span.add_value(&keys::POS, Value::new(PosTag::of_pos(format!("{:?}", pos), *pos), *p));
                }
                if let Some(lemma) = self.lemmas.get(surface.as_str()) {
                    span.set_annotation(&keys::LEMMA, lemma.to_string());
                }
                for (source, p) in self.terms.get(surface.as_str()).into_iter().flatten() {
                    span.add_value(
                        &INTERESTING_TERM,
                        Value::new(InterestingTerm::new(*source, surface.to_lowercase()), *p),
                    );
                }
            }

            let content = ctx.text.span_text(section).to_string();
            for (phrase, value) in &self.entities {
                for (start, _) in content.match_indices(phrase) {
                    let chunk = ctx.text.add_chunk(section, start, start + phrase.len())?;
                    let span = ctx.text.span_mut(chunk);
                    span.add_value(&keys::NER, value.clone());
                    if let Some(lemma) = self.lemmas.get(phrase) {
                        span.set_annotation(&keys::LEMMA, lemma.to_string());
                    }
                }
            }
            for phrase in &self.negated {
                for (start, _) in content.match_indices(phrase) {
                    let chunk = ctx.text.add_chunk(section, start, start + phrase.len())?;
                    ctx.text.span_mut(chunk).set_annotation(&keys::NEGATION, true);
                }
            }
        }
        Ok(())
    }
}

/// A single user message.
pub fn user_says(content: &str) -> Conversation {
    Conversation::new(vec![Message::user(content)])
}

/// Tokens of `analysis` as `Debug` lines.
pub fn debug_tokens(analysis: &Analysis) -> Vec<String> {
    analysis.tokens.iter().map(|t| format!("{:?}", t)).collect()
}
