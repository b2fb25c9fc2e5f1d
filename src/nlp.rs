//! Classification helpers over annotated spans.
//!
//! POS and NER annotations are multi-valued; these helpers decide whether a
//! span "is" of a given class by weighing the probability mass of matching
//! against non-matching values. Unknown probabilities count as `1.0` and
//! both sums are normalised by `max(1, total)`.

use crate::keys;
use crate::tags::{NerSet, PosSet, ADJECTIVES, NOUNS, VERBS};
use crate::{Probability, Span, Value};

const WORD_JOINERS: &[char] = &['-', '–', '—', '_', '\'', '´', '`', '˚'];

/// `(matching, not_matching)` probability mass of `values` under `matches`.
fn eval_probs<T>(values: &[Value<T>], matches: impl Fn(&T) -> bool) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let mut matching = 0.0;
    let mut not_matching = 0.0;
    for value in values {
        let prob = match value.probability {
            Probability::Unknown => 1.0,
            Probability::Known(p) => p,
        };
        if matches(&value.value) {
            matching += prob;
        } else {
            not_matching += prob;
        }
    }
    let sum = f64::max(1.0, matching + not_matching);
    (matching / sum, not_matching / sum)
}

fn decide((matching, not_matching): (f64, f64), min_conf: Option<f64>) -> bool {
    match min_conf {
        Some(min_conf) if min_conf > 0.0 => matching >= min_conf && matching > not_matching,
        _ => matching > not_matching * 1.5,
    }
}

/// Returns true if the POS annotations of `span` classify it as `set`.
pub fn is_of_pos(span: &Span, set: &PosSet, min_conf: Option<f64>) -> bool {
    decide(eval_probs(span.values(&keys::POS), |t| set.matches(t)), min_conf)
}

/// Normalised probability that `span` is of `set`.
pub fn pos_probability(span: &Span, set: &PosSet) -> f64 {
    eval_probs(span.values(&keys::POS), |t| set.matches(t)).0
}

/// Returns true if the NER annotations of `span` classify it as `set`.
pub fn is_of_ner(span: &Span, set: &NerSet, min_conf: Option<f64>) -> bool {
    decide(eval_probs(span.values(&keys::NER), |t| set.matches(t)), min_conf)
}

/// Normalised probability that `span` is of `set`.
pub fn ner_probability(span: &Span, set: &NerSet) -> f64 {
    eval_probs(span.values(&keys::NER), |t| set.matches(t)).0
}

pub fn is_noun(span: &Span) -> bool {
    is_of_pos(span, &NOUNS, None)
}

pub fn is_adjective(span: &Span) -> bool {
    is_of_pos(span, &ADJECTIVES, None)
}

pub fn is_verb(span: &Span) -> bool {
    is_of_pos(span, &VERBS, None)
}

/// The lemma of a span: the morphological lemma, else the `LEMMA` annotation.
pub fn lemma(span: &Span) -> Option<&str> {
    span.annotation(&keys::MORPHO)
        .and_then(|m| m.lemma.as_deref())
        .or_else(|| span.annotation(&keys::LEMMA).map(String::as_str))
}

pub fn stem(span: &Span) -> Option<&str> {
    span.annotation(&keys::STEM).map(String::as_str)
}

pub fn is_stopword(span: &Span) -> bool {
    span.annotation(&keys::STOPWORD).copied().unwrap_or(false)
}

pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

pub fn has_alpha(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

pub fn has_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_numeric())
}

/// Letters, whitespace and word joiners (hyphens, underscores, apostrophes) only.
pub fn is_alpha(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || WORD_JOINERS.contains(&c))
}

/// Letters, digits, whitespace and word joiners only.
pub fn is_alphanumeric(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || WORD_JOINERS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{ner_type, NerTag, Pos, PosTag};
    use crate::AnalyzedText;

    fn word(text: &str) -> (AnalyzedText, crate::SpanId) {
        let mut at = AnalyzedText::new(text);
        let section = at.add_section(0, text.len()).unwrap();
        let token = at.add_token(section, 0, text.len()).unwrap();
        (at, token)
    }

    #[test]
    fn test_no_annotations() {
        let (at, token) = word("Haus");
        assert!(!is_noun(at.span(token)));
        assert_eq!(pos_probability(at.span(token), &NOUNS), 0.0);
    }

    #[test]
    fn test_mass_ratio() {
        let (mut at, token) = word("Laufen");
        let span = at.span_mut(token);
        span.add_value(&keys::POS, Value::new(PosTag::of_pos("NN", Pos::CommonNoun), 0.55));
        span.add_value(&keys::POS, Value::new(PosTag::of_pos("VVINF", Pos::MainVerb), 0.45));
        // 0.55 is not more than 1.5 times 0.45
        assert!(!is_noun(at.span(token)));
        assert!(is_of_pos(at.span(token), &NOUNS, Some(0.5)));
        assert!(!is_of_pos(at.span(token), &NOUNS, Some(0.6)));
    }

    #[test]
    fn test_unknown_counts_as_one() {
        let (mut at, token) = word("Berlin");
        at.span_mut(token)
            .add_value(&keys::NER, Value::unknown(NerTag::location("LOC")));
        assert!(is_of_ner(at.span(token), &NerSet::location(), None));
        assert_eq!(ner_probability(at.span(token), &NerSet::location()), 1.0);
        assert!(!is_of_ner(
            at.span(token),
            &NerSet::of_types(&[ner_type::PERSON]),
            None
        ));
    }

    #[test]
    fn test_lemma_prefers_morpho() {
        let (mut at, token) = word("Häuser");
        at.span_mut(token).set_annotation(&keys::LEMMA, "Haus".to_string());
        assert_eq!(lemma(at.span(token)), Some("Haus"));
        at.span_mut(token).set_annotation(
            &keys::MORPHO,
            crate::tags::MorphoFeatures {
                lemma: Some("Häusle".to_string()),
            },
        );
        assert_eq!(lemma(at.span(token)), Some("Häusle"));
    }

    #[test]
    fn test_character_classes() {
        assert!(is_alpha("Baden-Württemberg"));
        assert!(is_alpha("o'clock"));
        assert!(!is_alpha("ICE1526"));
        assert!(is_alphanumeric("ICE 1526"));
        assert!(has_alphanumeric("...1"));
        assert!(!has_alphanumeric("?!"));
        assert!(has_numeric("A9"));
    }
}
