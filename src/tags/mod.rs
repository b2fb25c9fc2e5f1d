//! Tag vocabulary produced by upstream annotators.

mod ner;
mod phrase;
mod pos;

pub use ner::{ner_type, NerSet, NerTag};
pub use phrase::{PhraseCategory, PhraseTag};
pub use pos::{
    LexicalCategory, Pos, PosSet, PosTag, ADJECTIVES, ADPOSITIONS, NEGATION, NOUNS, VERBS,
};

/// Morphological analysis of a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MorphoFeatures {
    pub lemma: Option<String>,
}
