//! Part-of-speech tags and tag sets.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Coarse lexical categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LexicalCategory {
    Noun,
    Verb,
    Adjective,
    Adposition,
    Adverb,
    Conjunction,
    Determiner,
    Interjection,
    Numeral,
    Particle,
    Pronoun,
    Punctuation,
    Residual,
}

/// Fine grained part-of-speech classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pos {
    CommonNoun,
    ProperNoun,
    Foreign,
    Abbreviation,
    AttributiveAdjective,
    PredicativeAdjective,
    Preposition,
    Postposition,
    Circumposition,
    MainVerb,
    AuxiliaryVerb,
    ModalVerb,
    Adverb,
    NegativeAdverb,
    CoordinatingConjunction,
    SubordinatingConjunction,
    SubordinatingConjunctionWithNegation,
    Determiner,
    NegativeDeterminer,
    Particle,
    NegativeParticle,
    PersonalPronoun,
    NegativePronoun,
    CardinalNumber,
    Interjection,
    Punctuation,
}

impl Pos {
    /// The lexical category this class belongs to, if any.
    pub fn category(self) -> Option<LexicalCategory> {
        use LexicalCategory as C;
        use Pos::*;
        match self {
            CommonNoun | ProperNoun => Some(C::Noun),
            Foreign | Abbreviation => None,
            AttributiveAdjective | PredicativeAdjective => Some(C::Adjective),
            Preposition | Postposition | Circumposition => Some(C::Adposition),
            MainVerb | AuxiliaryVerb | ModalVerb => Some(C::Verb),
            Adverb | NegativeAdverb => Some(C::Adverb),
            CoordinatingConjunction | SubordinatingConjunction | SubordinatingConjunctionWithNegation => {
                Some(C::Conjunction)
            }
            Determiner | NegativeDeterminer => Some(C::Determiner),
            Particle | NegativeParticle => Some(C::Particle),
            PersonalPronoun | NegativePronoun => Some(C::Pronoun),
            CardinalNumber => Some(C::Numeral),
            Interjection => Some(C::Interjection),
            Punctuation => Some(C::Punctuation),
        }
    }
}

/// A POS tag as produced by a tagger: the raw tag plus its mapped classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTag {
    pub tag: String,
    pub categories: BTreeSet<LexicalCategory>,
    pub pos: BTreeSet<Pos>,
}

impl PosTag {
    /// A raw tag without mapped classes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            categories: BTreeSet::new(),
            pos: BTreeSet::new(),
        }
    }

    /// A tag mapped to `pos` and its lexical category.
    pub fn of_pos(tag: impl Into<String>, pos: Pos) -> Self {
        Self::new(tag).with_pos(pos)
    }

    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos.insert(pos);
        if let Some(category) = pos.category() {
            self.categories.insert(category);
        }
        self
    }

    pub fn with_category(mut self, category: LexicalCategory) -> Self {
        self.categories.insert(category);
        self
    }
}

/// A set of lexical categories, POS classes and raw tags.
///
/// A [`PosTag`] matches the set if any of its categories, classes or its
/// raw tag is contained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosSet {
    categories: BTreeSet<LexicalCategory>,
    pos: BTreeSet<Pos>,
    tags: BTreeSet<String>,
}

/// All nouns including foreign words and abbreviations.
pub static NOUNS: Lazy<PosSet> = Lazy::new(|| {
    PosSet::of_categories(&[LexicalCategory::Noun]).with_pos(&[Pos::Foreign, Pos::Abbreviation])
});

pub static VERBS: Lazy<PosSet> = Lazy::new(|| PosSet::of_categories(&[LexicalCategory::Verb]));

pub static ADJECTIVES: Lazy<PosSet> =
    Lazy::new(|| PosSet::of_categories(&[LexicalCategory::Adjective]));

pub static ADPOSITIONS: Lazy<PosSet> =
    Lazy::new(|| PosSet::of_categories(&[LexicalCategory::Adposition]));

/// Words indicating a negation.
pub static NEGATION: Lazy<PosSet> = Lazy::new(|| {
    PosSet::of_pos(&[
        Pos::NegativeAdverb,
        Pos::NegativeDeterminer,
        Pos::NegativeParticle,
        Pos::NegativePronoun,
        Pos::SubordinatingConjunctionWithNegation,
    ])
});

impl PosSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_categories(categories: &[LexicalCategory]) -> Self {
        Self::empty().with_categories(categories)
    }

    pub fn of_pos(pos: &[Pos]) -> Self {
        Self::empty().with_pos(pos)
    }

    pub fn of_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        Self::empty().with_tags(tags)
    }

    pub fn with_categories(mut self, categories: &[LexicalCategory]) -> Self {
        self.categories.extend(categories.iter().copied());
        self
    }

    pub fn with_pos(mut self, pos: &[Pos]) -> Self {
        self.pos.extend(pos.iter().copied());
        self
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.as_ref().to_string()));
        self
    }

    /// Union of several sets.
    pub fn union(sets: &[&PosSet]) -> Self {
        let mut union = Self::empty();
        for set in sets {
            union.categories.extend(set.categories.iter().copied());
            union.pos.extend(set.pos.iter().copied());
            union.tags.extend(set.tags.iter().cloned());
        }
        union
    }

    pub fn matches(&self, tag: &PosTag) -> bool {
        !self.categories.is_disjoint(&tag.categories)
            || !self.pos.is_disjoint(&tag.pos)
            || self.tags.contains(&tag.tag)
    }
}
