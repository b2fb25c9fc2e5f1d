//! Phrase (chunk) categories.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhraseCategory {
    Phrase,
    NounHeadedPhrase,
    NounPhrase,
    PrepositionalPhrase,
    ForeignPhrase,
    VerbPhrase,
    AdjectivePhrase,
    AdverbPhrase,
}

impl PhraseCategory {
    pub fn parent(self) -> Option<PhraseCategory> {
        use PhraseCategory::*;
        match self {
            Phrase => None,
            NounPhrase | PrepositionalPhrase => Some(NounHeadedPhrase),
            NounHeadedPhrase | ForeignPhrase | VerbPhrase | AdjectivePhrase | AdverbPhrase => {
                Some(Phrase)
            }
        }
    }

    /// Returns true for categories whose head is a noun or a foreign word.
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            PhraseCategory::NounPhrase
                | PhraseCategory::NounHeadedPhrase
                | PhraseCategory::ForeignPhrase
        )
    }
}

/// A phrase tag with its category closure (the category and all ancestors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseTag {
    pub tag: String,
    pub categories: BTreeSet<PhraseCategory>,
}

impl PhraseTag {
    pub fn new(tag: impl Into<String>, category: PhraseCategory) -> Self {
        let mut categories = BTreeSet::new();
        let mut next = Some(category);
        while let Some(c) = next {
            categories.insert(c);
            next = c.parent();
        }
        Self {
            tag: tag.into(),
            categories,
        }
    }

    pub fn is_nominal(&self) -> bool {
        self.categories.iter().any(|c| c.is_nominal())
    }
}
