//! Named entity tags and tag sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Well known named entity types.
pub mod ner_type {
    pub const PERSON: &str = "pers";
    pub const ORGANIZATION: &str = "org";
    pub const LOCATION: &str = "loc";
    pub const EVENT: &str = "evt";
    pub const MISC: &str = "misc";
    pub const UNKNOWN: &str = "unk";
}

/// A named entity tag: the raw model tag and its normalized type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NerTag {
    pub tag: String,
    pub ner_type: String,
}

impl NerTag {
    pub fn new(tag: impl Into<String>, ner_type: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ner_type: ner_type.into(),
        }
    }

    /// A tag whose type is not known.
    pub fn of_tag(tag: impl Into<String>) -> Self {
        Self::new(tag, ner_type::UNKNOWN)
    }

    pub fn location(tag: impl Into<String>) -> Self {
        Self::new(tag, ner_type::LOCATION)
    }

    /// Returns true if the type carries no information (`misc` or `unk`).
    pub fn is_untyped(&self) -> bool {
        self.ner_type == ner_type::MISC || self.ner_type == ner_type::UNKNOWN
    }
}

/// A set of NER types and raw tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NerSet {
    types: BTreeSet<String>,
    tags: BTreeSet<String>,
}

impl NerSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_types<S: AsRef<str>>(types: &[S]) -> Self {
        Self::empty().with_types(types)
    }

    pub fn of_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        Self::empty().with_tags(tags)
    }

    pub fn location() -> Self {
        Self::of_types(&[ner_type::LOCATION])
    }

    pub fn person() -> Self {
        Self::of_types(&[ner_type::PERSON])
    }

    pub fn organization() -> Self {
        Self::of_types(&[ner_type::ORGANIZATION])
    }

    pub fn with_types<S: AsRef<str>>(mut self, types: &[S]) -> Self {
        self.types.extend(types.iter().map(|t| t.as_ref().to_string()));
        self
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.as_ref().to_string()));
        self
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.tags.is_empty()
    }

    pub fn matches(&self, tag: &NerTag) -> bool {
        self.types.contains(&tag.ner_type) || self.tags.contains(&tag.tag)
    }
}
