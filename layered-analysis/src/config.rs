//! Analysis configuration.
//!
//! ```toml
//! context_size = 10
//!
//! [ner]
//! default_probability = 0.8
//! adjective_location_tags = "LOC, B-LOC"
//!
//! [pos]
//! ignored_adjectives = ["gut", "schön"]
//! ```

use std::fs;
use std::path::Path;

use layered_text::tags::{ner_type, NerSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::ConfigError;

static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[, \t]+").expect("Invalid list separator regex"));

/// Split a configured tag list on commas, spaces and tabs.
pub fn split_list(list: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(list.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of trailing messages analysed; `<= 0` means all.
    pub context_size: i32,
    pub ner: NerConfig,
    pub pos: PosConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            context_size: -1,
            ner: NerConfig::default(),
            pos: PosConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&source)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Confidence of named entities annotated without probability.
    pub default_probability: f32,
    /// Tags recognised as locations by the adjective-location fusion.
    pub adjective_location_tags: String,
    /// Tags a location chunk may be extended with.
    pub location_append_tags: String,
    /// Types a location chunk may be extended with.
    pub location_append_types: String,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            default_probability: 0.8,
            adjective_location_tags: String::new(),
            location_append_tags: String::new(),
            location_append_types: String::new(),
        }
    }
}

impl NerConfig {
    /// Location set of the adjective-location fusion.
    pub fn adjective_location_set(&self) -> NerSet {
        let tags = split_list(&self.adjective_location_tags);
        if tags.is_empty() {
            NerSet::location()
        } else {
            tracing::trace!(?tags, "adjective location tags");
            NerSet::of_tags(&tags)
        }
    }

    /// Accepted set of the location type appender.
    pub fn location_append_set(&self) -> NerSet {
        let tags = split_list(&self.location_append_tags);
        let types = split_list(&self.location_append_types);
        if tags.is_empty() && types.is_empty() {
            NerSet::of_types(&[ner_type::LOCATION])
        } else {
            tracing::debug!(?tags, ?types, "location append set");
            NerSet::of_tags(&tags).with_types(&types)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PosConfig {
    /// Adjectives never emitted as attributes, matched case-insensitively.
    pub ignored_adjectives: Vec<String>,
}
