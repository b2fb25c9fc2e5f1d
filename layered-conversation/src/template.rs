//! Intent hypotheses (templates) and their slots.

use serde::{Deserialize, Serialize};

use crate::TokenType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateState {
    New,
    Confirmed,
    Rejected,
}

/// A named binding point of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub role: String,
    /// Constraint on the type of the bound token, if any.
    pub token_type: Option<TokenType>,
    pub required: bool,
    /// Index into `Analysis::tokens`, `None` while unbound.
    pub token_index: Option<usize>,
    #[serde(default)]
    pub inquiry_message: Option<String>,
}

impl Slot {
    pub fn new(role: impl Into<String>, token_type: Option<TokenType>) -> Self {
        Self {
            role: role.into(),
            token_type,
            required: false,
            token_index: None,
            inquiry_message: None,
        }
    }

    pub fn required(role: impl Into<String>, token_type: Option<TokenType>) -> Self {
        Self {
            required: true,
            ..Self::new(role, token_type)
        }
    }

    /// Question asked to the user to fill this slot.
    pub fn with_inquiry(mut self, inquiry_message: impl Into<String>) -> Self {
        self.inquiry_message = Some(inquiry_message.into());
        self
    }

    pub fn bound_to(mut self, token_index: usize) -> Self {
        self.token_index = Some(token_index);
        self
    }

    pub fn is_bound(&self) -> bool {
        self.token_index.is_some()
    }
}

/// An instantiated intent hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub template_type: String,
    pub slots: Vec<Slot>,
    pub state: TemplateState,
    /// Queries built by downstream query builders; opaque to the analysis.
    #[serde(default)]
    pub queries: Vec<serde_json::Value>,
    #[serde(default)]
    pub probability: Option<f32>,
}

impl Template {
    pub fn new(template_type: impl Into<String>) -> Self {
        Self {
            template_type: template_type.into(),
            slots: Vec::new(),
            state: TemplateState::New,
            queries: Vec::new(),
            probability: None,
        }
    }

    /// Indices of all tokens bound by this template's slots.
    pub fn bound_token_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|s| s.token_index)
    }

    /// Returns true unless the template was confirmed or rejected.
    pub fn is_updatable(&self) -> bool {
        self.state == TemplateState::New
    }
}
