//! Conversations as delivered by the hosting application.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConversationError;

/// Metadata key marking a message that must not be analysed.
pub const SKIP_ANALYSIS: &str = "skipAnalysis";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: i64,
    pub origin: Origin,
    pub content: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub votes: i32,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Message {
    pub fn new(origin: Origin, content: impl Into<String>) -> Self {
        Self {
            id: None,
            time: 0,
            origin,
            content: content.into(),
            private: false,
            votes: 0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Origin::User, content)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(Origin::Agent, content)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true if the message is marked to be skipped by the analysis.
    ///
    /// Accepts both a JSON boolean and the string `"true"`.
    pub fn skip_analysis(&self) -> bool {
        match self.metadata.get(SKIP_ANALYSIS) {
            Some(serde_json::Value::Bool(skip)) => *skip,
            Some(serde_json::Value::String(skip)) => skip.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationStatus {
    New,
    Ongoing,
    Complete,
}

impl Default for ConversationStatus {
    fn default() -> Self {
        ConversationStatus::New
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMeta {
    #[serde(default)]
    pub status: ConversationStatus,
    /// Index of the last message covered by a previous analysis, `-1` if none.
    ///
    /// Owned by the hosting pipeline; read-only for the analysis.
    #[serde(default = "ConversationMeta::nothing_analyzed")]
    pub last_message_analyzed: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ConversationMeta {
    fn nothing_analyzed() -> i32 {
        -1
    }
}

impl Default for ConversationMeta {
    fn default() -> Self {
        Self {
            status: ConversationStatus::default(),
            last_message_analyzed: -1,
            tags: Vec::new(),
        }
    }
}

/// An ordered list of messages plus bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub meta: ConversationMeta,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            id: None,
            meta: ConversationMeta::default(),
            messages,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Message at a (signed) message index.
    pub fn message(&self, idx: i32) -> Option<&Message> {
        usize::try_from(idx).ok().and_then(|idx| self.messages.get(idx))
    }

    /// Parse a conversation from RON.
    ///
    /// ```
    /// use layered_conversation::{Conversation, Origin};
    ///
    /// let conversation = Conversation::from_ron(r#"(
    ///     messages: [
    ///         (origin: User, content: "Wann fährt der nächste Zug nach Ilmenau?"),
    ///     ],
    /// )"#).unwrap();
    /// assert_eq!(conversation.messages[0].origin, Origin::User);
    /// assert_eq!(conversation.meta.last_message_analyzed, -1);
    /// ```
    pub fn from_ron(source: &str) -> Result<Self, ConversationError> {
        ron::from_str(source).map_err(|e| ConversationError::Parse {
            message: e.to_string(),
        })
    }

    /// Load a conversation from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConversationError> {
        let content = fs::read_to_string(path).map_err(|e| ConversationError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron(&content)
    }
}
