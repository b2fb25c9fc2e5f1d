//! Domain tokens extracted from a conversation.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Well known token hints.
pub mod hints {
    pub const NEGATED: &str = "negated";
    pub const INTERESTING_TERM: &str = "interestingTerm";
    pub const INSTANT: &str = "instant";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const VIA: &str = "via";
    pub const AT: &str = "at";
    pub const DEPART: &str = "depart";
    pub const ARRIVE: &str = "arrive";

    /// Hint recording the NER tag a token was derived from.
    pub fn entity_type(tag: &str) -> String {
        format!("entity.type.{}", tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenType {
    Place,
    Date,
    Person,
    Organization,
    Entity,
    Topic,
    Keyword,
    Attribute,
    Product,
    Train,
    Other,
    Unknown,
}

impl TokenType {
    pub const ALL: [TokenType; 12] = [
        TokenType::Place,
        TokenType::Date,
        TokenType::Person,
        TokenType::Organization,
        TokenType::Entity,
        TokenType::Topic,
        TokenType::Keyword,
        TokenType::Attribute,
        TokenType::Product,
        TokenType::Train,
        TokenType::Other,
        TokenType::Unknown,
    ];
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Error returned when a string names no [`TokenType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTokenType(pub String);

impl fmt::Display for UnknownTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token type '{}'", self.0)
    }
}

impl std::error::Error for UnknownTokenType {}

impl FromStr for TokenType {
    type Err = UnknownTokenType;

    /// Exact match on the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenType::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| UnknownTokenType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenOrigin {
    System,
    Agent,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
    Suggested,
    Confirmed,
    Rejected,
}

/// A typed, confidence scored fact positioned within one message.
///
/// `start`/`end` are byte offsets relative to the message content.
/// `message_idx` is `-1` for tokens that are not bound to a message
/// (agent-origin tokens).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub message_idx: i32,
    pub start: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub value: Option<serde_json::Value>,
    confidence: f32,
    pub hints: BTreeSet<String>,
    pub origin: TokenOrigin,
    pub state: TokenState,
}

impl Token {
    pub fn new(message_idx: i32, start: usize, end: usize, token_type: TokenType) -> Self {
        Self {
            message_idx,
            start,
            end,
            token_type,
            value: None,
            confidence: 0.0,
            hints: BTreeSet::new(),
            origin: TokenOrigin::System,
            state: TokenState::Suggested,
        }
    }

    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.set_confidence(confidence);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.insert(hint.into());
        self
    }

    pub fn with_origin(mut self, origin: TokenOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Set the confidence, clamped to `[0, 1]`.
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
    }

    pub fn set_value(&mut self, value: impl Into<serde_json::Value>) {
        self.value = Some(value.into());
    }

    pub fn add_hint(&mut self, hint: impl Into<String>) -> bool {
        self.hints.insert(hint.into())
    }

    pub fn remove_hint(&mut self, hint: &str) -> bool {
        self.hints.remove(hint)
    }

    pub fn has_hint(&self, hint: &str) -> bool {
        self.hints.contains(hint)
    }

    /// Returns true if the token is not bound to a message.
    pub fn is_agent_token(&self) -> bool {
        self.message_idx < 0
    }

    /// The value as plain text: strings unquoted, other values as JSON.
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Output ordering: message index, start, end.
    pub fn position_cmp(&self, other: &Token) -> Ordering {
        self.message_idx
            .cmp(&other.message_idx)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Token(Place, 1:[4..24] "München Hbf", conf: 0.80)
        write!(
            f,
            "Token({:?}, {}:[{}..{}] {:?}, conf: {:.2}",
            self.token_type,
            self.message_idx,
            self.start,
            self.end,
            self.value_text().unwrap_or_default(),
            self.confidence
        )?;
        if !self.hints.is_empty() {
            write!(f, ", hints: {:?}", self.hints)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamping() {
        let token = Token::new(0, 0, 3, TokenType::Place).with_confidence(1.3);
        assert_eq!(token.confidence(), 1.0);
        let token = Token::new(0, 0, 3, TokenType::Place).with_confidence(-2.0);
        assert_eq!(token.confidence(), 0.0);
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("Place".parse::<TokenType>(), Ok(TokenType::Place));
        assert_eq!("Organization".parse::<TokenType>(), Ok(TokenType::Organization));
        assert!("place".parse::<TokenType>().is_err());
        assert!("loc".parse::<TokenType>().is_err());
    }

    #[test]
    fn test_value_text() {
        let token = Token::new(0, 0, 3, TokenType::Keyword).with_value("Steckdose");
        assert_eq!(token.value_text().as_deref(), Some("Steckdose"));
        let token = Token::new(0, 0, 3, TokenType::Train).with_value(1526);
        assert_eq!(token.value_text().as_deref(), Some("1526"));
        assert_eq!(Token::new(0, 0, 3, TokenType::Other).value_text(), None);
    }

    #[test]
    fn test_debug_format() {
        let token = Token::new(1, 4, 12, TokenType::Place)
            .with_value("München")
            .with_confidence(0.8)
            .with_hint(hints::entity_type("LOC"));
        assert_eq!(
            format!("{:?}", token),
            r#"Token(Place, 1:[4..12] "München", conf: 0.80, hints: {"entity.type.LOC"})"#
        );
    }
}
