//! Conversation model for layered-text analysis.
//!
//! This crate provides the data exchanged with the hosting application:
//! the [`Conversation`] going in, and the [`Analysis`] coming out with its
//! domain [`Token`]s and [`Template`]s.
//!
//! ## Core Types
//!
//! - [`Conversation`] / [`Message`] - the ordered message list
//! - [`Token`] / [`TokenType`] - extracted, confidence scored facts
//! - [`Template`] / [`Slot`] - intent hypotheses with role bindings
//! - [`Analysis`] - tokens and templates of one conversation
//! - [`ConversationTextBuilder`] - one Section per message over the concatenated text
//! - [`IncrementalScope`] - which messages and tokens a pass may touch
//!
//! ## Example
//!
//! ```
//! use layered_conversation::{Conversation, ConversationTextBuilder, Message};
//!
//! let conversation = Conversation::new(vec![
//!     Message::user("Ist der ICE 1526 verspätet?"),
//!     Message::agent("Einen Moment bitte."),
//! ]);
//! let built = ConversationTextBuilder::new().build(&conversation).unwrap();
//! assert_eq!(built.message_sections().len(), 2);
//! ```

mod analysis;
mod conversation;
mod errors;
mod scope;
mod template;
mod text_builder;
mod token;

// Conversation input
pub use conversation::{
    Conversation,
    ConversationMeta,
    ConversationStatus,
    Message,
    Origin,
    SKIP_ANALYSIS,
};

// Analysis output
pub use analysis::{Analysis, AnalysisContext};
pub use template::{Slot, Template, TemplateState};
pub use token::{hints, Token, TokenOrigin, TokenState, TokenType, UnknownTokenType};

// Analysed text
pub use text_builder::{
    message_sections,
    ConversationText,
    ConversationTextBuilder,
    MessageContentProcessor,
    MESSAGE_IDX,
};

// Incremental processing
pub use scope::IncrementalScope;

pub use errors::{ConversationError, ConversationResult};

#[cfg(test)]
mod tests {
    mod fixtures;
}
