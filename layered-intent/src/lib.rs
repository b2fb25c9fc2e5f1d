#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Intent templates for layered-text conversation analysis.
//!
//! A [`TemplateDefinition`] names the roles of an intent, the token type each
//! role accepts, and when a filled template is complete. A [`TemplateBuilder`]
//! binds the tokens of an [`Analysis`](layered_conversation::Analysis) to the
//! slots of its definition's templates, pass after pass.
//!
//! ## Definitions
//!
//! - [`TravelDefinition`] - `from`, `to` and a departure or arrival date
//! - [`TrainInfoDefinition`] - a date and a train or a from/to pair
//! - [`PerimeterDefinition`] - something to find around a location
//! - [`ProductDefinition`] - questions about a product
//! - [`OtherDefinition`] - catch-all
//! - [`IrLatchDefinition`] - generic retrieval (location, alphabet, time, category, hierarchy)
//! - [`DbSearchDefinition`] - full text search terms
//! - [`RelatedConversationDefinition`] - similar conversations
//!
//! ## Example
//!
//! ```
//! use layered_conversation::{Analysis, Conversation, IncrementalScope, Message, Token, TokenType};
//! use layered_intent::{DbSearchTemplateBuilder, TemplateBuilder, TemplateRegistry};
//!
//! let conversation = Conversation::new(vec![Message::user("Wo finde ich eine Steckdose?")]);
//! let mut analysis = Analysis::default();
//! analysis.tokens.push(Token::new(0, 18, 27, TokenType::Keyword).with_value("Steckdose"));
//!
//! DbSearchTemplateBuilder::default().update_templates(
//!     &conversation,
//!     &mut analysis,
//!     &IncrementalScope::of(&conversation),
//! );
//! let registry = TemplateRegistry::standard();
//! assert!(registry.is_valid(&analysis.templates[0], &analysis.tokens));
//! ```

mod builder;
mod db_search;
mod definition;
mod intents;
mod latch;
mod related_conversation;

pub use builder::{debug_template, Candidates, TemplateBuilder};
pub use definition::{TemplateDefinition, TemplateRegistry, TOPIC};

// Definitions
pub use db_search::{DbSearchDefinition, DbSearchTemplateBuilder};
pub use intents::{
    OtherDefinition,
    PerimeterDefinition,
    ProductDefinition,
    TrainInfoDefinition,
    TravelDefinition,
};
pub use latch::{IrLatchDefinition, LatchTemplateBuilder};
pub use related_conversation::{RelatedConversationDefinition, RelatedConversationTemplateBuilder};

#[cfg(test)]
mod tests {
    mod builders;
    mod travel;
}
