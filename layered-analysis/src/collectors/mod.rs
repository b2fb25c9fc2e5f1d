//! Stages turning annotated spans into domain tokens.
//!
//! The NER stages first refine the chunks of the upstream annotators
//! ([`AdjectiveLocationProcessor`], [`LocationTypeAppender`]); the
//! collectors then emit tokens for the new user messages of a pass.

mod adjective_location;
mod interesting_phrase;
mod location_appender;
mod named_entity;
mod negation;
mod pos_attributes;

pub use adjective_location::AdjectiveLocationProcessor;
pub use interesting_phrase::{InterestingPhraseCollector, InterestingTerm, INTERESTING_TERM};
pub use location_appender::LocationTypeAppender;
pub use named_entity::{token_type_of, NamedEntityCollector};
pub use negation::NegationMarker;
pub use pos_attributes::PosCollector;
