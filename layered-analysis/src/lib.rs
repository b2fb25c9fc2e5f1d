#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Entity collectors and the processing pipeline of layered-text
//! conversation analysis.
//!
//! A [`Pipeline`] builds the analysed text of a conversation, runs its
//! [`Processor`] stages by weight and finally lets the template builders of
//! `layered-intent` bind the collected tokens.
//!
//! ## Stages
//!
//! - [`AdjectiveLocationProcessor`] - "Oberbayerisches München" as one location
//! - [`LocationTypeAppender`] - "München Hauptbahnhof" as one location
//! - [`NamedEntityCollector`] - tokens from NER annotated chunks
//! - [`PosCollector`] - attribute tokens from adjectives
//! - [`InterestingPhraseCollector`] - keyword tokens from noun phrases
//! - [`NegationMarker`] - `negated` hints from negated chunks
//! - [`LazyStage`] - wraps a stage whose resources load in the background
//!
//! ## Example
//!
//! ```
//! use layered_analysis::{Phase, Pipeline, ProcessResult, ProcessingContext, Processor};
//! use layered_conversation::{Conversation, Message, TokenType};
//! use layered_text::tags::NerTag;
//! use layered_text::{keys, Value};
//!
//! /// Stand-in for a tokenizer and a NER model.
//! struct StationTagger;
//!
//! impl Processor for StationTagger {
//!     fn name(&self) -> &str {
//!         "ner.stations"
//!     }
//!
//!     fn phase(&self) -> Phase {
//!         Phase::Ner
//!     }
//!
//!     fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
//!         for (section, _) in ctx.collected_sections() {
//!             ctx.text.tokenize(section)?;
//!             if let Some(pos) = ctx.text.span_text(section).find("Ilmenau") {
//!                 let chunk = ctx.text.add_chunk(section, pos, pos + "Ilmenau".len())?;
//!                 ctx.text
//!                     .span_mut(chunk)
//!                     .add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.9));
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let pipeline = Pipeline::standard().add_stage(Box::new(StationTagger));
//! let conversation = Conversation::new(vec![Message::user("Zug nach Ilmenau")]);
//! let analysis = pipeline.analyze(&conversation, None).unwrap();
//! assert_eq!(analysis.tokens[0].token_type, TokenType::Place);
//! assert_eq!(analysis.tokens[0].value_text().as_deref(), Some("Ilmenau"));
//! ```

mod collectors;
mod config;
mod errors;
mod lazy;
mod pipeline;
mod processor;

pub use errors::{ConfigError, ProcessError, ProcessResult};

// Configuration
pub use config::{split_list, AnalysisConfig, NerConfig, PosConfig};

// Stages
pub use collectors::{
    token_type_of,
    AdjectiveLocationProcessor,
    InterestingPhraseCollector,
    InterestingTerm,
    LocationTypeAppender,
    NamedEntityCollector,
    NegationMarker,
    PosCollector,
    INTERESTING_TERM,
};
pub use lazy::{Health, LazyStage};
pub use processor::{Phase, ProcessingContext, Processor};

pub use pipeline::Pipeline;

#[cfg(test)]
mod tests {
    mod annotator;
    mod incremental;
    mod locations;
    mod templates;
}
