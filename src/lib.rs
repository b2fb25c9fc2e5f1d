#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Layered span and annotation model for conversation analysis.
//!
//! An [`AnalyzedText`] holds the concatenated text of a conversation and a
//! hierarchy of spans over it (text → section → sentence → chunk → token).
//! Upstream annotators (POS taggers, NER models, chunkers) attach
//! multi-valued, probability-weighted annotations to those spans; the
//! collectors in `layered-analysis` reduce them to domain tokens.
//!
//! ## Core Types
//!
//! - [`AnalyzedText`] - span arena with ordered, cursor based iteration
//! - [`Span`] / [`SpanId`] / [`SpanKind`] - spans and their kinds
//! - [`Value`] / [`Probability`] - annotation values and their probabilities
//! - [`combine`] - probability fusion for independent detections
//!
//! ## Example
//!
//! ```
//! use layered_text::{keys, AnalyzedText, SpanKinds, Value};
//! use layered_text::tags::NerTag;
//!
//! let mut text = AnalyzedText::new("Zug nach München");
//! let section = text.add_section(0, text.text().len()).unwrap();
//! let chunk = text.add_chunk(section, 9, 17).unwrap();
//! text.span_mut(chunk).add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.9));
//!
//! let chunks = text.enclosed_ids(section, SpanKinds::CHUNK);
//! assert_eq!(text.span_text(chunks[0]), "München");
//! ```

mod analyzed_text;
mod fusion;
pub mod keys;
pub mod nlp;
pub mod tags;

// Span model
pub use analyzed_text::{
    AnalyzedText,
    AnalyzedTextDisplay,
    Enclosed,
    Span,
    SpanError,
    SpanId,
    SpanKind,
    SpanKinds,
    SpanResult,
};

// Annotation store
pub use analyzed_text::{
    AnnotationKey,
    AnnotationValue,
    Annotations,
    Probability,
    Value,
};

// Probability fusion
pub use fusion::{combine, combine_confidence, combine_f32};

#[cfg(test)]
mod tests {
    mod fusion_properties;
    mod span_model;
}
