//! Error types for analysis passes and configuration.

use layered_text::SpanError;
use thiserror::Error;

/// Errors that abort an analysis pass.
///
/// Missing context (a section without message index, an unmappable tag) is
/// logged and skipped instead; only contract violations end up here.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A span could not be registered.
    #[error(transparent)]
    Span(#[from] SpanError),

    /// A stage saw data it cannot have been given by a consistent pipeline.
    #[error("invariant violated in {stage}: {message}")]
    Invariant { stage: String, message: String },

    /// Lazy initialisation of a stage failed. Reported once per stage.
    #[error("initialisation of {stage} failed: {message}")]
    InitFailed { stage: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProcessError {
    pub(crate) fn invariant(stage: &str, message: impl Into<String>) -> Self {
        ProcessError::Invariant {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading an [`AnalysisConfig`](crate::AnalysisConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {path}: {message}")]
    Load { path: String, message: String },

    #[error("invalid config: {message}")]
    Parse { message: String },
}

pub type ProcessResult<T> = Result<T, ProcessError>;
