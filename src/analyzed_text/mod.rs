//! The span arena over a single text buffer.
//!
//! An [`AnalyzedText`] owns every [`Span`] created over its text. Spans are
//! addressed by [`SpanId`] and indexed in a `BTreeMap` ordered by
//! `(start ASC, end DESC, kind)`, so an enclosing span is always visited
//! before the spans it contains.
//!
//! Enclosed-span iteration is cursor based ([`Enclosed`]): every step
//! re-queries the index for the first key after the last visited one. A pass
//! may therefore register new spans while it iterates; spans sorting after
//! the cursor are visited, spans sorting before it are not.

mod annotation;
mod display;
mod span;

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::ops::Bound;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub use annotation::{AnnotationKey, AnnotationValue, Annotations, Probability, Value};
pub use display::AnalyzedTextDisplay;
pub use span::{Span, SpanId, SpanKind, SpanKinds};

/// Errors raised when registering spans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// `start` must be strictly smaller than `end`.
    #[error("invalid span bounds [{start}, {end})")]
    InvalidBounds { start: usize, end: usize },

    /// The span would extend past its parent.
    #[error("span [{start}, {end}) is outside of its parent [{parent_start}, {parent_end})")]
    OutsideParent {
        start: usize,
        end: usize,
        parent_start: usize,
        parent_end: usize,
    },

    /// The span bounds do not fall on UTF-8 character boundaries.
    #[error("span [{start}, {end}) does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    /// The id does not belong to this document.
    #[error("unknown span id {0:?}")]
    UnknownSpan(SpanId),
}

/// Result type for span operations.
pub type SpanResult<T> = Result<T, SpanError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SpanKey {
    start: usize,
    end: Reverse<usize>,
    kind: SpanKind,
}

/// A text buffer with its layered spans.
#[derive(Debug)]
pub struct AnalyzedText {
    text: String,
    spans: Vec<Span>,
    index: BTreeMap<SpanKey, SpanId>,
}

impl AnalyzedText {
    /// Create a document whose root [`SpanKind::Text`] span covers `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let root = Span::new(SpanId(0), SpanKind::Text, 0, text.len());
        Self {
            text,
            spans: vec![root],
            index: BTreeMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The root span covering the whole text.
    pub fn root(&self) -> SpanId {
        SpanId(0)
    }

    /// Number of spans, root included.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// The span with the given id.
    ///
    /// # Panics
    /// If `id` was created by a different document.
    pub fn span(&self, id: SpanId) -> &Span {
        &self.spans[id.0]
    }

    /// Mutable access to the span with the given id.
    ///
    /// # Panics
    /// If `id` was created by a different document.
    pub fn span_mut(&mut self, id: SpanId) -> &mut Span {
        &mut self.spans[id.0]
    }

    pub fn get(&self, id: SpanId) -> Option<&Span> {
        self.spans.get(id.0)
    }

    /// The covered text of a span.
    pub fn span_text(&self, id: SpanId) -> &str {
        let span = self.span(id);
        self.text.get(span.start()..span.end()).unwrap_or("")
    }

    /// Text between two absolute offsets, empty if the range is invalid.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        self.text.get(start..end).unwrap_or("")
    }

    /// Add a section with offsets relative to the root (i.e. absolute).
    pub fn add_section(&mut self, start: usize, end: usize) -> SpanResult<SpanId> {
        self.add_span(self.root(), SpanKind::Section, start, end)
    }

    /// Add a sentence with offsets relative to `parent`.
    pub fn add_sentence(&mut self, parent: SpanId, start: usize, end: usize) -> SpanResult<SpanId> {
        self.add_span(parent, SpanKind::Sentence, start, end)
    }

    /// Add a chunk with offsets relative to `parent`.
    pub fn add_chunk(&mut self, parent: SpanId, start: usize, end: usize) -> SpanResult<SpanId> {
        self.add_span(parent, SpanKind::Chunk, start, end)
    }

    /// Add a token with offsets relative to `parent`.
    pub fn add_token(&mut self, parent: SpanId, start: usize, end: usize) -> SpanResult<SpanId> {
        self.add_span(parent, SpanKind::Token, start, end)
    }

    /// Register a span of `kind` at `[start, end)` relative to `parent`.
    ///
    /// Re-adding identical bounds of the same kind returns the existing span
    /// with its annotations untouched.
    pub fn add_span(
        &mut self,
        parent: SpanId,
        kind: SpanKind,
        start: usize,
        end: usize,
    ) -> SpanResult<SpanId> {
        let parent_span = self.get(parent).ok_or(SpanError::UnknownSpan(parent))?;
        if start >= end {
            return Err(SpanError::InvalidBounds { start, end });
        }
        let abs_start = parent_span.start() + start;
        let abs_end = parent_span.start() + end;
        if abs_end > parent_span.end() {
            return Err(SpanError::OutsideParent {
                start: abs_start,
                end: abs_end,
                parent_start: parent_span.start(),
                parent_end: parent_span.end(),
            });
        }
        if !self.text.is_char_boundary(abs_start) || !self.text.is_char_boundary(abs_end) {
            return Err(SpanError::NotCharBoundary {
                start: abs_start,
                end: abs_end,
            });
        }
        let key = SpanKey {
            start: abs_start,
            end: Reverse(abs_end),
            kind,
        };
        if let Some(existing) = self.index.get(&key) {
            return Ok(*existing);
        }
        let id = SpanId(self.spans.len());
        self.spans.push(Span::new(id, kind, abs_start, abs_end));
        self.index.insert(key, id);
        Ok(id)
    }

    /// Cursor over the spans of `kinds` enclosed by `parent`.
    pub fn enclosed(&self, parent: SpanId, kinds: SpanKinds) -> Enclosed {
        let span = self.span(parent);
        Enclosed {
            parent,
            start: span.start(),
            end: span.end(),
            kinds,
            last: None,
        }
    }

    /// Snapshot of the spans of `kinds` enclosed by `parent`, in order.
    pub fn enclosed_ids(&self, parent: SpanId, kinds: SpanKinds) -> Vec<SpanId> {
        let mut cursor = self.enclosed(parent, kinds);
        let mut ids = Vec::new();
        while let Some(id) = cursor.next(self) {
            ids.push(id);
        }
        ids
    }

    /// All sections, in document order.
    pub fn sections(&self) -> Vec<SpanId> {
        self.enclosed_ids(self.root(), SpanKinds::SECTION)
    }

    /// Add a token for every word-bound segment of `parent` that is not whitespace.
    pub fn tokenize(&mut self, parent: SpanId) -> SpanResult<Vec<SpanId>> {
        let segments: Vec<(usize, usize)> = self
            .span_text(parent)
            .split_word_bound_indices()
            .filter(|(_, segment)| !segment.trim().is_empty())
            .map(|(idx, segment)| (idx, idx + segment.len()))
            .collect();
        segments
            .into_iter()
            .map(|(start, end)| self.add_token(parent, start, end))
            .collect()
    }
}

/// Forward cursor over enclosed spans.
///
/// The cursor does not borrow the document, so the caller may add spans or
/// annotations between steps.
#[derive(Debug, Clone)]
pub struct Enclosed {
    parent: SpanId,
    start: usize,
    end: usize,
    kinds: SpanKinds,
    last: Option<SpanKey>,
}

impl Enclosed {
    /// The next enclosed span after the cursor, if any.
    pub fn next(&mut self, text: &AnalyzedText) -> Option<SpanId> {
        let lower = match self.last {
            Some(last) => Bound::Excluded(last),
            None => Bound::Included(SpanKey {
                start: self.start,
                end: Reverse(usize::MAX),
                kind: SpanKind::Text,
            }),
        };
        for (key, id) in text.index.range((lower, Bound::Unbounded)) {
            if key.start >= self.end {
                return None;
            }
            self.last = Some(*key);
            if *id == self.parent || key.end.0 > self.end || !self.kinds.contains(key.kind) {
                continue;
            }
            return Some(*id);
        }
        None
    }

    pub fn parent(&self) -> SpanId {
        self.parent
    }
}
