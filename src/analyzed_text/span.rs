use std::fmt;

use serde::{Deserialize, Serialize};

use super::annotation::{AnnotationKey, AnnotationValue, Annotations, Value};

/// Index of a span inside the [`AnalyzedText`](super::AnalyzedText) that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub(crate) usize);

impl SpanId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kinds of spans, in containment order.
///
/// The declaration order is part of the span ordering: for identical bounds
/// an outer kind sorts before an inner one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpanKind {
    Text,
    Section,
    Sentence,
    Chunk,
    Token,
}

impl SpanKind {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set of [`SpanKind`]s used to filter enclosed-span iteration.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanKinds(u8);

impl SpanKinds {
    pub const SECTION: SpanKinds = SpanKinds(1 << 1);
    pub const SENTENCE: SpanKinds = SpanKinds(1 << 2);
    pub const CHUNK: SpanKinds = SpanKinds(1 << 3);
    pub const TOKEN: SpanKinds = SpanKinds(1 << 4);
    pub const CHUNK_AND_TOKEN: SpanKinds = SpanKinds(1 << 3 | 1 << 4);

    pub fn of(kinds: &[SpanKind]) -> Self {
        SpanKinds(kinds.iter().fold(0, |acc, kind| acc | kind.bit()))
    }

    pub fn with(self, kind: SpanKind) -> Self {
        SpanKinds(self.0 | kind.bit())
    }

    pub fn contains(self, kind: SpanKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl fmt::Debug for SpanKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = [
            SpanKind::Text,
            SpanKind::Section,
            SpanKind::Sentence,
            SpanKind::Chunk,
            SpanKind::Token,
        ];
        f.debug_set()
            .entries(kinds.iter().filter(|k| self.contains(**k)))
            .finish()
    }
}

/// An interval `[start, end)` over the text with its annotations.
///
/// Bounds are absolute byte offsets and never change after creation;
/// annotations stay mutable for the lifetime of the document.
#[derive(Debug)]
pub struct Span {
    id: SpanId,
    kind: SpanKind,
    start: usize,
    end: usize,
    annotations: Annotations,
}

impl Span {
    pub(crate) fn new(id: SpanId, kind: SpanKind, start: usize, end: usize) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            annotations: Annotations::default(),
        }
    }

    pub fn id(&self) -> SpanId {
        self.id
    }

    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies within this span.
    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub fn add_value<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: Value<T>) {
        self.annotations.add_value(key, value);
    }

    pub fn add_values<T: AnnotationValue>(
        &mut self,
        key: &AnnotationKey<T>,
        values: impl IntoIterator<Item = Value<T>>,
    ) {
        self.annotations.add_values(key, values);
    }

    pub fn set_value<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: Value<T>) {
        self.annotations.set_value(key, value);
    }

    pub fn set_annotation<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: T) {
        self.annotations.set_annotation(key, value);
    }

    pub fn values<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> &[Value<T>] {
        self.annotations.values(key)
    }

    pub fn value<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> Option<&Value<T>> {
        self.annotations.value(key)
    }

    pub fn annotation<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> Option<&T> {
        self.annotations.annotation(key)
    }
}
