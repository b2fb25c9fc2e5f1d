//! Typed, multi-valued annotations attached to spans.
//!
//! Independent analyzers (POS taggers, NER models, chunkers) each attach their
//! own opinion to a span, so every [`AnnotationKey`] maps to a list of
//! [`Value`]s rather than a single one. The list is kept sorted by
//! [`Probability`], highest first, so the first value is always the most
//! likely reading.
//!
//! ## Example
//!
//! ```
//! use layered_text::{AnnotationKey, Annotations, Value};
//!
//! const LEMMA: AnnotationKey<String> = AnnotationKey::new("example.lemma");
//!
//! let mut annotations = Annotations::default();
//! annotations.add_value(&LEMMA, Value::new("gehen".to_string(), 0.4));
//! annotations.add_value(&LEMMA, Value::new("geht".to_string(), 0.9));
//! assert_eq!(annotations.value(&LEMMA).map(|v| v.value.as_str()), Some("geht"));
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Probability of an annotation value.
///
/// `Unknown` is a distinct state, not a number: analyzers that do not report
/// confidences produce it, and fusion treats it specially.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Probability {
    Unknown,
    Known(f64),
}

impl Probability {
    /// Known probability, clamped to `[0, 1]`. `NaN` becomes `Unknown`.
    pub fn new(p: f64) -> Self {
        if p.is_nan() {
            Probability::Unknown
        } else {
            Probability::Known(p.clamp(0.0, 1.0))
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Probability::Unknown)
    }

    pub fn known(self) -> Option<f64> {
        match self {
            Probability::Known(p) => Some(p),
            Probability::Unknown => None,
        }
    }

    /// The probability, or `default` when unknown.
    pub fn or(self, default: f64) -> f64 {
        self.known().unwrap_or(default)
    }

    /// Sort rank: unknown probabilities rank below every known one.
    fn rank(self) -> f64 {
        self.or(-1.0)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probability::Unknown => f.write_str("?"),
            Probability::Known(p) => write!(f, "{:.2}", p),
        }
    }
}

/// A single annotation value with its probability.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Value<T> {
    pub value: T,
    pub probability: Probability,
}

impl<T> Value<T> {
    pub fn new(value: T, probability: f64) -> Self {
        Self {
            value,
            probability: Probability::new(probability),
        }
    }

    /// A value without a reported probability.
    pub fn unknown(value: T) -> Self {
        Self {
            value,
            probability: Probability::Unknown,
        }
    }

    pub fn with_probability(value: T, probability: Probability) -> Self {
        Self { value, probability }
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Value("geht", p: 0.90)
        write!(f, "Value({:?}, p: {})", self.value, self.probability)
    }
}

/// A typed annotation key.
///
/// Keys are plain constants; the name must be unique within a process.
pub struct AnnotationKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> AnnotationKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for AnnotationKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AnnotationKey<T> {}

impl<T> fmt::Debug for AnnotationKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationKey({})", self.name)
    }
}

/// Bound for types that can be stored as annotation values.
pub trait AnnotationValue: fmt::Debug + Send + Sync + 'static {}

impl<T: fmt::Debug + Send + Sync + 'static> AnnotationValue for T {}

/// Object-safe wrapper for the type-erased value lists.
trait ValueBucket: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn debug_values(&self) -> Vec<String>;
}

impl<T: AnnotationValue> ValueBucket for Vec<Value<T>> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_values(&self) -> Vec<String> {
        self.iter().map(|v| format!("{:?}", v)).collect()
    }
}

/// Annotation store of a single span.
#[derive(Debug, Default)]
pub struct Annotations {
    buckets: Vec<(&'static str, Box<dyn ValueBucket>)>,
}

impl Annotations {
    fn bucket<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> Option<&Vec<Value<T>>> {
        let (_, bucket) = self.buckets.iter().find(|(name, _)| *name == key.name)?;
        let values = bucket.as_any().downcast_ref::<Vec<Value<T>>>();
        if values.is_none() {
            tracing::warn!(key = key.name, "annotation key registered with a different value type");
        }
        values
    }

    fn bucket_mut<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>) -> Option<&mut Vec<Value<T>>> {
        let pos = match self.buckets.iter().position(|(name, _)| *name == key.name) {
            Some(pos) => pos,
            None => {
                self.buckets.push((key.name, Box::new(Vec::<Value<T>>::new())));
                self.buckets.len() - 1
            }
        };
        let values = self.buckets[pos].1.as_any_mut().downcast_mut::<Vec<Value<T>>>();
        if values.is_none() {
            tracing::warn!(key = key.name, "annotation key registered with a different value type");
        }
        values
    }

    /// Add a value, keeping the list sorted by probability (highest first).
    ///
    /// Values with equal probability keep their insertion order.
    pub fn add_value<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: Value<T>) {
        if let Some(values) = self.bucket_mut(key) {
            let rank = value.probability.rank();
            let pos = values
                .iter()
                .position(|v| v.probability.rank() < rank)
                .unwrap_or(values.len());
            values.insert(pos, value);
        }
    }

    pub fn add_values<T: AnnotationValue>(
        &mut self,
        key: &AnnotationKey<T>,
        values: impl IntoIterator<Item = Value<T>>,
    ) {
        for value in values {
            self.add_value(key, value);
        }
    }

    /// Replace all values of `key` with a single value.
    pub fn set_value<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: Value<T>) {
        if let Some(values) = self.bucket_mut(key) {
            values.clear();
            values.push(value);
        }
    }

    /// Replace all values of `key` with `value` at unknown probability.
    pub fn set_annotation<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>, value: T) {
        self.set_value(key, Value::unknown(value));
    }

    /// All values of `key`, highest probability first.
    pub fn values<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> &[Value<T>] {
        self.bucket(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most probable value of `key`.
    pub fn value<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> Option<&Value<T>> {
        self.values(key).first()
    }

    /// The most probable annotation of `key`, for keys used as single-valued.
    ///
    /// Logs a warning when the two most probable values tie.
    pub fn annotation<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> Option<&T> {
        let values = self.values(key);
        if let [first, second, ..] = values {
            if first.probability == second.probability {
                tracing::warn!(
                    key = key.name,
                    count = values.len(),
                    "ambiguous single-valued annotation, using the first value"
                );
            }
        }
        values.first().map(|v| &v.value)
    }

    pub fn contains<T: AnnotationValue>(&self, key: &AnnotationKey<T>) -> bool {
        !self.values(key).is_empty()
    }

    pub fn remove<T: AnnotationValue>(&mut self, key: &AnnotationKey<T>) {
        self.buckets.retain(|(name, _)| *name != key.name);
    }

    /// Debug renderings of all values stored under the key named `name`.
    pub fn debug_values(&self, name: &str) -> Vec<String> {
        self.buckets
            .iter()
            .filter(|(n, _)| *n == name)
            .flat_map(|(_, bucket)| bucket.debug_values())
            .collect()
    }

    /// Names of all keys that carry at least one value.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.buckets
            .iter()
            .filter(|(_, bucket)| !bucket.debug_values().is_empty())
            .map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD: AnnotationKey<String> = AnnotationKey::new("test.word");
    const FLAG: AnnotationKey<bool> = AnnotationKey::new("test.flag");

    #[test]
    fn test_values_sorted_by_probability() {
        let mut annotations = Annotations::default();
        annotations.add_value(&WORD, Value::unknown("unknown".to_string()));
        annotations.add_value(&WORD, Value::new("low".to_string(), 0.2));
        annotations.add_value(&WORD, Value::new("high".to_string(), 0.9));
        annotations.add_value(&WORD, Value::new("also-high".to_string(), 0.9));

        let order: Vec<&str> = annotations
            .values(&WORD)
            .iter()
            .map(|v| v.value.as_str())
            .collect();
        assert_eq!(order, vec!["high", "also-high", "low", "unknown"]);
    }

    #[test]
    fn test_set_value_replaces() {
        let mut annotations = Annotations::default();
        annotations.add_value(&WORD, Value::new("a".to_string(), 0.5));
        annotations.add_value(&WORD, Value::new("b".to_string(), 0.6));
        annotations.set_annotation(&WORD, "c".to_string());

        assert_eq!(annotations.values(&WORD).len(), 1);
        assert_eq!(annotations.annotation(&WORD).map(String::as_str), Some("c"));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut annotations = Annotations::default();
        annotations.set_annotation(&FLAG, true);

        assert!(annotations.contains(&FLAG));
        assert!(!annotations.contains(&WORD));
        assert!(annotations.values(&WORD).is_empty());

        annotations.remove(&FLAG);
        assert!(!annotations.contains(&FLAG));
    }

    #[test]
    fn test_probability_clamping() {
        assert_eq!(Probability::new(1.5), Probability::Known(1.0));
        assert_eq!(Probability::new(-0.5), Probability::Known(0.0));
        assert_eq!(Probability::new(f64::NAN), Probability::Unknown);
        assert_eq!(Probability::Unknown.or(0.8), 0.8);
    }

    #[test]
    fn test_debug_format() {
        let value = Value::new("geht", 0.9);
        assert_eq!(format!("{:?}", value), r#"Value("geht", p: 0.90)"#);
        assert_eq!(format!("{:?}", Value::unknown(1)), "Value(1, p: ?)");
    }
}
