//! Probability fusion for independent detections of the same fact.
//!
//! Two detections with probabilities `p1` and `p2` fuse to
//! `(p1 + p2) / (1 + p1 * p2)`. The rule is commutative, never drops below
//! the larger input, and `combine(p, 0) = p`.

use crate::Probability;

/// Fuse two probabilities.
///
/// If both are unknown the result is unknown; a single unknown side counts as `1.0`.
///
/// ```
/// use layered_text::{combine, Probability};
///
/// let fused = combine(Probability::new(0.5), Probability::new(0.5));
/// assert_eq!(fused, Probability::new(0.8));
/// assert_eq!(combine(Probability::Unknown, Probability::Unknown), Probability::Unknown);
/// ```
pub fn combine(p1: Probability, p2: Probability) -> Probability {
    match (p1, p2) {
        (Probability::Unknown, Probability::Unknown) => Probability::Unknown,
        (p1, p2) => Probability::new(combine_confidence(p1.or(1.0), p2.or(1.0))),
    }
}

/// Fuse two known confidences in `[0, 1]`.
pub fn combine_confidence(p1: f64, p2: f64) -> f64 {
    (p1 + p2) / (1.0 + p1 * p2)
}

/// [`combine_confidence`] for token confidences, computed in `f32`.
pub fn combine_f32(p1: f32, p2: f32) -> f32 {
    (p1 + p2) / (1.0 + p1 * p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_handling() {
        assert_eq!(
            combine(Probability::Unknown, Probability::new(0.3)),
            Probability::new(1.0)
        );
        assert_eq!(
            combine(Probability::new(0.3), Probability::Unknown),
            Probability::new(1.0)
        );
    }

    #[test]
    fn test_f32_fusion() {
        assert_eq!(combine_f32(0.5, 0.5), 0.8);
        assert_eq!(combine_f32(0.7, 0.0), 0.7);
        assert!((combine_f32(0.8, 0.6) - 0.945_945_9).abs() < 1e-6);
        assert!((f64::from(combine_f32(0.8, 0.6)) - combine_confidence(0.8, 0.6)).abs() < 1e-6);
    }
}
