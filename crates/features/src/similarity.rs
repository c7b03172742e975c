//! Cosine similarity between equal-length vectors.

/// Compute the cosine similarity of two vectors.
///
/// Returns `0.0` (never NaN, never an error) when the lengths differ or
/// either vector has zero magnitude; otherwise the standard dot product over
/// the product of magnitudes.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude > 0.0 {
        dot / magnitude
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.3, 0.5, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((sim + 1.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_score_exactly_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn zero_vectors_score_exactly_zero() {
        let zero = [0.0, 0.0, 0.0];
        let sim = cosine_similarity(&zero, &zero);
        assert_eq!(sim, 0.0);
        assert!(!sim.is_nan());
    }

    #[test]
    fn one_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    proptest! {
        #[test]
        fn similarity_is_bounded(
            a in proptest::collection::vec(-100.0f64..100.0, 1..16),
            b in proptest::collection::vec(-100.0f64..100.0, 1..16),
        ) {
            let sim = cosine_similarity(&a, &b);
            prop_assert!(!sim.is_nan());
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&sim));
        }

        #[test]
        fn similarity_is_symmetric(
            a in proptest::collection::vec(-10.0f64..10.0, 4),
            b in proptest::collection::vec(-10.0f64..10.0, 4),
        ) {
            let lhs = cosine_similarity(&a, &b);
            let rhs = cosine_similarity(&b, &a);
            prop_assert!((lhs - rhs).abs() < 1e-12);
        }
    }
}
