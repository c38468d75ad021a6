//! Property-based tests for the covariance estimator.
//!
//! - Output is symmetric
//! - Shrinkage intensity stays in [0, 1]
//! - wᵀΣw >= 0 for arbitrary weight vectors, not only long-only ones

use aegis_math::covariance::ledoit_wolf;
use aegis_math::statistics::population_variance;
use nalgebra::DMatrix;
use proptest::prelude::*;

/// Generates a (rows, cols, values) panel of bounded daily returns.
fn panel() -> impl Strategy<Value = DMatrix<f64>> {
    (2usize..40, 1usize..6).prop_flat_map(|(t, n)| {
        prop::collection::vec(-0.1f64..0.1, t * n)
            .prop_map(move |v| DMatrix::from_column_slice(t, n, &v))
    })
}

proptest! {
    #[test]
    fn prop_shrunk_covariance_is_symmetric(returns in panel()) {
        let est = ledoit_wolf(&returns).unwrap();
        prop_assert!(est.is_symmetric(0.0));
        prop_assert!((0.0..=1.0).contains(&est.shrinkage()));
    }

    #[test]
    fn prop_quadratic_form_non_negative(
        returns in panel(),
        raw_weights in prop::collection::vec(-2.0f64..2.0, 6),
    ) {
        let est = ledoit_wolf(&returns).unwrap();
        let weights = &raw_weights[..est.dim()];
        let q = est.quadratic_form(weights).unwrap();
        let scale = est.matrix().trace().max(1e-300);
        prop_assert!(q >= -1e-12 * scale, "quadratic form {} < 0", q);
        prop_assert!(est.ensure_positive_semidefinite().is_ok());
    }

    #[test]
    fn prop_single_instrument_matches_variance(
        xs in prop::collection::vec(-0.1f64..0.1, 2..60),
        weight in 0.0f64..1.0,
    ) {
        let returns = DMatrix::from_column_slice(xs.len(), 1, &xs);
        let est = ledoit_wolf(&returns).unwrap();
        let via_matrix = est.quadratic_form(&[weight]).unwrap();
        let direct = population_variance(&xs) * weight * weight;
        prop_assert!((via_matrix - direct).abs() <= 1e-15 + 1e-9 * direct.abs());
    }
}
