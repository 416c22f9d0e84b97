//! Helper assertions for the integration tests

use nalgebra::DVector;

/// Relative error, guarding the division for tiny references.
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs().max(1e-300)
}

/// Assert two state vectors agree elementwise within `tolerance`.
pub fn assert_states_close(a: &DVector<f64>, b: &DVector<f64>, tolerance: f64, message: &str) {
    assert_eq!(a.len(), b.len(), "{message}: dimension mismatch");
    for (i, (&va, &vb)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (va - vb).abs();
        assert!(
            diff < tolerance,
            "{message}: element {i} differs by {diff} (tolerance {tolerance})"
        );
    }
}
