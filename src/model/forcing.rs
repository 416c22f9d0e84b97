//! Therapy forcing profiles
//!
//! Phosphate and calcitriol therapy is modeled as a ramp of the plasma
//! level from the patient baseline towards a target, completed after a
//! configured fraction of the simulated horizon and held constant
//! afterwards. The profile is stored as an [`EndpointTable`] over
//! normalized time (0 = simulation start, 1 = horizon end) with relative
//! values (1 = baseline), and is evaluated through the smooth
//! interpolation so the derivative stays continuous for the implicit
//! integrator.

use super::smoothing::EndpointTable;

/// Ramp from baseline (relative level 1) to `target_ratio`, completed at
/// `ramp_fraction` of the horizon, constant afterwards.
///
/// `ramp_fraction` must lie strictly inside `(0, 1)` so the interior knot
/// does not collide with the boundary points.
pub fn therapy_ramp(target_ratio: f64, ramp_fraction: f64) -> Result<EndpointTable, String> {
    if !(ramp_fraction > 0.0 && ramp_fraction < 1.0) {
        return Err(format!(
            "therapy ramp fraction must lie in (0, 1), got {ramp_fraction}"
        ));
    }
    if !target_ratio.is_finite() || target_ratio <= 0.0 {
        return Err(format!(
            "therapy target ratio must be positive and finite, got {target_ratio}"
        ));
    }
    EndpointTable::new(
        vec![0.0, ramp_fraction, 1.0],
        vec![1.0, target_ratio, target_ratio],
    )
}

/// Constant forcing at the baseline level (no therapy ramp).
pub fn constant_forcing() -> EndpointTable {
    EndpointTable::new(vec![0.0, 0.5, 1.0], vec![1.0, 1.0, 1.0])
        .expect("static constant forcing table is valid")
}

// =================================================================================================
// Tests
// =================================================================================================
