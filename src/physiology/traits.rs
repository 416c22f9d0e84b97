//! Model trait and state validation
//!
//! This module defines the seam between the biology and the numerics:
//! an [`OdeSystem`] supplies the equations, a [`crate::solver::Solver`]
//! integrates them. The same system can be handed to any solver, and a
//! solver never needs to know which system it is integrating.

use nalgebra::DVector;

/// A system of ordinary differential equations `dy/dt = f(t, y)`.
///
/// # Responsibility
///
/// Computes the right-hand side at a given time and state. Does NOT solve
/// it — that is the solver's job.
///
/// # Purity
///
/// Implementations must be pure functions of `(t, y)` and their own
/// immutable parameters: no hidden state may survive between calls. A
/// solver is free to evaluate the system at arbitrary trial points, in
/// any order, and concurrently (`Send + Sync`), e.g. while estimating a
/// Jacobian column by column.
pub trait OdeSystem: Send + Sync {
    /// Number of state variables.
    ///
    /// Used by solvers to allocate work vectors.
    fn dim(&self) -> usize;

    /// Right-hand side `f(t, y)`.
    ///
    /// `y` must have exactly [`Self::dim`] entries; implementations may
    /// assume it and are not required to re-validate on every call.
    fn derivatives(&self, t: f64, y: &DVector<f64>) -> DVector<f64>;

    /// Default initial condition for this system.
    fn initial_state(&self) -> DVector<f64>;

    /// Name of the system, used in logging and result metadata.
    fn name(&self) -> &str;

    /// Optional longer description.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Check a state vector for numerical breakdown.
///
/// NaN arises from undefined operations (`0/0`, `∞ − ∞`), infinity from
/// overflow or division by zero; either one poisons every downstream
/// value, so integration must stop at the step where it first appears.
pub fn validate_state(y: &DVector<f64>, step: usize) -> Result<(), String> {
    if y.iter().any(|v| v.is_nan()) {
        return Err(format!(
            "NaN detected in state at step {step}; this indicates numerical \
             instability — try more time steps"
        ));
    }
    if y.iter().any(|v| v.is_infinite()) {
        return Err(format!(
            "infinity detected in state at step {step}; this indicates \
             numerical overflow or a division by zero in the model"
        ));
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
