//! Simulation scenario definition
//!
//! A scenario combines a system of equations with the initial condition
//! to integrate from. It is the "WHAT to solve"; the solver and its
//! configuration are the "HOW".

use nalgebra::DVector;

use crate::physiology::OdeSystem;

/// A concrete initial-value problem: system + initial state.
///
/// The same scenario can be solved with different numerical methods:
///
/// ```rust,ignore
/// let result_implicit = BdfSolver::new().solve(&scenario, &config)?;
/// let result_explicit = Rk4Solver::new().solve(&scenario, &config)?;
/// ```
pub struct Scenario {
    /// The equations.
    pub system: Box<dyn OdeSystem>,
    /// State to integrate from.
    pub initial: DVector<f64>,
}

impl Scenario {
    /// Create a scenario starting from the system's own initial state.
    pub fn new(system: Box<dyn OdeSystem>) -> Self {
        let initial = system.initial_state();
        Self { system, initial }
    }

    /// Create a scenario with an explicit initial state.
    pub fn with_initial(system: Box<dyn OdeSystem>, initial: DVector<f64>) -> Self {
        Self { system, initial }
    }

    /// Validate the scenario before integration.
    ///
    /// The initial condition is usually the output of the algebraic
    /// steady-state solver, whose divisions can produce NaN/Inf for
    /// degenerate parameters; catching that here surfaces the problem
    /// before the integrator chews on a poisoned state.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial.len() != self.system.dim() {
            return Err(format!(
                "initial state has {} entries but the system expects {}",
                self.initial.len(),
                self.system.dim()
            ));
        }
        if let Some(bad) = self.initial.iter().position(|v| !v.is_finite()) {
            return Err(format!(
                "initial state is not finite at index {bad}; refusing to integrate"
            ));
        }
        Ok(())
    }

    /// Name of the underlying system.
    pub fn system_name(&self) -> &str {
        self.system.name()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("system", &self.system_name())
            .field("dimension", &self.system.dim())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl OdeSystem for Decay {
        fn dim(&self) -> usize {
            2
        }

        fn derivatives(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
            -y.clone()
        }

        fn initial_state(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0, 2.0])
        }

        fn name(&self) -> &str {
            "Decay"
        }
    }

    #[test]
    fn scenario_uses_system_initial_state() {
        let scenario = Scenario::new(Box::new(Decay));
        assert_eq!(scenario.initial, DVector::from_vec(vec![1.0, 2.0]));
        assert!(scenario.validate().is_ok());
        assert_eq!(scenario.system_name(), "Decay");
    }

    #[test]
    fn validation_rejects_dimension_mismatch() {
        let scenario = Scenario::with_initial(Box::new(Decay), DVector::from_vec(vec![1.0]));
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_finite_initial_state() {
        let scenario =
            Scenario::with_initial(Box::new(Decay), DVector::from_vec(vec![1.0, f64::NAN]));
        let err = scenario.validate().unwrap_err();
        assert!(err.contains("not finite"));
    }
}
