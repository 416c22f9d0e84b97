//! Numerical solver interface and result types
//!
//! # Design
//!
//! - [`SolverConfiguration`] says HOW to solve (span, step count).
//! - [`crate::solver::Scenario`] says WHAT to solve (system + initial state).
//! - [`Solver`] applies a numerical method and returns a
//!   [`SimulationResult`] — the trajectory plus metadata.
//!
//! The same scenario can be handed to different solvers, and the result
//! type is identical regardless of method, which is what makes solver
//! comparisons (accuracy, cost) one-line swaps.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::solver::Scenario;

/// Time-evolution configuration for an initial-value integration.
///
/// A zero-length span (`total_time == 0`) is explicitly allowed: solvers
/// return a trajectory holding exactly the initial condition, which
/// callers use as a cheap identity check on their setup.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfiguration {
    /// Total integration time span [h].
    pub total_time: f64,
    /// Number of fixed steps to divide the span into.
    pub time_steps: usize,
}

impl SolverConfiguration {
    /// Create a time-evolution configuration.
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self {
            total_time,
            time_steps,
        }
    }

    /// Validate that the parameters are meaningful.
    pub fn validate(&self) -> Result<(), String> {
        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(format!(
                "total time must be non-negative and finite, got {}",
                self.total_time
            ));
        }
        if self.total_time > 0.0 && self.time_steps == 0 {
            return Err("time steps must be greater than 0 for a non-empty span".to_string());
        }
        Ok(())
    }
}

/// Result of a numerical integration.
///
/// Owns the sampled trajectory; the core model is not responsible for its
/// storage beyond producing valid states.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Sample times, starting at 0.
    pub time_points: Vec<f64>,
    /// State vector at each sample time.
    pub state_trajectory: Vec<DVector<f64>>,
    /// Final state (equals the last trajectory entry).
    pub final_state: DVector<f64>,
    /// Solver-provided run information (method name, step size, ...).
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        time_points: Vec<f64>,
        state_trajectory: Vec<DVector<f64>>,
        final_state: DVector<f64>,
    ) -> Self {
        Self {
            time_points,
            state_trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    /// Number of sampled time points (including the initial condition).
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Attach a metadata entry.
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Time series of a single state component across the trajectory.
    ///
    /// Returns an error if `index` is out of range for the stored states.
    pub fn state_series(&self, index: usize) -> Result<Vec<f64>, String> {
        if let Some(state) = self.state_trajectory.first() {
            if index >= state.len() {
                return Err(format!(
                    "state index {index} out of range for dimension {}",
                    state.len()
                ));
            }
        }
        Ok(self.state_trajectory.iter().map(|y| y[index]).collect())
    }
}

/// A numerical integration method.
///
/// # Contract
///
/// `solve` validates the configuration and scenario, integrates the
/// scenario's system from its initial condition over the configured span,
/// and checks every produced state for NaN/Inf, failing at the first
/// breakdown rather than propagating poisoned values.
pub trait Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String>;

    /// Display name of the method.
    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================
