//! Forward Euler solver
//!
//! First-order explicit time integration:
//!
//! ```text
//! yₙ₊₁ = yₙ + dt · f(tₙ, yₙ)
//! ```
//!
//! One function evaluation per step, global error O(dt). Kept as the
//! baseline method for accuracy/cost comparisons; the gland model itself
//! is stiff and belongs to [`crate::solver::BdfSolver`].

use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration};
use crate::physiology::validate_state;

/// Forward Euler method.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String> {
        config.validate()?;
        scenario.validate()?;

        let mut state = scenario.initial.clone();

        // Zero-length span: the trajectory is the initial condition.
        if config.total_time == 0.0 {
            let mut result =
                SimulationResult::new(vec![0.0], vec![state.clone()], state);
            result.add_metadata("solver", self.name());
            return Ok(result);
        }

        let time_steps = config.time_steps;
        let dt = config.total_time / (time_steps as f64);

        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut state_trajectory = Vec::with_capacity(time_steps + 1);
        time_points.push(0.0);
        state_trajectory.push(state.clone());

        for step in 0..time_steps {
            let t = (step as f64) * dt;
            let slope = scenario.system.derivatives(t, &state);
            state += slope * dt;

            // Time from the index, not accumulation: repeated `t += dt`
            // drifts by the rounding error of dt at every step.
            time_points.push((step as f64 + 1.0) * dt);
            state_trajectory.push(state.clone());

            validate_state(&state, step + 1)?;
        }

        let mut result = SimulationResult::new(time_points, state_trajectory, state);
        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("function evaluations", &time_steps.to_string());
        Ok(result)
    }

    fn name(&self) -> &str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
