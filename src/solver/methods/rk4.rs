//! Classical fourth-order Runge-Kutta solver
//!
//! # Scheme
//!
//! Four slope estimates per step, combined with Simpson weights:
//!
//! ```text
//! k₁ = f(tₙ,        yₙ)
//! k₂ = f(tₙ + dt/2, yₙ + dt/2·k₁)
//! k₃ = f(tₙ + dt/2, yₙ + dt/2·k₂)
//! k₄ = f(tₙ + dt,   yₙ + dt·k₃)
//!
//! yₙ₊₁ = yₙ + dt/6·(k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! Fourth-order accurate (global error O(dt⁴)) at four function
//! evaluations per step; halving dt cuts the error by a factor of 16.
//!
//! # Applicability
//!
//! RK4 is explicit: excellent for smooth non-stiff systems, but the step
//! size is stability-limited on stiff ones. The full gland model mixes
//! sub-hour sensor relaxation with multi-month mass drift and needs the
//! implicit [`crate::solver::BdfSolver`]; RK4 is retained for sub-problem
//! studies and method comparison.

use crate::physiology::validate_state;
use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration};

/// Classical RK4 method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4Solver;

impl Rk4Solver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for Rk4Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String> {
        config.validate()?;
        scenario.validate()?;

        let mut state = scenario.initial.clone();

        if config.total_time == 0.0 {
            let mut result = SimulationResult::new(vec![0.0], vec![state.clone()], state);
            result.add_metadata("solver", self.name());
            return Ok(result);
        }

        let time_steps = config.time_steps;
        let dt = config.total_time / (time_steps as f64);

        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut state_trajectory = Vec::with_capacity(time_steps + 1);
        time_points.push(0.0);
        state_trajectory.push(state.clone());

        let system = scenario.system.as_ref();

        for step in 0..time_steps {
            let t = (step as f64) * dt;
            let half = dt / 2.0;

            let k1 = system.derivatives(t, &state);
            let k2 = system.derivatives(t + half, &(&state + &k1 * half));
            let k3 = system.derivatives(t + half, &(&state + &k2 * half));
            let k4 = system.derivatives(t + dt, &(&state + &k3 * dt));

            let weighted = k1 + k2 * 2.0 + k3 * 2.0 + k4;
            state += weighted * (dt / 6.0);

            time_points.push((step as f64 + 1.0) * dt);
            state_trajectory.push(state.clone());

            validate_state(&state, step + 1)?;
        }

        let mut result = SimulationResult::new(time_points, state_trajectory, state);
        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("function evaluations", &(4 * time_steps).to_string());
        Ok(result)
    }

    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    use crate::physiology::OdeSystem;

    struct ExponentialDecay {
        rate: f64,
    }

    impl OdeSystem for ExponentialDecay {
        fn dim(&self) -> usize {
            1
        }

        fn derivatives(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
            y * -self.rate
        }

        fn initial_state(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0])
        }

        fn name(&self) -> &str {
            "Exponential Decay"
        }
    }

    /// Harmonic oscillator as a first-order system:
    /// dy₀/dt = y₁, dy₁/dt = -ω²·y₀.
    struct HarmonicOscillator {
        omega: f64,
    }

    impl OdeSystem for HarmonicOscillator {
        fn dim(&self) -> usize {
            2
        }

        fn derivatives(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
            DVector::from_vec(vec![y[1], -self.omega * self.omega * y[0]])
        }

        fn initial_state(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0, 0.0])
        }

        fn name(&self) -> &str {
            "Harmonic Oscillator"
        }
    }

    #[test]
    fn rk4_is_sharp_on_exponential_decay() {
        let scenario = Scenario::new(Box::new(ExponentialDecay { rate: 0.1 }));
        let config = SolverConfiguration::time_evolution(10.0, 100);
        let result = Rk4Solver::new().solve(&scenario, &config).unwrap();

        let expected = (-1.0f64).exp();
        let error = (result.final_state[0] - expected).abs();
        assert!(error < 1e-4, "RK4 error too large: {error}");
    }

    #[test]
    fn rk4_returns_to_start_after_full_oscillator_period() {
        let scenario = Scenario::new(Box::new(HarmonicOscillator { omega: 1.0 }));
        let period = 2.0 * std::f64::consts::PI;
        let config = SolverConfiguration::time_evolution(period, 200);
        let result = Rk4Solver::new().solve(&scenario, &config).unwrap();

        assert!((result.final_state[0] - 1.0).abs() < 1e-3);
        assert!(result.final_state[1].abs() < 1e-3);
    }

    #[test]
    fn rk4_time_points_are_uniform() {
        let scenario = Scenario::new(Box::new(ExponentialDecay { rate: 0.1 }));
        let config = SolverConfiguration::time_evolution(20.0, 100);
        let result = Rk4Solver::new().solve(&scenario, &config).unwrap();

        let dt = 0.2;
        for pair in result.time_points.windows(2) {
            assert!(((pair[1] - pair[0]) - dt).abs() < 1e-10);
        }
    }

    #[test]
    fn rk4_records_function_evaluation_count() {
        let scenario = Scenario::new(Box::new(ExponentialDecay { rate: 0.1 }));
        let config = SolverConfiguration::time_evolution(1.0, 50);
        let result = Rk4Solver::new().solve(&scenario, &config).unwrap();
        assert_eq!(
            result.metadata.get("function evaluations"),
            Some(&"200".to_string())
        );
    }
}
