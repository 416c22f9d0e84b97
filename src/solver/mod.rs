//! Numerical solvers
//!
//! A solver applies a numerical method to the equations provided by an
//! [`crate::physiology::OdeSystem`] within a [`Scenario`].
//!
//! # Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** — WHAT to solve: the system plus its initial state.
//! 2. **Configuration** — HOW to solve: time span and step count.
//! 3. **Solver** — the numerical method, independent of the biology.
//!
//! This separation lets the same gland scenario run under the implicit
//! production method and the explicit reference methods without touching
//! the model, and lets the solvers be exercised on small analytical
//! systems in isolation.
//!
//! # Method choice
//!
//! The gland model is stiff (sensor relaxation within the hour, gland
//! mass drift over months); use [`BdfSolver`]. The explicit methods are
//! kept for convergence studies and non-stiff sub-problems — substituting
//! one for the implicit method on the full model needs a stability
//! re-validation, not just a type swap.

mod methods;
mod scenario;
mod traits;

pub use methods::{BdfSolver, EulerSolver, Rk4Solver};
pub use scenario::Scenario;
pub use traits::{SimulationResult, Solver, SolverConfiguration};
