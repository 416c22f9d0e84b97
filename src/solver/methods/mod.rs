//! Numerical integration methods
//!
//! - [`EulerSolver`]: first-order explicit baseline.
//! - [`Rk4Solver`]: fourth-order explicit, for non-stiff sub-problems.
//! - [`BdfSolver`]: second-order implicit backward differentiation, the
//!   production method for the stiff gland model.

mod bdf;
mod euler;
mod rk4;

pub use bdf::BdfSolver;
pub use euler::EulerSolver;
pub use rk4::Rk4Solver;
