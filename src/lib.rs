//! ptg-rs: Parathyroid Gland Simulation Framework
//!
//! Simulates the regulation of parathyroid hormone (PTH) secretion in
//! dialysis patients: gland mass dynamics, hormone release, and
//! multi-timescale calcium/phosphate/calcitriol feedback, as a 23-state
//! system of ordinary differential equations integrated under
//! patient-specific therapy forcing.
//!
//! # Architecture
//!
//! Two core principles, mirrored in the module layout:
//!
//! 1. **Separation of biology and numerics**
//!    - [`model`] defines the equations (what to solve)
//!    - [`solver`] provides the methods (how to solve)
//!    - [`physiology`] is the seam: the [`physiology::OdeSystem`] trait
//! 2. **Explicit, validated inputs**
//!    - [`config`] turns clinical units into model units once, up front
//!    - steady states are checked for finiteness before integration
//!
//! # Quick start
//!
//! ```rust
//! use ptg_rs::config::SimulationConfig;
//! use ptg_rs::model::{
//!     optimal_steady_state, patient_steady_state, PtgModel, PtgParams,
//! };
//! use ptg_rs::solver::{BdfSolver, Scenario, Solver, SolverConfiguration};
//!
//! # fn main() -> Result<(), String> {
//! let setup = SimulationConfig::default().setup()?;
//!
//! let y_opt = optimal_steady_state(setup.c_opt, setup.c_opt, setup.d_opt);
//! let y_pat = patient_steady_state(
//!     setup.c_pat, setup.p_pat, setup.d_pat,
//!     setup.c_opt, setup.p_opt, setup.d_opt,
//!     setup.pth_pat, &setup.endpoints_d, &setup.endpoints_p, setup.gfr_in,
//! )?;
//!
//! let model = PtgModel::new(PtgParams {
//!     endpoints_p: setup.endpoints_p.clone(),
//!     endpoints_d: setup.endpoints_d.clone(),
//!     c_opt: setup.c_opt,
//!     d_opt: setup.d_opt,
//!     p_opt: setup.p_opt,
//!     c_pat: setup.c_pat,
//!     p_pat: setup.p_pat,
//!     d_pat: setup.d_pat,
//!     s0: y_opt[0] + y_opt[1],
//!     total_time: setup.total_hours,
//!     gfr_in: setup.gfr_in,
//!     y_pat: y_pat.clone(),
//!     calcium_clamp: true,
//! });
//!
//! let scenario = Scenario::with_initial(Box::new(model), y_pat);
//! let config = SolverConfiguration::time_evolution(setup.total_hours, 600);
//! let result = BdfSolver::new().solve(&scenario, &config)?;
//!
//! println!("simulated {} time points", result.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod model;
pub mod output;
pub mod physiology;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use ptg_rs::prelude::*;
    //! ```
    pub use crate::config::{SimulationConfig, SimulationSetup};
    pub use crate::model::{
        optimal_steady_state, patient_steady_state, EndpointTable, PtgModel, PtgParams,
        StimulusKind, PTH_PLASMA_SCALE, STATE_DIM,
    };
    pub use crate::physiology::OdeSystem;
    pub use crate::solver::{
        BdfSolver, EulerSolver, Rk4Solver, Scenario, SimulationResult, Solver,
        SolverConfiguration,
    };
}
