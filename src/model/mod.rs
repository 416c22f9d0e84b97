//! The parathyroid gland model
//!
//! Biology lives here, numerics live in [`crate::solver`]. The modules
//! build on each other from the bottom up: smoothing primitives, stimulus
//! and sensitivity responses, kinetic rate laws, therapy forcing, the
//! algebraic steady states, and finally the 23-state derivative function.

pub mod forcing;
pub mod kinetics;
pub mod ptg;
pub mod smoothing;
pub mod steady_state;
pub mod stimulus;

pub use forcing::{constant_forcing, therapy_ramp};
pub use kinetics::{
    phosphate_release_multiplier, rate_adj, rate_adj_many, release_rate, KineticProcess,
    RateParams, PHOSPHATE_MMOL_PER_MGDL,
};
pub use ptg::{state_index, PtgModel, PtgParams, PTH_PLASMA_SCALE, STATE_DIM, ZERO_THRESHOLD};
pub use smoothing::{EndpointTable, DEFAULT_ALPHA};
pub use steady_state::{optimal_steady_state, patient_steady_state};
pub use stimulus::{sens, stim, StimulusKind};
