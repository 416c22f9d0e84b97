//! Shared fixtures for the integration tests

pub mod systems;
pub mod test_helpers;

pub use systems::{ExponentialDecay, GlandFixture};
