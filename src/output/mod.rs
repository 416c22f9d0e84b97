//! Result export and visualization
//!
//! - [`csv`]: trajectory export for external analysis tools.
//! - [`plot`]: SVG plots of iPTH and individual state components.

pub mod csv;
pub mod plot;

pub use csv::{export_trajectory_csv, CsvConfig};
pub use plot::{plot_ipth, plot_states};
