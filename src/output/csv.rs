//! CSV export of simulation trajectories
//!
//! Writes the sampled trajectory as one row per time point: the time
//! column followed by the selected state components. The output opens in
//! Excel, pandas, R and MATLAB without further tooling.
//!
//! # Example
//!
//! ```rust,ignore
//! use ptg_rs::output::{export_trajectory_csv, CsvConfig};
//!
//! // Time plus the cell-mass and hormone states.
//! let config = CsvConfig {
//!     state_indices: Some(vec![0, 1, 2, 3]),
//!     ..Default::default()
//! };
//! export_trajectory_csv(&result, "trajectory.csv", Some(&config))?;
//! ```

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::solver::SimulationResult;

/// Export options.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter.
    pub delimiter: char,
    /// Decimal digits written per value.
    pub precision: usize,
    /// Prefix the data with `#`-commented metadata lines from the result.
    pub include_metadata: bool,
    /// Subset of state indices to export; `None` exports every component.
    pub state_indices: Option<Vec<usize>>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 9,
            include_metadata: true,
            state_indices: None,
        }
    }
}

/// Write a trajectory to `path` as CSV.
///
/// Fails on empty results, on state indices out of range, and on IO
/// errors.
pub fn export_trajectory_csv<P: AsRef<Path>>(
    result: &SimulationResult,
    path: P,
    config: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = CsvConfig::default();
    let config = config.unwrap_or(&default_config);

    if result.is_empty() {
        return Err("cannot export an empty trajectory".into());
    }

    let dim = result.state_trajectory[0].len();
    let indices: Vec<usize> = match &config.state_indices {
        Some(selected) => {
            if let Some(&bad) = selected.iter().find(|&&i| i >= dim) {
                return Err(format!("state index {bad} out of range for dimension {dim}").into());
            }
            selected.clone()
        }
        None => (0..dim).collect(),
    };

    let mut file = File::create(path.as_ref())?;
    log::info!("CSV export started: {}", path.as_ref().display());

    if config.include_metadata {
        writeln!(file, "# PTG simulation trajectory")?;
        let mut keys: Vec<&String> = result.metadata.keys().collect();
        keys.sort();
        for key in keys {
            writeln!(file, "# {}: {}", key, result.metadata[key])?;
        }
    }

    // Header row.
    let mut header = String::from("time_h");
    for &i in &indices {
        header.push(config.delimiter);
        header.push_str(&format!("y{i}"));
    }
    writeln!(file, "{header}")?;

    for (t, state) in result.time_points.iter().zip(&result.state_trajectory) {
        let mut row = format!("{t:.prec$}", prec = config.precision);
        for &i in &indices {
            row.push(config.delimiter);
            row.push_str(&format!("{v:.prec$}", v = state[i], prec = config.precision));
        }
        writeln!(file, "{row}")?;
    }

    log::info!("CSV export completed: {}", path.as_ref().display());
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
