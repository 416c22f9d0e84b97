//! Trajectory plots
//!
//! Renders the quantities of interest against time in days:
//! [`plot_ipth`] draws the plasma iPTH curve (state 3 scaled into the
//! reporting unit), [`plot_states`] draws one panel per selected state
//! component into a single image grid.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::model::state_index::PLASMA_HORMONE;
use crate::model::PTH_PLASMA_SCALE;
use crate::solver::SimulationResult;

const HOURS_PER_DAY: f64 = 24.0;

fn axis_range(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-9);
    (lo - pad, hi + pad)
}

/// Plot plasma iPTH against time in days.
///
/// * `unit_factor` — factor converting pg/mL into the reporting unit
///   (1 for pg/mL, 0.106 for pmol/L).
/// * `unit_label` — axis label, e.g. `"pg/mL"`.
pub fn plot_ipth<P: AsRef<Path>>(
    result: &SimulationResult,
    unit_factor: f64,
    unit_label: &str,
    path: P,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() {
        return Err("cannot plot an empty trajectory".into());
    }

    let days: Vec<f64> = result.time_points.iter().map(|t| t / HOURS_PER_DAY).collect();
    let ipth: Vec<f64> = result
        .state_series(PLASMA_HORMONE)?
        .iter()
        .map(|v| v * PTH_PLASMA_SCALE * unit_factor)
        .collect();

    let (y_lo, y_hi) = axis_range(&ipth);
    let x_hi = days.last().copied().unwrap_or(1.0).max(1e-9);

    let root = SVGBackend::new(path.as_ref(), (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("iPTH", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Time [days]")
        .y_desc(format!("iPTH [{unit_label}]"))
        .draw()?;

    chart.draw_series(LineSeries::new(
        days.iter().copied().zip(ipth.iter().copied()),
        &BLUE,
    ))?;

    root.present()?;
    log::info!("iPTH plot written to {}", path.as_ref().display());
    Ok(())
}

/// Plot selected state components, one panel per index, in a grid.
pub fn plot_states<P: AsRef<Path>>(
    result: &SimulationResult,
    indices: &[usize],
    path: P,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() {
        return Err("cannot plot an empty trajectory".into());
    }
    if indices.is_empty() {
        return Err("no state indices selected for plotting".into());
    }

    let days: Vec<f64> = result.time_points.iter().map(|t| t / HOURS_PER_DAY).collect();
    let x_hi = days.last().copied().unwrap_or(1.0).max(1e-9);

    let columns = 2usize;
    let rows = indices.len().div_ceil(columns);

    let root =
        SVGBackend::new(path.as_ref(), (500 * columns as u32, 350 * rows as u32))
            .into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((rows, columns));

    for (panel, &index) in panels.iter().zip(indices) {
        let series = result.state_series(index)?;
        let (y_lo, y_hi) = axis_range(&series);

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("state {index}"), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..x_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Time [days]")
            .draw()?;

        chart.draw_series(LineSeries::new(
            days.iter().copied().zip(series.iter().copied()),
            &BLUE,
        ))?;
    }

    root.present()?;
    log::info!("state plots written to {}", path.as_ref().display());
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
