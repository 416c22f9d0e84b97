//! Simulation driver
//!
//! Loads the clinical configuration (`ptg_config.json` in the working
//! directory, defaults otherwise), derives the model setup, computes the
//! optimal and patient steady states, integrates the gland model with the
//! implicit solver, and writes the trajectory as CSV plus iPTH/state
//! plots.
//!
//! ```bash
//! RUST_LOG=info cargo run --bin simulate
//! ```

use std::process::ExitCode;
use std::time::Instant;

use ptg_rs::config::SimulationConfig;
use ptg_rs::model::{
    optimal_steady_state, patient_steady_state, state_index, PtgModel, PtgParams,
    PTH_PLASMA_SCALE,
};
use ptg_rs::output::{export_trajectory_csv, plot_ipth, plot_states, CsvConfig};
use ptg_rs::solver::{BdfSolver, Scenario, Solver, SolverConfiguration};

const CONFIG_PATH: &str = "ptg_config.json";
const TIME_STEPS: usize = 2000;

fn run() -> Result<(), String> {
    let config = SimulationConfig::load_or_default(CONFIG_PATH);
    let setup = config.setup()?;

    log::info!(
        "optimal levels: Ca {:.3} mg/dL, P {:.3} mg/dL, D {:.3} ng/L",
        setup.c_opt,
        setup.p_opt,
        setup.d_opt
    );
    log::info!(
        "patient baselines: Ca {:.3} mg/dL, P {:.3} mg/dL, D {:.3} ng/L, iPTH {:.1} pg/mL",
        setup.c_pat,
        setup.p_pat,
        setup.d_pat,
        setup.pth_pat
    );

    // Reference physiology: normalizes gland mass and reports the
    // optimal hormone level.
    let y_opt = optimal_steady_state(setup.c_opt, setup.c_opt, setup.d_opt);
    let s0 = y_opt[state_index::SECRETING_CELLS] + y_opt[state_index::PROLIFERATING_CELLS];
    let pth_opt = y_opt[state_index::PLASMA_HORMONE] * PTH_PLASMA_SCALE;
    log::info!("optimal iPTH {pth_opt:.1} pg/mL, optimal gland mass {s0:.4}");

    // Patient equilibrium; fails (before any integration) on degenerate
    // parameter combinations.
    let y_pat = patient_steady_state(
        setup.c_pat,
        setup.p_pat,
        setup.d_pat,
        setup.c_opt,
        setup.p_opt,
        setup.d_opt,
        setup.pth_pat,
        &setup.endpoints_d,
        &setup.endpoints_p,
        setup.gfr_in,
    )?;

    let model = PtgModel::new(PtgParams {
        endpoints_p: setup.endpoints_p.clone(),
        endpoints_d: setup.endpoints_d.clone(),
        c_opt: setup.c_opt,
        d_opt: setup.d_opt,
        p_opt: setup.p_opt,
        c_pat: setup.c_pat,
        p_pat: setup.p_pat,
        d_pat: setup.d_pat,
        s0,
        total_time: setup.total_hours,
        gfr_in: setup.gfr_in,
        y_pat: y_pat.clone(),
        calcium_clamp: true,
    });

    let scenario = Scenario::with_initial(Box::new(model), y_pat);
    let solver_config = SolverConfiguration::time_evolution(setup.total_hours, TIME_STEPS);
    let solver = BdfSolver::new();

    log::info!(
        "integrating {:.0} h in {} steps with {}",
        setup.total_hours,
        TIME_STEPS,
        solver.name()
    );
    let started = Instant::now();
    let result = solver.solve(&scenario, &solver_config)?;
    log::info!(
        "integration finished in {:.2} s ({} Newton iterations)",
        started.elapsed().as_secs_f64(),
        result
            .metadata
            .get("newton iterations")
            .map(String::as_str)
            .unwrap_or("?")
    );

    let final_ipth = result.final_state[state_index::PLASMA_HORMONE]
        * PTH_PLASMA_SCALE
        * setup.pth_display_factor;
    log::info!("final iPTH: {final_ipth:.1}");

    // Cell populations and the hormone pools are the documented
    // quantities of interest.
    let csv_config = CsvConfig::default();
    export_trajectory_csv(&result, "trajectory.csv", Some(&csv_config))
        .map_err(|e| format!("CSV export failed: {e}"))?;

    let unit_label = if setup.pth_display_factor == 1.0 {
        "pg/mL"
    } else {
        "pmol/L"
    };
    plot_ipth(&result, setup.pth_display_factor, unit_label, "ipth.svg")
        .map_err(|e| format!("iPTH plot failed: {e}"))?;
    plot_states(&result, &[0, 1, 2, 3], "states.svg")
        .map_err(|e| format!("state plot failed: {e}"))?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
