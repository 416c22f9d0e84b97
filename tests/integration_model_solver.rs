//! Integration tests: gland model + solvers
//!
//! These tests exercise the full chain — steady-state setup, derivative
//! function and numerical integration — against the model's equilibrium
//! properties.

use ptg_rs::model::{state_index, PtgModel, ZERO_THRESHOLD};
use ptg_rs::solver::{BdfSolver, Scenario, Solver, SolverConfiguration};

mod common;
use common::test_helpers::assert_states_close;
use common::GlandFixture;

// =================================================================================================
// Equilibrium properties
// =================================================================================================

#[test]
fn equilibrium_patient_has_zero_derivative() {
    // Constant forcing and patient parameters equal to optimal: the
    // patient steady state is an exact fixed point, and every residual
    // rounding term falls inside the derivative deadband.
    let fixture = GlandFixture::default();
    let (model, y_pat) = fixture.equilibrium_patient();

    let dydt = model.derivatives(0.0, &y_pat);
    for (i, v) in dydt.iter().enumerate() {
        assert_eq!(*v, 0.0, "non-zero derivative at index {i}: {v}");
    }
}

#[test]
fn dialysis_patient_state_is_consistent_except_hyperplasia() {
    // A real dialysis patient sits at the algebraic steady state of every
    // balance except the carrying capacity, which keeps drifting while
    // the gland is larger than the optimal mass.
    let fixture = GlandFixture::default();
    let (model, y_pat) = fixture.dialysis_patient();

    let dydt = model.derivatives(0.0, &y_pat);
    for (i, v) in dydt.iter().enumerate() {
        if i == state_index::CARRYING_CAPACITY {
            assert!(*v > 0.0, "hyperplasia should continue for enlarged gland");
        } else {
            assert!(
                v.abs() < 1e-9,
                "unexpected drift at index {i}: {v}"
            );
        }
    }
}

#[test]
fn derivative_is_finite_along_a_perturbed_state() {
    let fixture = GlandFixture::default();
    let (model, mut y) = fixture.dialysis_patient();

    // Push a few states off equilibrium; the derivative must stay finite
    // and respect the deadband.
    y[state_index::SENSED_CALCIUM] *= 0.8;
    y[state_index::PLASMA_HORMONE] *= 1.5;
    y[state_index::PHOSPHATE_STIMULUS] = 0.2;

    let dydt = model.derivatives(100.0, &y);
    assert_eq!(dydt.len(), 23);
    for v in dydt.iter() {
        assert!(v.is_finite());
        assert!(*v == 0.0 || v.abs() >= ZERO_THRESHOLD);
    }
}

// =================================================================================================
// Integration scenarios
// =================================================================================================

#[test]
fn zero_length_span_returns_initial_condition_exactly() {
    let fixture = GlandFixture::default();
    let (model, y_pat) = fixture.equilibrium_patient();

    let scenario = Scenario::with_initial(Box::new(model), y_pat.clone());
    let config = SolverConfiguration::time_evolution(0.0, 0);
    let result = BdfSolver::new().solve(&scenario, &config).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.time_points[0], 0.0);
    assert_eq!(result.final_state, y_pat);
}

#[test]
fn bdf_holds_the_equilibrium_over_months() {
    let fixture = GlandFixture::default();
    let (model, y_pat) = fixture.equilibrium_patient();

    let scenario = Scenario::with_initial(Box::new(model), y_pat.clone());
    let config = SolverConfiguration::time_evolution(fixture.total_hours, 200);
    let result = BdfSolver::new().solve(&scenario, &config).unwrap();

    assert_states_close(
        &result.final_state,
        &y_pat,
        1e-6,
        "equilibrium drifted under integration",
    );
}

#[test]
fn bdf_integrates_dialysis_patient_with_therapy_ramp() {
    use ptg_rs::model::{patient_steady_state, therapy_ramp, PtgParams};

    let fixture = GlandFixture::default();
    let c_pat = fixture.c_opt * 0.95;
    let p_pat = 8.0;
    let d_pat = 9.0;
    let gfr = (-1e-3f64 * 365.0 * 5.0).exp();

    // Phosphate down to 4 mg/dL, calcitriol up to 75 ng/L, both over the
    // first quarter of a 12-month horizon.
    let endpoints_p = therapy_ramp(4.0 / p_pat, 0.25).unwrap();
    let endpoints_d = therapy_ramp(75.0 / d_pat, 0.25).unwrap();

    let y_pat = patient_steady_state(
        c_pat,
        p_pat,
        d_pat,
        fixture.c_opt,
        fixture.p_opt,
        fixture.d_opt,
        900.0,
        &endpoints_d,
        &endpoints_p,
        gfr,
    )
    .unwrap();

    let model = PtgModel::new(PtgParams {
        endpoints_p,
        endpoints_d,
        c_opt: fixture.c_opt,
        d_opt: fixture.d_opt,
        p_opt: fixture.p_opt,
        c_pat,
        p_pat,
        d_pat,
        s0: fixture.optimal_mass(),
        total_time: fixture.total_hours,
        gfr_in: gfr,
        y_pat: y_pat.clone(),
        calcium_clamp: true,
    });

    let start_ipth = y_pat[state_index::PLASMA_HORMONE];

    let scenario = Scenario::with_initial(Box::new(model), y_pat);
    let config = SolverConfiguration::time_evolution(fixture.total_hours, 600);
    let result = BdfSolver::new().solve(&scenario, &config).unwrap();

    // Correcting phosphate and calcitriol suppresses hormone secretion.
    let final_ipth = result.final_state[state_index::PLASMA_HORMONE];
    assert!(
        final_ipth < start_ipth,
        "therapy should lower iPTH: {final_ipth} vs {start_ipth}"
    );

    // The whole trajectory stays finite and the tracked populations
    // non-negative.
    for state in &result.state_trajectory {
        assert!(state.iter().all(|v| v.is_finite()));
        assert!(state[state_index::SECRETING_CELLS] > 0.0);
        assert!(state[state_index::PROLIFERATING_CELLS] > 0.0);
        assert!(state[state_index::PLASMA_HORMONE] > 0.0);
    }
}

#[test]
fn unclamped_calcium_mode_integrates_and_feeds_back() {
    let fixture = GlandFixture::default();
    let (clamped_model, y_pat) = fixture.dialysis_patient();

    // Same parameters with the clamp released.
    let mut params = clamped_model.params().clone();
    params.calcium_clamp = false;
    let model = PtgModel::new(params);

    let scenario = Scenario::with_initial(Box::new(model), y_pat);
    let config = SolverConfiguration::time_evolution(2000.0, 400);
    let result = BdfSolver::new().solve(&scenario, &config).unwrap();

    for state in &result.state_trajectory {
        assert!(state.iter().all(|v| v.is_finite()));
    }
    // The feedback auxiliaries move away from their clamped rest value.
    let final_feedback = result.final_state[state_index::CALCIUM_FEEDBACK_CALCITRIOL];
    assert!(final_feedback.is_finite());
}

#[test]
fn scenario_rejects_non_finite_initial_state() {
    let fixture = GlandFixture::default();
    let (model, mut y_pat) = fixture.equilibrium_patient();
    y_pat[3] = f64::NAN;

    let scenario = Scenario::with_initial(Box::new(model), y_pat);
    let config = SolverConfiguration::time_evolution(10.0, 10);
    let err = BdfSolver::new().solve(&scenario, &config).unwrap_err();
    assert!(err.contains("not finite"));
}
