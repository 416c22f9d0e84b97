//! Algebraically consistent steady states
//!
//! The ODE system is initialized from closed-form equilibria rather than a
//! numerical root find: once the rate adjustments are evaluated at their
//! reference points, the proliferation/apoptosis and
//! production/release/clearance balances become linear and can be chained
//! by direct substitution.
//!
//! Two variants exist. [`optimal_steady_state`] describes the healthy
//! reference physiology with phosphate and calcitriol exactly optimal; it
//! supplies the optimal hormone level and gland mass that normalize the
//! patient run. [`patient_steady_state`] solves the analogous balance for
//! a dialysis patient whose calcium, phosphate, calcitriol and target
//! hormone level all deviate from optimal, and is used as the integration
//! initial condition.

use nalgebra::DVector;

use super::kinetics::{phosphate_release_multiplier, rate_adj, release_rate, KineticProcess};
use super::ptg::{sign, state_index, PTH_PLASMA_SCALE, STATE_DIM};
use super::smoothing::EndpointTable;
use super::stimulus::{sens, stim, StimulusKind};

// Constants shared with the derivative function; the steady states must
// balance exactly the same rates the dynamics use.
const APOPTOSIS_RATE: f64 = 0.001 * 60.0;
const TRANSITION_OUT: f64 = 0.03 * 60.0;
const TRANSITION_IN: f64 = 4.0 * TRANSITION_OUT;
const CALCIUM_GAIN: f64 = 0.5;
const CALCIUM_RELAXATION: f64 = 0.5;
const CALCITRIOL_GAIN: f64 = 0.001;
const CALCITRIOL_RELAXATION: f64 = 0.001;

/// Saturating normalization mapping a raw stimulus `a` onto the sensor
/// rest state it sustains: `a / (1 + a·sign(a))`.
#[inline]
fn saturated_sensor(a: f64) -> f64 {
    a / (1.0 + a * sign(a))
}

/// Steady state of the optimal (healthy) physiology.
///
/// Assumes phosphate and calcitriol sit exactly at their optimal values,
/// so every sensor rests at 0 or 1. `c` is the calcium level the release
/// law is evaluated at; passing `c = c_opt` gives the reference
/// equilibrium.
///
/// The returned 23-vector fixes the cell-population split by the
/// proliferation/apoptosis balance (`s2/s1 == k1/k2`), then chains the
/// production → release → clearance balance for the hormone pools.
pub fn optimal_steady_state(c: f64, c_opt: f64, d_opt: f64) -> DVector<f64> {
    use state_index::*;

    let prolif = rate_adj(1.0, KineticProcess::Proliferation.default_params());

    // Population split from the proliferation/apoptosis balance.
    let s2 = 1.0 / (1.0 + TRANSITION_OUT / TRANSITION_IN) * (-APOPTOSIS_RATE / prolif).exp();
    let s1 = TRANSITION_OUT * s2 / TRANSITION_IN;

    // Hormone store and plasma pool from the rate balance at rest.
    let release = release_rate(c / 4.0, 1.0, c_opt / 4.0);
    let s3 = rate_adj(1.0, KineticProcess::Production.default_params()) * s1
        / (release + rate_adj(1.0, KineticProcess::Degradation.default_params()));
    let s4 = s3 * release / rate_adj(1.0, KineticProcess::Clearance.default_params());

    let mut y = DVector::zeros(STATE_DIM);
    y[SECRETING_CELLS] = s1;
    y[PROLIFERATING_CELLS] = s2;
    y[HORMONE_STORE] = s3;
    y[PLASMA_HORMONE] = s4;
    y[FAST_CALCIUM_SENSOR] = 1.0;
    y[FAST_CALCITRIOL_SENSOR] = 1.0;
    y[DEGRADATION_SENSOR] = 1.0;
    y[PRODUCTION_SENSOR] = 1.0;
    y[PROLIFERATION_SENSOR] = 1.0;
    y[SENSED_CALCIUM] = c_opt;
    y[SENSED_CALCITRIOL] = d_opt;
    y[CARRYING_CAPACITY] = 1.0;
    y[CALCIUM_FEEDBACK_HORMONE] = 1.0;
    y[CALCIUM_FEEDBACK_CALCITRIOL] = 1.0;
    y
}

/// Steady state of a specific patient's physiology.
///
/// * `c_pat`, `p_pat`, `d_pat` — patient baselines [mg/dL, mg/dL, ng/L].
/// * `c_opt`, `p_opt`, `d_opt` — optimal levels in the same units.
/// * `pth_pat` — patient iPTH [pg/mL].
/// * `endpoints_d`, `endpoints_p` — therapy profiles; they are evaluated
///   at `t = 0` because therapy may already be partway through a ramp at
///   simulation start, so the effective baselines need not equal the raw
///   patient values.
/// * `gfr` — GFR-derived clearance input, the same value the derivative
///   function is given.
///
/// The fast calcium/calcitriol sensor rest states come from a closed-form
/// 2×2 linear solve of the coupled sensor balance; the divisions involved
/// can vanish for degenerate parameter combinations, so the computed state
/// is checked for finiteness and a non-finite result is returned as an
/// error instead of leaking into the integrator.
#[allow(clippy::too_many_arguments)]
pub fn patient_steady_state(
    c_pat: f64,
    p_pat: f64,
    d_pat: f64,
    c_opt: f64,
    p_opt: f64,
    d_opt: f64,
    pth_pat: f64,
    endpoints_d: &EndpointTable,
    endpoints_p: &EndpointTable,
    gfr: f64,
) -> Result<DVector<f64>, String> {
    use state_index::*;

    let pth = pth_pat / PTH_PLASMA_SCALE;

    // Effective starting levels: baseline scaled by the ramp at t = 0.
    let d_eff = d_pat * endpoints_d.smooth_at(0.0);
    let p_eff = p_pat * endpoints_p.smooth_at(0.0);

    // Raw stimuli of the baseline deviations and the first-order sensor
    // rest states they sustain.
    let stim_ca = stim(c_pat - c_opt, StimulusKind::Calcium);
    let stim_p = stim(p_eff - p_opt, StimulusKind::Phosphate);
    let stim_d = stim(d_eff - d_opt, StimulusKind::Calcitriol);

    let yc = saturated_sensor(stim_ca);
    let yp = saturated_sensor(stim_p);
    let yd = saturated_sensor(stim_d);

    // Closed-form solve of the coupled fast-sensor balance:
    //   0 = a·ysc + b·(ysd − 1) + rca·(1 − ysc)
    //   0 = aq·ysd + bq·(ysc − 1) + rd·(1 − ysd)
    let a = CALCIUM_GAIN * (yc - 2.0 * yp);
    let b = CALCIUM_GAIN * 0.1;
    let aq = CALCITRIOL_GAIN * (yd - 2.0 * yp);
    let bq = CALCITRIOL_GAIN * 0.1;

    let ysc = (b - b * (bq - CALCITRIOL_RELAXATION) / (aq - CALCITRIOL_RELAXATION)
        - CALCIUM_RELAXATION)
        / (a - b * bq / (aq - CALCITRIOL_RELAXATION) - CALCIUM_RELAXATION);
    let ysd = (-CALCITRIOL_RELAXATION + bq * (1.0 - ysc)) / (aq - CALCITRIOL_RELAXATION);

    // Receptor sensitivity at the sensor rest point.
    let sensitivity = sens(ysc, ysd);
    let c_sensed = sensitivity * c_pat;
    let d_sensed = sensitivity * d_eff;

    // Rest states of the kinetic sensor pairs under the sensed calcium.
    let stim_sensed = stim(c_sensed - c_opt, StimulusKind::Calcium);
    let c_star = saturated_sensor(stim_sensed);
    let p_star = saturated_sensor(stim_p);
    let cs_star =
        CALCIUM_RELAXATION / (CALCIUM_RELAXATION - 50.0 * CALCIUM_GAIN * (c_star - p_star));

    // Phosphate-corrected release multiplier, same formula as the
    // derivative function.
    let rp = phosphate_release_multiplier(p_eff, p_opt);
    let release = release_rate(c_sensed / 4.0, rp, c_opt / 4.0);

    // Chain the hormone balance backwards from the target plasma level.
    let clearance = rate_adj(gfr, KineticProcess::Clearance.default_params());
    let s3 = pth * clearance / release;
    let s1 = (release + rate_adj(cs_star, KineticProcess::Degradation.default_params())) * s3
        / rate_adj(cs_star, KineticProcess::Production.default_params());
    let s2 = TRANSITION_IN * s1 / TRANSITION_OUT;

    // Carrying-capacity reference holding the population in log-growth
    // equilibrium.
    let capacity = (APOPTOSIS_RATE
        / rate_adj(cs_star, KineticProcess::Proliferation.default_params()))
    .exp()
        * (s1 + s2);

    let mut y = DVector::zeros(STATE_DIM);
    y[SECRETING_CELLS] = s1;
    y[PROLIFERATING_CELLS] = s2;
    y[HORMONE_STORE] = s3;
    y[PLASMA_HORMONE] = pth;
    y[FAST_CALCIUM_SENSOR] = ysc;
    y[FAST_CALCITRIOL_SENSOR] = ysd;
    y[CALCIUM_STIMULUS] = yc;
    y[CALCITRIOL_STIMULUS] = yd;
    y[PHOSPHATE_STIMULUS] = yp;
    y[DEGRADATION_SENSOR] = cs_star;
    y[DEGRADATION_STIMULUS] = c_star;
    y[PRODUCTION_SENSOR] = cs_star;
    y[PRODUCTION_STIMULUS] = c_star;
    y[PROLIFERATION_SENSOR] = cs_star;
    y[PROLIFERATION_STIMULUS] = c_star;
    y[SENSED_CALCIUM] = c_sensed;
    y[SENSED_CALCITRIOL] = d_sensed;
    y[PHOSPHATE_RELAX_DEGRADATION] = p_star;
    y[PHOSPHATE_RELAX_PRODUCTION] = p_star;
    y[PHOSPHATE_RELAX_PROLIFERATION] = p_star;
    y[CARRYING_CAPACITY] = capacity;
    y[CALCIUM_FEEDBACK_HORMONE] = 1.0;
    y[CALCIUM_FEEDBACK_CALCITRIOL] = 1.0;

    if let Some(bad) = y.iter().position(|v| !v.is_finite()) {
        return Err(format!(
            "patient steady state is not finite at index {bad}; \
             degenerate parameter combination"
        ));
    }

    Ok(y)
}

// =================================================================================================
// Tests
// =================================================================================================
