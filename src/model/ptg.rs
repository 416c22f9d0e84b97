//! Parathyroid gland dynamics
//!
//! The 23-state ODE right-hand side. The state couples gland-cell mass,
//! hormone production and release, and a battery of feedback sensors that
//! track calcium, phosphate and calcitriol deviations at widely separated
//! time constants, which is what makes the system stiff.
//!
//! The derivative is a pure function of `(t, y, params)`: no hidden state
//! survives between calls, so a solver may evaluate it at arbitrary trial
//! points in any order.

use nalgebra::DVector;

use crate::physiology::OdeSystem;

use super::kinetics::{phosphate_release_multiplier, rate_adj, release_rate, KineticProcess};
use super::smoothing::EndpointTable;
use super::stimulus::{sens, stim, StimulusKind};

/// Number of state variables.
pub const STATE_DIM: usize = 23;

/// Plasma hormone state entries are in model units; multiply by this to
/// obtain iPTH in pg/mL.
pub const PTH_PLASMA_SCALE: f64 = 9.434 / 3.0;

/// Derivatives whose magnitude falls below this threshold are forced to
/// exactly zero, suppressing integrator-destabilizing noise from
/// near-equilibrium terms.
pub const ZERO_THRESHOLD: f64 = 1e-12;

/// Fixed meaning of every state index.
pub mod state_index {
    /// Hormone-secreting gland-cell pool.
    pub const SECRETING_CELLS: usize = 0;
    /// Proliferating gland-cell pool, subject to apoptosis and log-growth.
    pub const PROLIFERATING_CELLS: usize = 1;
    /// Intracellular hormone store.
    pub const HORMONE_STORE: usize = 2;
    /// Plasma hormone pool (iPTH after scaling).
    pub const PLASMA_HORMONE: usize = 3;
    /// Fast calcium sensor.
    pub const FAST_CALCIUM_SENSOR: usize = 4;
    /// Fast calcitriol sensor.
    pub const FAST_CALCITRIOL_SENSOR: usize = 5;
    /// First-order calcium stimulus state.
    pub const CALCIUM_STIMULUS: usize = 6;
    /// First-order calcitriol stimulus state.
    pub const CALCITRIOL_STIMULUS: usize = 7;
    /// First-order phosphate stimulus state.
    pub const PHOSPHATE_STIMULUS: usize = 8;
    /// Degradation-controlling calcium sensor pair.
    pub const DEGRADATION_SENSOR: usize = 9;
    pub const DEGRADATION_STIMULUS: usize = 10;
    /// Production-controlling calcium sensor pair.
    pub const PRODUCTION_SENSOR: usize = 11;
    pub const PRODUCTION_STIMULUS: usize = 12;
    /// Proliferation-controlling calcium sensor pair.
    pub const PROLIFERATION_SENSOR: usize = 13;
    pub const PROLIFERATION_STIMULUS: usize = 14;
    /// Low-pass sensed calcium.
    pub const SENSED_CALCIUM: usize = 15;
    /// Low-pass sensed calcitriol.
    pub const SENSED_CALCITRIOL: usize = 16;
    /// Phosphate stimulus relaxations at three time constants.
    pub const PHOSPHATE_RELAX_DEGRADATION: usize = 17;
    pub const PHOSPHATE_RELAX_PRODUCTION: usize = 18;
    pub const PHOSPHATE_RELAX_PROLIFERATION: usize = 19;
    /// Slowly drifting gland carrying capacity.
    pub const CARRYING_CAPACITY: usize = 20;
    /// Long-memory hormone feedback on plasma calcium (unclamped mode).
    pub const CALCIUM_FEEDBACK_HORMONE: usize = 21;
    /// Long-memory calcitriol feedback on plasma calcium (unclamped mode).
    pub const CALCIUM_FEEDBACK_CALCITRIOL: usize = 22;
}

// Sensor relaxation time constants and coupling gains [1/h].
const TAU_CALCIUM: f64 = 1.0;
const TAU_CALCITRIOL: f64 = 0.1;
const TAU_PHOSPHATE: f64 = 0.1;
const CALCIUM_GAIN: f64 = 0.5;
const CALCIUM_RELAXATION: f64 = 0.5;
const CALCITRIOL_GAIN: f64 = 0.001;
const CALCITRIOL_RELAXATION: f64 = 0.001;

/// Apoptosis rate of proliferating cells [1/h].
const APOPTOSIS_RATE: f64 = 0.001 * 60.0;

/// Transition rates between the secreting and proliferating pools [1/h].
const TRANSITION_OUT: f64 = 0.03 * 60.0;
const TRANSITION_IN: f64 = 4.0 * TRANSITION_OUT;

/// Growth rate of the carrying capacity under sustained gland overload.
const HYPERPLASIA_RATE: f64 = 1e-5;

/// Sign with `sign(0) == 0`, matching the saturating sensor algebra.
#[inline]
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// First-order relaxation of a sensor state `y` towards a saturating
/// target driven by the stimulus `s`.
#[inline]
fn stimulus_relaxation(s: f64, y: f64, rate: f64) -> f64 {
    (s * (1.0 - sign(s) * y) - y) * rate
}

/// Everything the derivative needs besides `(t, y)`.
///
/// Constructed once per simulation and never mutated; the patient steady
/// state `y_pat` serves as the reference baseline inside the long-memory
/// feedback terms.
#[derive(Debug, Clone)]
pub struct PtgParams {
    /// Phosphate therapy profile over normalized time.
    pub endpoints_p: EndpointTable,
    /// Calcitriol therapy profile over normalized time.
    pub endpoints_d: EndpointTable,
    /// Optimal ionized calcium [mg/dL].
    pub c_opt: f64,
    /// Optimal calcitriol [ng/L].
    pub d_opt: f64,
    /// Optimal phosphate [mg/dL].
    pub p_opt: f64,
    /// Patient baseline calcium [mg/dL].
    pub c_pat: f64,
    /// Patient baseline phosphate [mg/dL].
    pub p_pat: f64,
    /// Patient baseline calcitriol [ng/L].
    pub d_pat: f64,
    /// Optimal total gland-cell population, normalizing hyperplasia.
    pub s0: f64,
    /// Total simulated duration [h]; normalizes the therapy profiles.
    pub total_time: f64,
    /// GFR-derived clearance input.
    pub gfr_in: f64,
    /// Patient steady state used as the feedback baseline.
    pub y_pat: DVector<f64>,
    /// Hold plasma calcium at the patient baseline instead of letting the
    /// long-memory feedback states modulate it.
    pub calcium_clamp: bool,
}

/// The gland model: [`PtgParams`] bound to the [`OdeSystem`] interface.
#[derive(Debug, Clone)]
pub struct PtgModel {
    params: PtgParams,
}

impl PtgModel {
    pub fn new(params: PtgParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PtgParams {
        &self.params
    }

    /// The 23-element rate-of-change vector at time `t` and state `y`.
    ///
    /// Callers must supply a well-formed 23-element state; the equations
    /// assume it and do not re-validate on every evaluation.
    pub fn derivatives(&self, t: f64, y: &DVector<f64>) -> DVector<f64> {
        use state_index::*;

        let p = &self.params;

        // Current forcing levels, baseline-scaled.
        let t_norm = t / p.total_time;
        let d = p.d_pat * p.endpoints_d.smooth_at(t_norm);
        let phos = p.p_pat * p.endpoints_p.smooth_at(t_norm);
        let c = if p.calcium_clamp {
            p.c_pat
        } else {
            p.c_pat * y[CALCIUM_FEEDBACK_HORMONE] * y[CALCIUM_FEEDBACK_CALCITRIOL]
        };

        let rp = phosphate_release_multiplier(phos, p.p_opt);

        // Release works on ionized calcium in mmol/L; sensed calcium and
        // the optimal reference are carried in mg/dL.
        let release = release_rate(y[SENSED_CALCIUM] / 4.0, rp, p.c_opt / 4.0);

        let degradation = rate_adj(
            y[DEGRADATION_SENSOR],
            KineticProcess::Degradation.default_params(),
        );
        let production = rate_adj(
            y[PRODUCTION_SENSOR],
            KineticProcess::Production.default_params(),
        );
        let proliferation = rate_adj(
            y[PROLIFERATION_SENSOR],
            KineticProcess::Proliferation.default_params(),
        );
        let clearance = rate_adj(p.gfr_in, KineticProcess::Clearance.default_params());

        let mut dydt = DVector::zeros(STATE_DIM);

        // Two-compartment cell population with log-growth against the
        // drifting carrying capacity.
        dydt[SECRETING_CELLS] = -TRANSITION_IN * y[SECRETING_CELLS] + TRANSITION_OUT * y[PROLIFERATING_CELLS];
        dydt[PROLIFERATING_CELLS] = TRANSITION_IN * y[SECRETING_CELLS]
            - TRANSITION_OUT * y[PROLIFERATING_CELLS]
            - APOPTOSIS_RATE * y[PROLIFERATING_CELLS]
            + proliferation
                * y[PROLIFERATING_CELLS]
                * (y[CARRYING_CAPACITY] / (y[PROLIFERATING_CELLS] + y[SECRETING_CELLS])).ln();

        // Hormone store: production minus release minus degradation.
        dydt[HORMONE_STORE] = y[SECRETING_CELLS] * production
            - release * y[HORMONE_STORE]
            - degradation * y[HORMONE_STORE];

        // Plasma pool: release minus renal clearance.
        dydt[PLASMA_HORMONE] = release * y[HORMONE_STORE] - y[PLASMA_HORMONE] * clearance;

        // Fast calcium/calcitriol sensors with phosphate antagonism.
        dydt[FAST_CALCIUM_SENSOR] = CALCIUM_GAIN
            * ((y[CALCIUM_STIMULUS] - 2.0 * y[PHOSPHATE_STIMULUS]) * y[FAST_CALCIUM_SENSOR]
                + 0.1 * (-1.0 + y[FAST_CALCITRIOL_SENSOR]))
            + CALCIUM_RELAXATION * (1.0 - y[FAST_CALCIUM_SENSOR]);
        dydt[FAST_CALCITRIOL_SENSOR] = CALCITRIOL_GAIN
            * ((y[CALCITRIOL_STIMULUS] - 2.0 * y[PHOSPHATE_STIMULUS]) * y[FAST_CALCITRIOL_SENSOR]
                + 0.1 * (-1.0 + y[FAST_CALCIUM_SENSOR]))
            + CALCITRIOL_RELAXATION * (1.0 - y[FAST_CALCITRIOL_SENSOR]);

        // First-order stimulus states for the plasma deviations.
        dydt[CALCIUM_STIMULUS] = stimulus_relaxation(
            stim(c - p.c_opt, StimulusKind::Calcium),
            y[CALCIUM_STIMULUS],
            TAU_CALCIUM * 0.15,
        );
        dydt[CALCITRIOL_STIMULUS] = stimulus_relaxation(
            stim(d - p.d_opt, StimulusKind::Calcitriol),
            y[CALCITRIOL_STIMULUS],
            TAU_CALCITRIOL * 0.15,
        );
        dydt[PHOSPHATE_STIMULUS] = stimulus_relaxation(
            stim(phos - p.p_opt, StimulusKind::Phosphate),
            y[PHOSPHATE_STIMULUS],
            TAU_PHOSPHATE * 0.5,
        );

        // Sensed-calcium stimulus shared by the three kinetic sensor pairs.
        let sensed_deviation = stim(y[SENSED_CALCIUM] - p.c_opt, StimulusKind::Calcium);

        // Degradation pair: fast sensor driven by its stimulus against the
        // phosphate relaxation at the matching time constant.
        dydt[DEGRADATION_SENSOR] = 50.0
            * CALCIUM_GAIN
            * (y[DEGRADATION_STIMULUS] - y[PHOSPHATE_RELAX_DEGRADATION])
            * y[DEGRADATION_SENSOR]
            + CALCIUM_RELAXATION * (1.0 - y[DEGRADATION_SENSOR]);
        dydt[DEGRADATION_STIMULUS] =
            stimulus_relaxation(sensed_deviation, y[DEGRADATION_STIMULUS], TAU_CALCIUM * 10.0);

        // Production pair.
        dydt[PRODUCTION_SENSOR] = 50.0
            * CALCIUM_GAIN
            * (y[PRODUCTION_STIMULUS] - y[PHOSPHATE_RELAX_PRODUCTION])
            * y[PRODUCTION_SENSOR]
            + CALCIUM_RELAXATION * (1.0 - y[PRODUCTION_SENSOR]);
        dydt[PRODUCTION_STIMULUS] =
            stimulus_relaxation(sensed_deviation, y[PRODUCTION_STIMULUS], TAU_CALCIUM * 0.1);

        // Proliferation pair.
        dydt[PROLIFERATION_SENSOR] = 50.0
            * CALCIUM_GAIN
            * (y[PROLIFERATION_STIMULUS] - y[PHOSPHATE_RELAX_PROLIFERATION])
            * y[PROLIFERATION_SENSOR]
            + CALCIUM_RELAXATION * (1.0 - y[PROLIFERATION_SENSOR]);
        dydt[PROLIFERATION_STIMULUS] =
            stimulus_relaxation(sensed_deviation, y[PROLIFERATION_STIMULUS], TAU_CALCIUM * 0.35);

        // Receptor-sensitivity low-pass filters on calcium and calcitriol.
        let sensitivity = sens(y[FAST_CALCIUM_SENSOR], y[FAST_CALCITRIOL_SENSOR]);
        dydt[SENSED_CALCIUM] = sensitivity * c - y[SENSED_CALCIUM];
        dydt[SENSED_CALCITRIOL] = sensitivity * d - y[SENSED_CALCITRIOL];

        // Phosphate stimulus relaxations at the three kinetic time scales.
        let phosphate_deviation = stim(phos - p.p_opt, StimulusKind::Phosphate);
        dydt[PHOSPHATE_RELAX_DEGRADATION] = stimulus_relaxation(
            phosphate_deviation,
            y[PHOSPHATE_RELAX_DEGRADATION],
            TAU_PHOSPHATE,
        );
        dydt[PHOSPHATE_RELAX_PRODUCTION] = stimulus_relaxation(
            phosphate_deviation,
            y[PHOSPHATE_RELAX_PRODUCTION],
            TAU_PHOSPHATE * 0.3,
        );
        dydt[PHOSPHATE_RELAX_PROLIFERATION] = stimulus_relaxation(
            phosphate_deviation,
            y[PHOSPHATE_RELAX_PROLIFERATION],
            TAU_PHOSPHATE * 0.05,
        );

        // Carrying-capacity drift: hyperplasia once the population exceeds
        // the optimal mass.
        let overload = ((y[SECRETING_CELLS] + y[PROLIFERATING_CELLS]) / p.s0 - 1.0).max(0.0);
        dydt[CARRYING_CAPACITY] = HYPERPLASIA_RATE * overload.powf(2.0 / 3.0);

        // Long-memory calcium feedback, tanh-saturated against the patient
        // baseline (only read in unclamped mode, always integrated).
        let c_factor = p.c_opt / 4.0;
        let hormone_feedback_rate = 0.001 / 4.0 * c_factor * 0.4;
        let hormone_feedback_gain = 0.1;
        let calcitriol_feedback_rate = 0.05;
        let calcitriol_feedback_gain = 0.1;

        let hormone_target = 1.0
            + (hormone_feedback_gain * (y[PLASMA_HORMONE] - p.y_pat[PLASMA_HORMONE])).tanh();
        let calcitriol_target = 1.0 + (calcitriol_feedback_gain * (d - p.d_pat)).tanh();

        dydt[CALCIUM_FEEDBACK_HORMONE] =
            hormone_feedback_rate * (hormone_target - y[CALCIUM_FEEDBACK_HORMONE]);
        dydt[CALCIUM_FEEDBACK_CALCITRIOL] =
            calcitriol_feedback_rate * (calcitriol_target - y[CALCIUM_FEEDBACK_CALCITRIOL]);

        // Deadband: flush numerical noise from near-equilibrium terms.
        for v in dydt.iter_mut() {
            if v.abs() < ZERO_THRESHOLD {
                *v = 0.0;
            }
        }

        dydt
    }
}

impl OdeSystem for PtgModel {
    fn dim(&self) -> usize {
        STATE_DIM
    }

    fn derivatives(&self, t: f64, y: &DVector<f64>) -> DVector<f64> {
        PtgModel::derivatives(self, t, y)
    }

    fn initial_state(&self) -> DVector<f64> {
        self.params.y_pat.clone()
    }

    fn name(&self) -> &str {
        "Parathyroid gland dynamics"
    }

    fn description(&self) -> Option<&str> {
        Some(
            "23-state gland model: cell mass, hormone production/release, \
             multi-timescale calcium/phosphate/calcitriol feedback.",
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
