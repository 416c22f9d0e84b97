//! Test systems with known behavior
//!
//! `ExponentialDecay` has an analytical solution and pins solver
//! accuracy; `GlandFixture` wires a complete PTG scenario from explicit
//! clinical values, so the full-model tests don't repeat the setup dance.

use nalgebra::DVector;

use ptg_rs::model::{
    constant_forcing, optimal_steady_state, patient_steady_state, state_index, PtgModel,
    PtgParams, PTH_PLASMA_SCALE,
};
use ptg_rs::physiology::OdeSystem;

/// dy/dt = -k·y with y(0) = 1; y(t) = exp(-k·t).
pub struct ExponentialDecay {
    pub rate: f64,
}

impl ExponentialDecay {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn analytical(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }
}

impl OdeSystem for ExponentialDecay {
    fn dim(&self) -> usize {
        1
    }

    fn derivatives(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
        y * -self.rate
    }

    fn initial_state(&self) -> DVector<f64> {
        DVector::from_vec(vec![1.0])
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}

/// A complete gland scenario built from explicit clinical values.
pub struct GlandFixture {
    pub c_opt: f64,
    pub p_opt: f64,
    pub d_opt: f64,
    pub gfr_in: f64,
    pub total_hours: f64,
}

impl Default for GlandFixture {
    fn default() -> Self {
        Self {
            c_opt: 5.0,
            p_opt: 3.6,
            d_opt: 39.5,
            gfr_in: 1.0,
            total_hours: 8640.0,
        }
    }
}

impl GlandFixture {
    /// Optimal gland mass, normalizing hyperplasia.
    pub fn optimal_mass(&self) -> f64 {
        let y = optimal_steady_state(self.c_opt, self.c_opt, self.d_opt);
        y[state_index::SECRETING_CELLS] + y[state_index::PROLIFERATING_CELLS]
    }

    /// Optimal iPTH in pg/mL.
    pub fn optimal_ipth(&self) -> f64 {
        let y = optimal_steady_state(self.c_opt, self.c_opt, self.d_opt);
        y[state_index::PLASMA_HORMONE] * PTH_PLASMA_SCALE
    }

    /// A patient indistinguishable from the optimal physiology, under
    /// constant forcing: the equilibrium scenario.
    pub fn equilibrium_patient(&self) -> (PtgModel, DVector<f64>) {
        let flat = constant_forcing();
        let y_pat = patient_steady_state(
            self.c_opt,
            self.p_opt,
            self.d_opt,
            self.c_opt,
            self.p_opt,
            self.d_opt,
            self.optimal_ipth(),
            &flat,
            &flat,
            self.gfr_in,
        )
        .expect("equilibrium patient steady state is finite");

        let model = PtgModel::new(PtgParams {
            endpoints_p: constant_forcing(),
            endpoints_d: constant_forcing(),
            c_opt: self.c_opt,
            d_opt: self.d_opt,
            p_opt: self.p_opt,
            c_pat: self.c_opt,
            p_pat: self.p_opt,
            d_pat: self.d_opt,
            s0: self.optimal_mass(),
            total_time: self.total_hours,
            gfr_in: self.gfr_in,
            y_pat: y_pat.clone(),
            calcium_clamp: true,
        });
        (model, y_pat)
    }

    /// A dialysis patient with poor phosphate control, no calcitriol
    /// therapy and elevated iPTH, under constant forcing.
    pub fn dialysis_patient(&self) -> (PtgModel, DVector<f64>) {
        let flat = constant_forcing();
        let c_pat = self.c_opt * 0.95;
        let p_pat = 8.0;
        let d_pat = 9.0;
        let gfr = (-1e-3f64 * 365.0 * 5.0).exp();

        let y_pat = patient_steady_state(
            c_pat,
            p_pat,
            d_pat,
            self.c_opt,
            self.p_opt,
            self.d_opt,
            900.0,
            &flat,
            &flat,
            gfr,
        )
        .expect("dialysis patient steady state is finite");

        let model = PtgModel::new(PtgParams {
            endpoints_p: constant_forcing(),
            endpoints_d: constant_forcing(),
            c_opt: self.c_opt,
            d_opt: self.d_opt,
            p_opt: self.p_opt,
            c_pat,
            p_pat,
            d_pat,
            s0: self.optimal_mass(),
            total_time: self.total_hours,
            gfr_in: gfr,
            y_pat: y_pat.clone(),
            calcium_clamp: true,
        });
        (model, y_pat)
    }
}
