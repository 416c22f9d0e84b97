//! Simulation configuration
//!
//! An immutable value object describing the clinical inputs of one run:
//! laboratory reference ranges with their units, patient factors, and the
//! therapy plan. Constructed once (from defaults or a JSON file), then
//! converted by [`SimulationConfig::setup`] into the internally consistent
//! [`SimulationSetup`] the model consumes — optimal and patient levels in
//! model units, therapy endpoint tables, and the clearance input.
//!
//! Every enumerated option is a closed enum with an explicit [`FromStr`];
//! unknown strings fail with a descriptive error instead of being coerced
//! or silently kept.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::forcing::therapy_ramp;
use crate::model::smoothing::EndpointTable;

/// Unit a calcium reference range is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalciumUnit {
    #[serde(rename = "mg/dL")]
    MgPerDl,
    #[serde(rename = "mmol/L")]
    MmolPerL,
    #[serde(rename = "mEq/L")]
    MeqPerL,
}

impl FromStr for CalciumUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mg/dL" => Ok(Self::MgPerDl),
            "mmol/L" => Ok(Self::MmolPerL),
            "mEq/L" => Ok(Self::MeqPerL),
            other => Err(format!("unknown calcium unit: {other:?}")),
        }
    }
}

/// Whether the calcium range describes total or ionized calcium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalciumMeasurement {
    Total,
    Ionized,
}

impl FromStr for CalciumMeasurement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(Self::Total),
            "ionized" => Ok(Self::Ionized),
            other => Err(format!("unknown calcium measurement type: {other:?}")),
        }
    }
}

/// Unit a phosphate range is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhosphateUnit {
    #[serde(rename = "mg/dL")]
    MgPerDl,
    #[serde(rename = "mmol/L")]
    MmolPerL,
}

impl FromStr for PhosphateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mg/dL" => Ok(Self::MgPerDl),
            "mmol/L" => Ok(Self::MmolPerL),
            other => Err(format!("unknown phosphate unit: {other:?}")),
        }
    }
}

/// Unit a calcitriol range is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcitriolUnit {
    #[serde(rename = "ng/L")]
    NgPerL,
    #[serde(rename = "pmol/L")]
    PmolPerL,
}

impl FromStr for CalcitriolUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ng/L" => Ok(Self::NgPerL),
            "pmol/L" => Ok(Self::PmolPerL),
            other => Err(format!("unknown calcitriol unit: {other:?}")),
        }
    }
}

/// Unit intact PTH is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PthUnit {
    #[serde(rename = "pg/mL")]
    PgPerMl,
    #[serde(rename = "pmol/L")]
    PmolPerL,
}

impl FromStr for PthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pg/mL" => Ok(Self::PgPerMl),
            "pmol/L" => Ok(Self::PmolPerL),
            other => Err(format!("unknown iPTH unit: {other:?}")),
        }
    }
}

/// Unit of the simulation horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizonUnit {
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "d")]
    Days,
    #[serde(rename = "m")]
    Months,
}

impl FromStr for HorizonUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h" => Ok(Self::Hours),
            "d" => Ok(Self::Days),
            "m" => Ok(Self::Months),
            other => Err(format!("unknown horizon unit: {other:?}")),
        }
    }
}

/// Quality of the patient's phosphate control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhosphateControl {
    Poor,
    Good,
    Excellent,
}

impl PhosphateControl {
    /// Typical baseline phosphate [mg/dL] for this control quality.
    pub fn baseline_mg_dl(self) -> f64 {
        match self {
            PhosphateControl::Excellent => 4.6,
            PhosphateControl::Good => 5.5,
            PhosphateControl::Poor => 8.0,
        }
    }
}

impl FromStr for PhosphateControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poor" => Ok(Self::Poor),
            "good" => Ok(Self::Good),
            "excellent" => Ok(Self::Excellent),
            other => Err(format!("unknown phosphate control level: {other:?}")),
        }
    }
}

/// Calcium reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalciumReference {
    pub unit: CalciumUnit,
    pub lower: f64,
    pub upper: f64,
    pub measurement: CalciumMeasurement,
}

/// Phosphate reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhosphateReference {
    pub unit: PhosphateUnit,
    pub lower: f64,
    pub upper: f64,
}

/// Calcitriol reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalcitriolReference {
    pub unit: CalcitriolUnit,
    pub lower: f64,
    pub upper: f64,
}

/// Patient-specific factors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PatientFactors {
    /// Years on dialysis; drives the residual-clearance estimate.
    pub vintage_years: f64,
    pub phosphate_control: PhosphateControl,
    /// Whether the patient receives calcitriol therapy at baseline.
    pub calcitriol_therapy: bool,
    /// Measured iPTH [pg/mL].
    pub pth: f64,
}

/// Therapy targets and their time horizons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TherapyPlan {
    /// Target phosphate, in the phosphate reference unit.
    pub target_p: f64,
    /// Target calcitriol, in the calcitriol reference unit.
    pub target_d: f64,
    pub months_to_target_p: f64,
    pub months_to_target_d: f64,
}

/// Simulation horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Horizon {
    pub value: f64,
    pub unit: HorizonUnit,
}

impl Horizon {
    pub fn hours(&self) -> f64 {
        match self.unit {
            HorizonUnit::Hours => self.value,
            HorizonUnit::Days => self.value * 24.0,
            HorizonUnit::Months => self.value * 24.0 * 30.0,
        }
    }
}

const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

/// Conversion factor from pmol/L to ng/L calcitriol.
const CALCITRIOL_PMOL_PER_NG: f64 = 2.4001;

/// Display factor for iPTH reported in pmol/L.
const PTH_PMOL_FACTOR: f64 = 0.106;

/// Complete clinical configuration of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub calcium: CalciumReference,
    pub phosphate: PhosphateReference,
    pub calcitriol: CalcitriolReference,
    pub pth_unit: PthUnit,
    pub patient: PatientFactors,
    pub therapy: TherapyPlan,
    pub horizon: Horizon,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            calcium: CalciumReference {
                unit: CalciumUnit::MgPerDl,
                lower: 4.8,
                upper: 5.2,
                measurement: CalciumMeasurement::Ionized,
            },
            phosphate: PhosphateReference {
                unit: PhosphateUnit::MgPerDl,
                lower: 3.2,
                upper: 4.0,
            },
            calcitriol: CalcitriolReference {
                unit: CalcitriolUnit::NgPerL,
                lower: 18.0,
                upper: 61.0,
            },
            pth_unit: PthUnit::PgPerMl,
            patient: PatientFactors {
                vintage_years: 5.0,
                phosphate_control: PhosphateControl::Poor,
                calcitriol_therapy: false,
                pth: 900.0,
            },
            therapy: TherapyPlan {
                target_p: 4.0,
                target_d: 180.0,
                months_to_target_p: 3.0,
                months_to_target_d: 3.0,
            },
            horizon: Horizon {
                value: 12.0,
                unit: HorizonUnit::Months,
            },
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file, falling back to the defaults if the file is
    /// missing or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("loaded simulation config from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("failed to parse simulation config: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("simulation config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Optimal ionized calcium in model units [mg/dL].
    pub fn optimal_calcium(&self) -> f64 {
        let mut mean = (self.calcium.lower + self.calcium.upper) / 2.0;
        if self.calcium.measurement == CalciumMeasurement::Total {
            // Roughly half of total calcium is ionized.
            mean *= 0.5;
        }
        match self.calcium.unit {
            CalciumUnit::MmolPerL => mean * 4.0,
            CalciumUnit::MeqPerL => mean * 2.0,
            CalciumUnit::MgPerDl => mean,
        }
    }

    /// Optimal phosphate in model units [mg/dL].
    pub fn optimal_phosphate(&self) -> f64 {
        let mean = (self.phosphate.lower + self.phosphate.upper) / 2.0;
        match self.phosphate.unit {
            PhosphateUnit::MmolPerL => mean / crate::model::PHOSPHATE_MMOL_PER_MGDL,
            PhosphateUnit::MgPerDl => mean,
        }
    }

    /// Optimal calcitriol in model units [ng/L].
    pub fn optimal_calcitriol(&self) -> f64 {
        let mean = (self.calcitriol.lower + self.calcitriol.upper) / 2.0;
        match self.calcitriol.unit {
            CalcitriolUnit::PmolPerL => mean / CALCITRIOL_PMOL_PER_NG,
            CalcitriolUnit::NgPerL => mean,
        }
    }

    /// Factor converting model-space iPTH (pg/mL) into the configured
    /// reporting unit.
    pub fn pth_display_factor(&self) -> f64 {
        match self.pth_unit {
            PthUnit::PmolPerL => PTH_PMOL_FACTOR,
            PthUnit::PgPerMl => 1.0,
        }
    }

    /// Derive the complete, unit-consistent setup the model consumes.
    pub fn setup(&self) -> Result<SimulationSetup, String> {
        let c_opt = self.optimal_calcium();
        let p_opt = self.optimal_phosphate();
        let d_opt = self.optimal_calcitriol();

        let total_hours = self.horizon.hours();
        if total_hours <= 0.0 {
            return Err(format!(
                "simulation horizon must be positive, got {total_hours} h"
            ));
        }

        // Patient baselines: calcium slightly depressed, phosphate from
        // the control preset, calcitriol depending on therapy.
        let c_pat = c_opt * 0.95;
        let p_pat = self.patient.phosphate_control.baseline_mg_dl();
        let lower_d = match self.calcitriol.unit {
            CalcitriolUnit::PmolPerL => self.calcitriol.lower / CALCITRIOL_PMOL_PER_NG,
            CalcitriolUnit::NgPerL => self.calcitriol.lower,
        };
        let d_pat = if self.patient.calcitriol_therapy {
            0.8 * d_opt
        } else {
            0.5 * lower_d
        };

        // Therapy targets in model units.
        let target_p = match self.phosphate.unit {
            PhosphateUnit::MmolPerL => {
                self.therapy.target_p / crate::model::PHOSPHATE_MMOL_PER_MGDL
            }
            PhosphateUnit::MgPerDl => self.therapy.target_p,
        };
        let target_d = match self.calcitriol.unit {
            CalcitriolUnit::PmolPerL => self.therapy.target_d / CALCITRIOL_PMOL_PER_NG,
            CalcitriolUnit::NgPerL => self.therapy.target_d,
        };

        let endpoints_p = self.ramp_for(
            target_p / p_pat,
            self.therapy.months_to_target_p * HOURS_PER_MONTH,
            total_hours,
        )?;
        let endpoints_d = self.ramp_for(
            target_d / d_pat,
            self.therapy.months_to_target_d * HOURS_PER_MONTH,
            total_hours,
        )?;

        // Residual clearance declines exponentially with dialysis vintage.
        let gfr_in = (-1e-3 * 365.0 * self.patient.vintage_years).exp();

        Ok(SimulationSetup {
            c_opt,
            p_opt,
            d_opt,
            c_pat,
            p_pat,
            d_pat,
            pth_pat: self.patient.pth,
            total_hours,
            endpoints_p,
            endpoints_d,
            gfr_in,
            pth_display_factor: self.pth_display_factor(),
        })
    }

    /// Endpoint table for one therapy ramp, with the knot normalized to
    /// the simulation horizon so the ramp completes at its configured
    /// time-to-target (extended past the horizon when the target lies
    /// beyond it).
    fn ramp_for(
        &self,
        target_ratio: f64,
        hours_to_target: f64,
        total_hours: f64,
    ) -> Result<EndpointTable, String> {
        if hours_to_target <= 0.0 {
            return Err(format!(
                "time to therapy target must be positive, got {hours_to_target} h"
            ));
        }
        let normalizer = if total_hours > hours_to_target {
            total_hours
        } else {
            hours_to_target + 1.0
        };
        therapy_ramp(target_ratio, hours_to_target / normalizer)
    }
}

/// Unit-consistent inputs derived from a [`SimulationConfig`].
///
/// All concentrations are in model units (calcium and phosphate mg/dL,
/// calcitriol ng/L, iPTH pg/mL), times in hours.
#[derive(Debug, Clone)]
pub struct SimulationSetup {
    pub c_opt: f64,
    pub p_opt: f64,
    pub d_opt: f64,
    pub c_pat: f64,
    pub p_pat: f64,
    pub d_pat: f64,
    pub pth_pat: f64,
    pub total_hours: f64,
    pub endpoints_p: EndpointTable,
    pub endpoints_d: EndpointTable,
    pub gfr_in: f64,
    pub pth_display_factor: f64,
}

// =================================================================================================
// Tests
// =================================================================================================
