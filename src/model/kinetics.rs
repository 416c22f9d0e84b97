//! Kinetic rate laws of the gland
//!
//! Four first-order processes govern the hormone budget: degradation,
//! proliferation, production and clearance. Each carries a base rate and a
//! low-concentration adjustment factor; [`rate_adj`] blends between them.
//! [`release_rate`] is the sigmoidal calcium-controlled release law, scaled
//! by the phosphate multiplier from [`phosphate_release_multiplier`].
//!
//! All rates are per hour; calcium entering [`release_rate`] is ionized
//! calcium in mmol/L.

use std::str::FromStr;

/// Base rate and low-concentration adjustment for one kinetic process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateParams {
    /// Rate at or above the unit reference concentration [1/h].
    pub rate: f64,
    /// Fractional multiplier applying at zero concentration.
    pub adjustment: f64,
}

/// The four kinetic processes of the gland model.
///
/// A closed enumeration: rate lookups cannot be misspelled at compile time,
/// and string input is validated by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KineticProcess {
    /// Intracellular hormone degradation.
    Degradation,
    /// Gland cell proliferation.
    Proliferation,
    /// Hormone production by active cells.
    Production,
    /// Plasma hormone clearance.
    Clearance,
}

impl KineticProcess {
    /// Default `[rate, adjustment]` pair for this process.
    ///
    /// Rates are literature values per minute converted to per hour.
    pub fn default_params(self) -> RateParams {
        match self {
            KineticProcess::Degradation => RateParams {
                rate: 0.012 * 60.0,
                adjustment: 0.1,
            },
            KineticProcess::Proliferation => RateParams {
                rate: 0.03 * 60.0,
                adjustment: 2.0,
            },
            KineticProcess::Production => RateParams {
                rate: 6.6 / 0.1 * 60.0,
                adjustment: 2.0,
            },
            KineticProcess::Clearance => RateParams {
                rate: 0.632 * 60.0,
                adjustment: 0.2,
            },
        }
    }
}

impl FromStr for KineticProcess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degrad" => Ok(KineticProcess::Degradation),
            "prolif" => Ok(KineticProcess::Proliferation),
            "prod" => Ok(KineticProcess::Production),
            "clear" => Ok(KineticProcess::Clearance),
            other => Err(format!("unknown kinetic process: {other:?}")),
        }
    }
}

/// Concentration-dependent rate adjustment.
///
/// Below the unit reference concentration the rate interpolates linearly
/// between `adjustment · rate` (at `c = 0`) and `rate` (at `c = 1`); at or
/// above the reference it is the base rate unchanged.
#[inline]
pub fn rate_adj(c: f64, params: RateParams) -> f64 {
    let RateParams { rate, adjustment } = params;
    if c < 1.0 {
        (rate - adjustment * rate) * c + adjustment * rate
    } else {
        rate
    }
}

/// Elementwise [`rate_adj`] over a slice of concentrations.
pub fn rate_adj_many(cs: &[f64], params: RateParams) -> Vec<f64> {
    cs.iter().map(|&c| rate_adj(c, params)).collect()
}

// Release sigmoid constants: midpoint base at the 1.25 mmol/L calcium
// reference, Hill exponent, maximal and basal rates per hour.
const RELEASE_MIDPOINT_BASE: f64 = 1.22;
const RELEASE_REFERENCE_CALCIUM: f64 = 1.25;
const RELEASE_HILL_EXPONENT: f64 = 100.0;
const RELEASE_MAX_RATE: f64 = 0.14 * 60.0;
const RELEASE_BASAL_RATE: f64 = 0.001 * 60.0;

/// Sigmoidal hormone release rate.
///
/// * `c` — sensed ionized calcium [mmol/L].
/// * `rp` — phosphate-derived release multiplier (1 at optimal phosphate).
/// * `c_opt` — optimal ionized calcium [mmol/L]; shifts the sigmoid
///   midpoint proportionally.
///
/// Non-increasing in `c` (calcium suppresses release) and strictly
/// increasing in `rp` (phosphate elevation potentiates release).
pub fn release_rate(c: f64, rp: f64, c_opt: f64) -> f64 {
    let midpoint = RELEASE_MIDPOINT_BASE / RELEASE_REFERENCE_CALCIUM * c_opt;
    let max_rate = RELEASE_MAX_RATE * rp;
    (max_rate - RELEASE_BASAL_RATE) / (1.0 + (c / midpoint).powf(RELEASE_HILL_EXPONENT))
        + RELEASE_BASAL_RATE
}

/// Conversion factor from mg/dL phosphate to mmol/L.
pub const PHOSPHATE_MMOL_PER_MGDL: f64 = 0.323;

// Hill parameters of the phosphate release response; the half-saturation
// point sits at the optimal phosphate level.
const PHOS_HIGH: f64 = 0.3;
const PHOS_LOW: f64 = 0.15;
const PHOS_HILL_EXPONENT: f64 = 4.5;

#[inline]
fn phosphate_response(p_mmol: f64, kp: f64) -> f64 {
    let pg = p_mmol.powf(PHOS_HILL_EXPONENT);
    PHOS_HIGH + (PHOS_LOW - PHOS_HIGH) * pg / (pg + kp.powf(PHOS_HILL_EXPONENT))
}

/// Phosphate-derived release multiplier `rp`.
///
/// Ratio of the saturating phosphate response at the optimal level to the
/// response at the current level, both in mmol/L. Equals 1 when `p ==
/// p_opt`, rises above 1 when phosphate is elevated. The same formula
/// backs both the derivative function and the patient steady state.
pub fn phosphate_release_multiplier(p: f64, p_opt: f64) -> f64 {
    let kp = p_opt * PHOSPHATE_MMOL_PER_MGDL;
    let fp = phosphate_response(p * PHOSPHATE_MMOL_PER_MGDL, kp);
    let fp0 = phosphate_response(p_opt * PHOSPHATE_MMOL_PER_MGDL, kp);
    fp0 / fp
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_adj_endpoints() {
        let params = RateParams {
            rate: 10.0,
            adjustment: 0.2,
        };
        assert_eq!(rate_adj(0.0, params), 2.0);
        assert_eq!(rate_adj(1.0, params), 10.0);
        assert_eq!(rate_adj(1.5, params), 10.0);
        assert_eq!(rate_adj(7.0, params), 10.0);
    }

    #[test]
    fn rate_adj_is_linear_below_reference() {
        let params = RateParams {
            rate: 10.0,
            adjustment: 0.2,
        };
        let mid = rate_adj(0.5, params);
        assert!((mid - (2.0 + 8.0 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn rate_adj_non_decreasing() {
        let params = RateParams {
            rate: 8.0,
            adjustment: 0.1,
        };
        let mut prev = rate_adj(0.0, params);
        let mut c = 0.05;
        while c <= 2.0 {
            let v = rate_adj(c, params);
            assert!(v + 1e-12 >= prev, "rate_adj decreased at c={c}");
            prev = v;
            c += 0.05;
        }
    }

    #[test]
    fn rate_adj_many_matches_scalar() {
        let params = RateParams {
            rate: 8.0,
            adjustment: 0.1,
        };
        let cs = [0.2, 0.8, 1.2];
        let out = rate_adj_many(&cs, params);
        for (&c, &v) in cs.iter().zip(out.iter()) {
            assert_eq!(v, rate_adj(c, params));
        }
    }

    #[test]
    fn default_params_match_documented_values() {
        let degrad = KineticProcess::Degradation.default_params();
        assert!((degrad.rate - 0.72).abs() < 1e-12);
        assert_eq!(degrad.adjustment, 0.1);

        let prolif = KineticProcess::Proliferation.default_params();
        assert!((prolif.rate - 1.8).abs() < 1e-12);
        assert_eq!(prolif.adjustment, 2.0);

        let prod = KineticProcess::Production.default_params();
        assert!((prod.rate - 3960.0).abs() < 1e-9);
        assert_eq!(prod.adjustment, 2.0);

        let clear = KineticProcess::Clearance.default_params();
        assert!((clear.rate - 37.92).abs() < 1e-12);
        assert_eq!(clear.adjustment, 0.2);
    }

    #[test]
    fn process_parsing_rejects_unknown_names() {
        assert_eq!(
            "degrad".parse::<KineticProcess>().unwrap(),
            KineticProcess::Degradation
        );
        assert_eq!(
            "clear".parse::<KineticProcess>().unwrap(),
            KineticProcess::Clearance
        );
        assert!("unknown_function".parse::<KineticProcess>().is_err());
        assert!("Prod".parse::<KineticProcess>().is_err());
    }

    #[test]
    fn release_rate_non_increasing_in_calcium() {
        let rp = 1.0;
        let c_opt = 1.25;
        let mut prev = release_rate(0.5, rp, c_opt);
        let mut c = 0.51;
        while c <= 2.0 {
            let r = release_rate(c, rp, c_opt);
            assert!(
                r <= prev + 1e-9,
                "release_rate increased with calcium at c={c}"
            );
            prev = r;
            c += 0.01;
        }
        // Overall suppression: far below vs far above the set point.
        assert!(release_rate(0.6, rp, c_opt) > release_rate(1.9, rp, c_opt));
    }

    #[test]
    fn release_rate_increasing_in_phosphate_multiplier() {
        for &c in &[0.5, 1.0, 1.22, 1.5, 2.0] {
            let low = release_rate(c, 0.5, 1.25);
            let high = release_rate(c, 2.0, 1.25);
            assert!(low < high, "rp did not potentiate release at c={c}");
        }
    }

    #[test]
    fn release_rate_stays_in_plausible_range() {
        let mut c = 0.5;
        while c <= 2.0 {
            let r = release_rate(c, 1.0, 1.25);
            assert!(r.is_finite());
            assert!(r > 0.0 && r < 20.0);
            c += 0.05;
        }
    }

    #[test]
    fn release_midpoint_scales_with_optimal_calcium() {
        // Doubling the optimal calcium doubles the concentration at which
        // release switches off.
        let low = release_rate(1.5, 1.0, 1.25);
        let high = release_rate(1.5, 1.0, 2.5);
        assert!(high > low);
    }

    #[test]
    fn phosphate_multiplier_is_one_at_optimal() {
        assert_eq!(phosphate_release_multiplier(3.6, 3.6), 1.0);
    }

    #[test]
    fn phosphate_multiplier_rises_with_elevation() {
        let p_opt = 3.6;
        assert!(phosphate_release_multiplier(8.0, p_opt) > 1.0);
        assert!(phosphate_release_multiplier(2.0, p_opt) < 1.0);
    }
}
