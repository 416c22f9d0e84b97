//! Stimulus and sensitivity responses
//!
//! Deviations of calcium, phosphate and calcitriol from their optimal
//! levels drive the gland through saturating stimulus signals. Each signal
//! is a double sigmoid with opposing centers placed symmetrically about
//! zero, which creates a dead zone: responses that do not exceed the
//! midpoint value of the same curve are forced to exactly zero, so
//! floating-point noise near equilibrium cannot masquerade as a stimulus.

use std::str::FromStr;
use std::sync::OnceLock;

use super::smoothing::EndpointTable;

/// Which plasma quantity a stimulus responds to.
///
/// The set is closed: every caller names one of the three known kinds at
/// compile time, and string input (e.g. from configuration) goes through
/// [`FromStr`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StimulusKind {
    Calcium,
    Phosphate,
    Calcitriol,
}

impl StimulusKind {
    /// Shape constants `(c1, c2, k, l)` of the double sigmoid:
    /// opposing centers, steepness, amplitude.
    fn shape(self) -> (f64, f64, f64, f64) {
        match self {
            StimulusKind::Calcium => (-2.2, 2.2, 3.0, 1.0),
            StimulusKind::Phosphate => (-2.5, 2.5, 2.5, 1.0),
            StimulusKind::Calcitriol => (-30.0, 30.0, 0.1, 1.0),
        }
    }
}

impl FromStr for StimulusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" | "calcium" => Ok(StimulusKind::Calcium),
            "p" | "phosphate" => Ok(StimulusKind::Phosphate),
            "d" | "calcitriol" => Ok(StimulusKind::Calcitriol),
            other => Err(format!("unknown stimulus kind: {other:?}")),
        }
    }
}

#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Saturating dead-zone stimulus for a deviation `val` from optimal.
///
/// The raw response is `l·σ(k(val−c1)) + l·σ(k(val−c2)) − l`. The cutoff is
/// the same expression evaluated at the midpoint `(c2−c1)/2`; any response
/// whose magnitude does not exceed the cutoff is returned as exactly `0.0`.
/// Because the centers are symmetric about zero, `stim(0.0, kind) == 0.0`
/// for every kind.
pub fn stim(val: f64, kind: StimulusKind) -> f64 {
    let (c1, c2, k, l) = kind.shape();

    let s = l * logistic(k * (val - c1)) + l * logistic(k * (val - c2)) - l;

    let mid = (c2 - c1) / 2.0;
    let cutoff = l * logistic(k * mid) + l * logistic(-k * mid) - l;

    if s.abs() > cutoff {
        s
    } else {
        0.0
    }
}

/// Fixed calibration curve for the sensitivity factor.
///
/// Maps the averaged fast-sensor level to a receptor sensitivity; the
/// reference level 1 maps to the curve value the factor is normalized by.
fn calibration() -> &'static EndpointTable {
    static TABLE: OnceLock<EndpointTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        EndpointTable::new(
            vec![0.0, 0.5, 1.0, 2.0, 10.0],
            vec![0.65, 0.7, 1.0, 1.01, 1.05],
        )
        .expect("static calibration table is valid")
    })
}

/// Normalized sensitivity scaling factor.
///
/// Averages the calcium- and calcitriol-related inputs, evaluates the
/// calibration curve at the average and normalizes by the curve value at
/// the reference point 1, so `sens(1.0, 1.0) == 1.0` exactly.
pub fn sens(c: f64, d: f64) -> f64 {
    let table = calibration();
    let avg = (c + d) / 2.0;
    table.smooth_at(avg) / table.smooth_at(1.0)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_deviation_gives_exactly_zero() {
        for kind in [
            StimulusKind::Calcium,
            StimulusKind::Phosphate,
            StimulusKind::Calcitriol,
        ] {
            assert_eq!(stim(0.0, kind), 0.0);
        }
    }

    #[test]
    fn stimulus_is_finite_and_bounded() {
        for kind in [
            StimulusKind::Calcium,
            StimulusKind::Phosphate,
            StimulusKind::Calcitriol,
        ] {
            let mut v = -5.0;
            while v <= 5.0 {
                let s = stim(v, kind);
                assert!(s.is_finite());
                assert!(s.abs() <= 1.0 + 1e-12);
                v += 0.1;
            }
        }
    }

    #[test]
    fn stimulus_sign_follows_deviation() {
        assert!(stim(1.5, StimulusKind::Calcium) > 0.0);
        assert!(stim(-1.5, StimulusKind::Calcium) < 0.0);
        assert!(stim(2.0, StimulusKind::Phosphate) > 0.0);
        assert!(stim(-2.0, StimulusKind::Phosphate) < 0.0);
    }

    #[test]
    fn stimulus_saturates_at_amplitude() {
        // Far from both centers the double sigmoid approaches ±l.
        assert!((stim(50.0, StimulusKind::Calcium) - 1.0).abs() < 1e-6);
        assert!((stim(-50.0, StimulusKind::Calcium) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn kind_parsing_is_closed() {
        assert_eq!("c".parse::<StimulusKind>().unwrap(), StimulusKind::Calcium);
        assert_eq!(
            "phosphate".parse::<StimulusKind>().unwrap(),
            StimulusKind::Phosphate
        );
        assert_eq!(
            "d".parse::<StimulusKind>().unwrap(),
            StimulusKind::Calcitriol
        );
        assert!("x".parse::<StimulusKind>().is_err());
        assert!("".parse::<StimulusKind>().is_err());
    }

    #[test]
    fn sensitivity_is_normalized_at_reference() {
        assert_eq!(sens(1.0, 1.0), 1.0);
        // Any split with the same average hits the same point.
        assert_eq!(sens(0.5, 1.5), 1.0);
    }

    #[test]
    fn sensitivity_drops_below_reference_for_low_inputs() {
        assert!(sens(0.2, 0.2) < 1.0);
        assert!(sens(0.0, 0.0) < sens(0.5, 0.5));
    }

    #[test]
    fn sensitivity_rises_slowly_above_reference() {
        let high = sens(3.0, 3.0);
        assert!(high > 1.0);
        assert!(high < 1.1);
    }
}
