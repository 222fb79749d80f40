//! Heuristic contamination risk scoring.
//!
//! The score is a weighted sum of five terms, each saturating at its weight:
//! pH deviation (30), magnesium (20), mercury (30), oil (10) and trash (10).
//! The total is clamped to `[0, 100]`.

use crate::reading::ContaminationProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// pH deviation from neutral at which the pH term saturates.
const PH_DEVIATION_CAP: f64 = 4.0;
/// Magnesium (mg/L) at or below which the term is zero.
const MAGNESIUM_SAFE: f64 = 30.0;
/// Magnesium (mg/L) above which the full weight applies.
const MAGNESIUM_SEVERE: f64 = 50.0;
/// Mercury (mg/L) treated as critical.
const MERCURY_CRITICAL: f64 = 0.002;
/// Oil (mg/L) at which the oil term saturates.
const OIL_CAP: f64 = 1.0;
/// Trash (items/m^3) at which the trash term saturates.
const TRASH_CAP: f64 = 20.0;

const PH_WEIGHT: f64 = 30.0;
const MAGNESIUM_WEIGHT: f64 = 20.0;
const MERCURY_WEIGHT: f64 = 30.0;
const OIL_WEIGHT: f64 = 10.0;
const TRASH_WEIGHT: f64 = 10.0;

/// Categorical severity derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            RiskLevel::Low
        } else if score < 50.0 {
            RiskLevel::Medium
        } else if score < 75.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

fn saturate(ratio: f64) -> f64 {
    ratio.max(0.0).min(1.0)
}

impl ContaminationProfile {
    pub fn ph_term(&self) -> f64 {
        ((self.ph - 7.0).abs() / PH_DEVIATION_CAP).min(1.0) * PH_WEIGHT
    }

    pub fn magnesium_term(&self) -> f64 {
        if self.magnesium > MAGNESIUM_SEVERE {
            MAGNESIUM_WEIGHT
        } else if self.magnesium > MAGNESIUM_SAFE {
            // Only reaches half the weight before the severe step.
            10.0 * ((self.magnesium - MAGNESIUM_SAFE) / (MAGNESIUM_SEVERE - MAGNESIUM_SAFE))
        } else {
            0.0
        }
    }

    pub fn mercury_term(&self) -> f64 {
        saturate(self.mercury / MERCURY_CRITICAL) * MERCURY_WEIGHT
    }

    pub fn oil_term(&self) -> f64 {
        saturate(self.oil / OIL_CAP) * OIL_WEIGHT
    }

    pub fn trash_term(&self) -> f64 {
        saturate(self.trash / TRASH_CAP) * TRASH_WEIGHT
    }

    /// Risk score in `[0, 100]`.
    pub fn risk_score(&self) -> f64 {
        let score = self.ph_term()
            + self.magnesium_term()
            + self.mercury_term()
            + self.oil_term()
            + self.trash_term();
        score.max(0.0).min(100.0)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> ContaminationProfile {
        ContaminationProfile {
            ph: 7.0,
            magnesium: 0.0,
            mercury: 0.0,
            oil: 0.0,
            trash: 0.0,
        }
    }

    #[test]
    fn test_neutral_reading_is_low() {
        let profile = neutral();
        assert_eq!(profile.risk_score(), 0.0);
        assert_eq!(profile.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_critical_mercury_term() {
        let profile = ContaminationProfile {
            mercury: 0.002,
            ..neutral()
        };
        assert_eq!(profile.mercury_term(), 30.0);
        assert_eq!(profile.risk_score(), 30.0);
    }

    #[test]
    fn test_magnesium_steps() {
        let severe = ContaminationProfile {
            magnesium: 60.0,
            ..neutral()
        };
        assert_eq!(severe.magnesium_term(), 20.0);

        let moderate = ContaminationProfile {
            magnesium: 40.0,
            ..neutral()
        };
        assert_eq!(moderate.magnesium_term(), 5.0);

        let boundary = ContaminationProfile {
            magnesium: 50.0,
            ..neutral()
        };
        assert_eq!(boundary.magnesium_term(), 10.0);
    }

    #[test]
    fn test_ph_deviation_saturates() {
        let acidic = ContaminationProfile { ph: 1.0, ..neutral() };
        assert_eq!(acidic.ph_term(), 30.0);
        let alkaline = ContaminationProfile { ph: 9.0, ..neutral() };
        assert_eq!(alkaline.ph_term(), 15.0);
    }

    #[test]
    fn test_negative_inputs_do_not_reduce_score() {
        let profile = ContaminationProfile {
            mercury: -1.0,
            oil: -5.0,
            trash: -3.0,
            ..neutral()
        };
        assert_eq!(profile.risk_score(), 0.0);
    }

    #[test]
    fn test_everything_maxed_is_critical() {
        let profile = ContaminationProfile {
            ph: 14.0,
            magnesium: 500.0,
            mercury: 1.0,
            oil: 50.0,
            trash: 1000.0,
        };
        assert_eq!(profile.risk_score(), 100.0);
        assert_eq!(profile.risk_level(), RiskLevel::Critical);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(19.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::Critical.to_string(), "CRITICAL");
    }
}
