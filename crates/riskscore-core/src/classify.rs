//! Three-tier risk classification.
//!
//! Two modes exist and they are deliberately not equivalent:
//!
//! - category mode works on the rounded percentage, with the MEDIO band
//!   starting at 33 inclusive and ALTO at 66 inclusive;
//! - overall mode works on raw totals, i.e. average intensity >= 2 is ALTO
//!   and >= 1 is MEDIO.
//!
//! Boundary cases can land in different tiers under the two modes. Changing
//! either threshold set changes observable classifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Percentage at or above which a category is `RIESGO ALTO`.
pub const CATEGORY_HIGH_PERCENTAGE: u32 = 66;
/// Percentage at or above which a category is `RIESGO MEDIO`.
pub const CATEGORY_MEDIUM_PERCENTAGE: u32 = 33;

/// Risk tier. The display strings double as user-facing text and are
/// matched by string equality downstream, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "RIESGO BAJO")]
    Low,
    #[serde(rename = "RIESGO MEDIO")]
    Medium,
    #[serde(rename = "RIESGO ALTO")]
    High,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "RIESGO BAJO",
            RiskTier::Medium => "RIESGO MEDIO",
            RiskTier::High => "RIESGO ALTO",
        }
    }

    /// Badge colour used by summary views.
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Low => "#2e7d32",
            RiskTier::Medium => "#f9a825",
            RiskTier::High => "#c62828",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RIESGO BAJO" => Ok(RiskTier::Low),
            "RIESGO MEDIO" => Ok(RiskTier::Medium),
            "RIESGO ALTO" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier: {other}")),
        }
    }
}

/// Classify a category from its 0..=100 percentage.
pub fn classify_category(percentage: u32) -> RiskTier {
    if percentage >= CATEGORY_HIGH_PERCENTAGE {
        RiskTier::High
    } else if percentage >= CATEGORY_MEDIUM_PERCENTAGE {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Classify an attempt from its raw totals.
///
/// With no questions at all the attempt is `RIESGO BAJO`; the `>=`
/// comparison would otherwise hold vacuously and yield ALTO.
pub fn classify_overall(total_score: u32, total_questions: u32) -> RiskTier {
    if total_questions == 0 {
        return RiskTier::Low;
    }
    let score = u64::from(total_score);
    let questions = u64::from(total_questions);
    if score >= questions * 2 {
        RiskTier::High
    } else if score >= questions {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_thresholds() {
        assert_eq!(classify_category(0), RiskTier::Low);
        assert_eq!(classify_category(32), RiskTier::Low);
        assert_eq!(classify_category(33), RiskTier::Medium);
        assert_eq!(classify_category(56), RiskTier::Medium);
        assert_eq!(classify_category(65), RiskTier::Medium);
        assert_eq!(classify_category(66), RiskTier::High);
        assert_eq!(classify_category(100), RiskTier::High);
    }

    #[test]
    fn overall_thresholds() {
        assert_eq!(classify_overall(0, 3), RiskTier::Low);
        assert_eq!(classify_overall(2, 3), RiskTier::Low);
        assert_eq!(classify_overall(3, 3), RiskTier::Medium);
        assert_eq!(classify_overall(5, 3), RiskTier::Medium);
        assert_eq!(classify_overall(6, 3), RiskTier::High);
        assert_eq!(classify_overall(3, 1), RiskTier::High);
    }

    #[test]
    fn overall_with_no_questions_is_low() {
        assert_eq!(classify_overall(0, 0), RiskTier::Low);
    }

    #[test]
    fn modes_disagree_near_boundaries() {
        // Average 1.98 stays MEDIO overall while 66% is already ALTO.
        assert_eq!(classify_overall(99, 50), RiskTier::Medium);
        assert_eq!(classify_category(66), RiskTier::High);

        // Average 0.98 stays BAJO overall while 33% is already MEDIO.
        assert_eq!(classify_overall(49, 50), RiskTier::Low);
        assert_eq!(classify_category(33), RiskTier::Medium);
    }

    #[test]
    fn tier_strings_are_verbatim() {
        assert_eq!(RiskTier::Low.to_string(), "RIESGO BAJO");
        assert_eq!(RiskTier::Medium.to_string(), "RIESGO MEDIO");
        assert_eq!(RiskTier::High.to_string(), "RIESGO ALTO");
        assert_eq!(
            serde_json::to_string(&RiskTier::High).unwrap(),
            "\"RIESGO ALTO\""
        );
        assert_eq!("RIESGO MEDIO".parse::<RiskTier>().unwrap(), RiskTier::Medium);
        assert!("riesgo alto".parse::<RiskTier>().is_err());
    }
}
