use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Days;

/// Display tier for the cash conversion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashConversionTier {
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

/// Display tier for runway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayTier {
    Healthy,
    Moderate,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl fmt::Display for CashConversionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("Good"),
            Self::NeedsImprovement => f.write_str("Needs Improvement"),
        }
    }
}

impl fmt::Display for RunwayTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("Healthy"),
            Self::Moderate => f.write_str("Moderate"),
            Self::AtRisk => f.write_str("At Risk"),
        }
    }
}

/// Cycle under 45 days is "Good"; 45 and above "Needs Improvement".
pub fn cash_conversion_tier(ccc_days: Days) -> CashConversionTier {
    if ccc_days < dec!(45) {
        CashConversionTier::Good
    } else {
        CashConversionTier::NeedsImprovement
    }
}

/// Over 180 days "Healthy", over 90 "Moderate", otherwise "At Risk".
///
/// `None` is an unbounded runway (zero burn) and counts as healthy.
pub fn runway_tier(runway_days: Option<Days>) -> RunwayTier {
    match runway_days {
        None => RunwayTier::Healthy,
        Some(days) if days > dec!(180) => RunwayTier::Healthy,
        Some(days) if days > dec!(90) => RunwayTier::Moderate,
        Some(_) => RunwayTier::AtRisk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ccc_boundary() {
        assert_eq!(cash_conversion_tier(dec!(44.99)), CashConversionTier::Good);
        assert_eq!(
            cash_conversion_tier(dec!(45)),
            CashConversionTier::NeedsImprovement
        );
        assert_eq!(cash_conversion_tier(dec!(-10)), CashConversionTier::Good);
    }

    #[test]
    fn test_runway_boundaries() {
        assert_eq!(runway_tier(Some(dec!(180.01))), RunwayTier::Healthy);
        assert_eq!(runway_tier(Some(dec!(180))), RunwayTier::Moderate);
        assert_eq!(runway_tier(Some(dec!(90.5))), RunwayTier::Moderate);
        assert_eq!(runway_tier(Some(dec!(90))), RunwayTier::AtRisk);
        assert_eq!(runway_tier(Some(Decimal::ZERO)), RunwayTier::AtRisk);
        assert_eq!(runway_tier(None), RunwayTier::Healthy);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(
            CashConversionTier::NeedsImprovement.to_string(),
            "Needs Improvement"
        );
        assert_eq!(RunwayTier::AtRisk.to_string(), "At Risk");
        assert_eq!(
            serde_json::to_string(&RunwayTier::AtRisk).unwrap(),
            "\"At Risk\""
        );
    }
}
