//! Engine configuration.
//!
//! Every tunable constant of the engine lives here with its observed default,
//! so a dashboard can override the risk multipliers, the assumed inventory
//! days or the simulated baseline range without touching the algorithms.
//! All sections deserialize with `serde(default)`, so a partial JSON/YAML
//! document only needs to name the values it changes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Days, Rate};
use crate::{ForecastError, ForecastResult};

/// Resolution of every sampled factor and fraction: one basis point.
pub const BASIS_POINTS_PER_UNIT: Decimal = dec!(10_000);

/// Top-level configuration for all engine components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kpi: KpiConfig,
    pub risk: RiskConfig,
    pub comparison: ComparisonConfig,
    pub drilldown: DrilldownConfig,
    /// Seed for the randomized generators. `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// What runway reports when the monthly burn rate is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBurnPolicy {
    /// Fail with `DivisionByZero`.
    #[default]
    Error,
    /// Report runway as unbounded (`None`) and attach a warning.
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Assumed days inventory outstanding in the cash conversion cycle.
    pub days_inventory_outstanding: Days,
    /// Number of leading monthly points averaged into the burn rate.
    pub burn_rate_months: usize,
    /// Daily index (0-based) used for the forward projected balance.
    pub projection_index: usize,
    pub zero_burn_policy: ZeroBurnPolicy,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            days_inventory_outstanding: dec!(30),
            burn_rate_months: 3,
            projection_index: 29,
            zero_burn_policy: ZeroBurnPolicy::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// `min_safe_balance = min(balance) * min_safe_multiplier`
    pub min_safe_multiplier: Rate,
    /// A point is at risk when `balance < min_safe_balance * risk_margin_multiplier`.
    pub risk_margin_multiplier: Rate,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_safe_multiplier: dec!(0.8),
            risk_margin_multiplier: dec!(1.15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Lower bound of the simulated previous-period factor (inclusive).
    /// Whole basis points only.
    pub factor_min: Rate,
    /// Upper bound of the simulated previous-period factor (inclusive).
    /// Whole basis points only.
    pub factor_max: Rate,
    /// chrono format string for the display labels.
    pub display_format: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            factor_min: dec!(0.7),
            factor_max: dec!(1.3),
            display_format: "%b %-d, %Y".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrilldownConfig {
    pub min_transactions: u32,
    pub max_transactions: u32,
    /// Probability that a synthesized transaction is income.
    pub inflow_probability: f64,
    /// Smallest transaction as a fraction of the monthly total, whole basis points.
    pub min_fraction: Rate,
    /// Largest transaction as a fraction of the monthly total, whole basis points.
    pub max_fraction: Rate,
}

impl Default for DrilldownConfig {
    fn default() -> Self {
        Self {
            min_transactions: 5,
            max_transactions: 10,
            inflow_probability: 0.6,
            min_fraction: dec!(0.05),
            max_fraction: dec!(0.20),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the algorithms cannot honour.
    pub fn validate(&self) -> ForecastResult<()> {
        self.kpi.validate()?;
        self.risk.validate()?;
        self.comparison.validate()?;
        self.drilldown.validate()
    }
}

impl KpiConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.days_inventory_outstanding < Decimal::ZERO {
            return Err(invalid(
                "kpi.days_inventory_outstanding",
                "Days inventory outstanding cannot be negative.",
            ));
        }
        if self.burn_rate_months == 0 {
            return Err(invalid(
                "kpi.burn_rate_months",
                "Burn rate must average at least one month.",
            ));
        }
        Ok(())
    }
}

impl RiskConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.min_safe_multiplier <= Decimal::ZERO {
            return Err(invalid(
                "risk.min_safe_multiplier",
                "Multiplier must be positive.",
            ));
        }
        if self.risk_margin_multiplier <= Decimal::ZERO {
            return Err(invalid(
                "risk.risk_margin_multiplier",
                "Multiplier must be positive.",
            ));
        }
        Ok(())
    }
}

impl ComparisonConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.factor_min < Decimal::ZERO {
            return Err(invalid(
                "comparison.factor_min",
                "Factor cannot be negative.",
            ));
        }
        if self.factor_min > self.factor_max {
            return Err(invalid(
                "comparison.factor_max",
                "Upper factor bound must be at least the lower bound.",
            ));
        }
        require_basis_points("comparison.factor_min", self.factor_min)?;
        require_basis_points("comparison.factor_max", self.factor_max)?;
        if self.display_format.trim().is_empty() {
            return Err(invalid(
                "comparison.display_format",
                "Display format cannot be empty.",
            ));
        }
        Ok(())
    }
}

impl DrilldownConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.min_transactions == 0 {
            return Err(invalid(
                "drilldown.min_transactions",
                "At least one transaction per month is required.",
            ));
        }
        if self.min_transactions > self.max_transactions {
            return Err(invalid(
                "drilldown.max_transactions",
                "Maximum transaction count must be at least the minimum.",
            ));
        }
        if !(0.0..=1.0).contains(&self.inflow_probability) {
            return Err(invalid(
                "drilldown.inflow_probability",
                "Probability must lie in [0, 1].",
            ));
        }
        if self.min_fraction < Decimal::ZERO || self.max_fraction > Decimal::ONE {
            return Err(invalid(
                "drilldown.min_fraction",
                "Fractions must lie in [0, 1].",
            ));
        }
        if self.min_fraction > self.max_fraction {
            return Err(invalid(
                "drilldown.max_fraction",
                "Upper fraction bound must be at least the lower bound.",
            ));
        }
        require_basis_points("drilldown.min_fraction", self.min_fraction)?;
        require_basis_points("drilldown.max_fraction", self.max_fraction)?;
        Ok(())
    }
}

/// `value` expressed as a whole number of basis points.
pub fn to_basis_points(field: &str, value: Rate) -> ForecastResult<u32> {
    let scaled = value
        .checked_mul(BASIS_POINTS_PER_UNIT)
        .filter(|bps| bps.fract().is_zero())
        .ok_or_else(|| invalid(field, "Value must be a whole number of basis points (0.0001)."))?;
    scaled
        .to_u32()
        .ok_or_else(|| invalid(field, "Value is out of range."))
}

fn require_basis_points(field: &str, value: Rate) -> ForecastResult<()> {
    to_basis_points(field, value).map(|_| ())
}

fn invalid(field: &str, reason: &str) -> ForecastError {
    ForecastError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_observed_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.risk.min_safe_multiplier, dec!(0.8));
        assert_eq!(cfg.risk.risk_margin_multiplier, dec!(1.15));
        assert_eq!(cfg.kpi.days_inventory_outstanding, dec!(30));
        assert_eq!(cfg.comparison.factor_min, dec!(0.7));
        assert_eq!(cfg.comparison.factor_max, dec!(1.3));
        assert_eq!(cfg.drilldown.min_transactions, 5);
        assert_eq!(cfg.drilldown.max_transactions, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"risk": {"risk_margin_multiplier": "1.25"}, "seed": 7}"#)
                .unwrap();
        assert_eq!(cfg.risk.risk_margin_multiplier, dec!(1.25));
        assert_eq!(cfg.risk.min_safe_multiplier, dec!(0.8));
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.kpi, KpiConfig::default());
    }

    #[test]
    fn test_inverted_factor_range_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.comparison.factor_min = dec!(1.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_off_grid_factor_bounds_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.comparison.factor_min = dec!(1.00004);
        cfg.comparison.factor_max = dec!(1.0001);
        assert!(matches!(
            cfg.validate(),
            Err(ForecastError::InvalidInput { field, .. }) if field == "comparison.factor_min"
        ));
    }

    #[test]
    fn test_off_grid_fraction_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.drilldown.max_fraction = dec!(0.20006);
        assert!(matches!(
            cfg.validate(),
            Err(ForecastError::InvalidInput { field, .. }) if field == "drilldown.max_fraction"
        ));
    }

    #[test]
    fn test_to_basis_points() {
        assert_eq!(to_basis_points("f", dec!(0.7)).unwrap(), 7_000);
        assert_eq!(to_basis_points("f", dec!(1.0001)).unwrap(), 10_001);
        assert!(to_basis_points("f", dec!(0.00005)).is_err());
    }

    #[test]
    fn test_inverted_transaction_count_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.drilldown.min_transactions = 12;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.drilldown.inflow_probability = 1.2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_risk_multiplier_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.risk.min_safe_multiplier = Decimal::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_burn_policy_snake_case() {
        let policy: ZeroBurnPolicy = serde_json::from_str(r#""unbounded""#).unwrap();
        assert_eq!(policy, ZeroBurnPolicy::Unbounded);
    }
}
