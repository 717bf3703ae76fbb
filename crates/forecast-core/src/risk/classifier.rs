//! Liquidity risk classification over a daily series.
//!
//! The minimum safe balance is a property of the whole series:
//! `min(balance) * min_safe_multiplier`. A date is at risk when its balance
//! sits below `min_safe_balance * risk_margin_multiplier`. Charts, tables and
//! alerting all read the same classification from here.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::RiskConfig;
use crate::risk::windows::{risk_windows, RiskWindow};
use crate::series::{require_non_empty, validate_daily_series};
use crate::types::{with_metadata, ComputationOutput, DailyForecastPoint, Money};
use crate::{ForecastError, ForecastResult};

/// A daily point with its risk flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnnotatedPoint {
    #[serde(flatten)]
    pub point: DailyForecastPoint,
    pub is_risk_date: bool,
}

/// The input series annotated with per-date risk flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnnotatedSeries {
    /// `min(balance) * min_safe_multiplier`
    pub min_safe_balance: Money,
    /// `min_safe_balance * risk_margin_multiplier`; balances below it are flagged.
    pub risk_threshold: Money,
    pub points: Vec<RiskAnnotatedPoint>,
    pub risk_dates: Vec<NaiveDate>,
    pub risk_count: usize,
    pub first_risk_date: Option<NaiveDate>,
    /// Contiguous runs of flagged points.
    pub risk_windows: Vec<RiskWindow>,
}

/// Classify every point of `series` against the series' own safe-balance threshold.
pub fn classify_liquidity_risk(
    series: &[DailyForecastPoint],
    config: &RiskConfig,
) -> ForecastResult<ComputationOutput<RiskAnnotatedSeries>> {
    config.validate()?;
    let min_safe = min_safe_balance(series, config)?;
    annotate(
        series,
        min_safe,
        config,
        "Liquidity risk: min(balance) x safe multiplier, flagged below threshold x margin",
    )
}

/// Classify `series` against a safe-balance floor computed elsewhere, e.g. from
/// an earlier snapshot. Lowering any balance can only add flags.
pub fn classify_against_threshold(
    series: &[DailyForecastPoint],
    min_safe_balance: Money,
    config: &RiskConfig,
) -> ForecastResult<ComputationOutput<RiskAnnotatedSeries>> {
    config.validate()?;
    require_non_empty(series, "liquidity risk classification")?;
    annotate(
        series,
        min_safe_balance,
        config,
        "Liquidity risk against a fixed safe-balance floor, flagged below floor x margin",
    )
}

/// `min(balance) * min_safe_multiplier`. Fails on an empty series.
pub fn min_safe_balance(
    series: &[DailyForecastPoint],
    config: &RiskConfig,
) -> ForecastResult<Money> {
    require_non_empty(series, "liquidity risk classification")?;
    let min_balance = series
        .iter()
        .map(|p| p.balance)
        .min()
        .unwrap_or_default();
    min_balance
        .checked_mul(config.min_safe_multiplier)
        .ok_or_else(|| ForecastError::overflow("minimum safe balance"))
}

/// Whether a single balance is at risk for a given safe-balance floor.
///
/// A threshold beyond the representable range lies above every balance when
/// the floor is positive and below every balance otherwise.
pub fn is_risk_date(balance: Money, min_safe_balance: Money, config: &RiskConfig) -> bool {
    match min_safe_balance.checked_mul(config.risk_margin_multiplier) {
        Some(threshold) => balance < threshold,
        None => min_safe_balance.is_sign_positive(),
    }
}

fn annotate(
    series: &[DailyForecastPoint],
    min_safe: Money,
    config: &RiskConfig,
    methodology: &str,
) -> ForecastResult<ComputationOutput<RiskAnnotatedSeries>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_daily_series(series)?;
    let threshold = min_safe
        .checked_mul(config.risk_margin_multiplier)
        .ok_or_else(|| ForecastError::overflow("liquidity risk threshold"))?;

    if min_safe.is_sign_negative() {
        warnings.push(format!(
            "Series dips below zero (minimum safe balance {min_safe}); \
             the threshold sits above the lowest balances."
        ));
    }

    let points: Vec<RiskAnnotatedPoint> = series
        .iter()
        .map(|p| RiskAnnotatedPoint {
            point: p.clone(),
            is_risk_date: p.balance < threshold,
        })
        .collect();

    let risk_dates: Vec<NaiveDate> = points
        .iter()
        .filter(|p| p.is_risk_date)
        .map(|p| p.point.date)
        .collect();
    let windows = risk_windows(&points);

    debug!(
        "risk classification: min_safe={min_safe} threshold={threshold} flagged={}/{}",
        risk_dates.len(),
        points.len()
    );

    let result = RiskAnnotatedSeries {
        min_safe_balance: min_safe,
        risk_threshold: threshold,
        risk_count: risk_dates.len(),
        first_risk_date: risk_dates.first().copied(),
        risk_dates,
        points,
        risk_windows: windows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, config, warnings, elapsed, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn flat(n: usize, balance: Money) -> Vec<DailyForecastPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        (0..n)
            .map(|i| DailyForecastPoint {
                date: start + Duration::days(i as i64),
                balance,
                inflows: dec!(100),
                outflows: dec!(50),
                confidence: 80,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            classify_liquidity_risk(&[], &RiskConfig::default()),
            Err(ForecastError::EmptySeries { .. })
        ));
    }

    #[test]
    fn test_flat_series_not_flagged() {
        let out = classify_liquidity_risk(&flat(30, dec!(1000)), &RiskConfig::default())
            .unwrap()
            .result;
        assert_eq!(out.min_safe_balance, dec!(800));
        assert_eq!(out.risk_threshold, dec!(920));
        assert_eq!(out.risk_count, 0);
        assert!(out.first_risk_date.is_none());
    }

    #[test]
    fn test_is_risk_date_strict() {
        let cfg = RiskConfig::default();
        assert!(!is_risk_date(dec!(920), dec!(800), &cfg));
        assert!(is_risk_date(dec!(919.99), dec!(800), &cfg));
    }

    #[test]
    fn test_negative_minimum_warns() {
        let mut series = flat(5, dec!(1000));
        series[2].balance = dec!(-500);
        let out = classify_liquidity_risk(&series, &RiskConfig::default()).unwrap();
        assert_eq!(out.result.min_safe_balance, dec!(-400));
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_fixed_threshold_flags_lowered_point() {
        let mut series = flat(30, dec!(1000));
        series[12].balance = dec!(700);
        let out = classify_against_threshold(&series, dec!(800), &RiskConfig::default())
            .unwrap()
            .result;
        assert_eq!(out.risk_count, 1);
        assert_eq!(out.risk_dates, vec![series[12].date]);
    }

    #[test]
    fn test_threshold_overflow_is_error() {
        let series = flat(3, dec!(1000));
        assert!(matches!(
            classify_against_threshold(&series, Decimal::MAX, &RiskConfig::default()),
            Err(ForecastError::Overflow { .. })
        ));
    }

    #[test]
    fn test_is_risk_date_beyond_range() {
        let cfg = RiskConfig::default();
        assert!(is_risk_date(Decimal::MAX, Decimal::MAX, &cfg));
        assert!(!is_risk_date(Decimal::MIN, Decimal::MIN, &cfg));
    }

    #[test]
    fn test_custom_multipliers() {
        let cfg = RiskConfig {
            min_safe_multiplier: dec!(1),
            risk_margin_multiplier: dec!(1.5),
        };
        let mut series = flat(3, dec!(1000));
        series[0].balance = dec!(600);
        // threshold = 600 * 1.5 = 900: the 600 point only
        let out = classify_liquidity_risk(&series, &cfg).unwrap().result;
        assert_eq!(out.risk_threshold, dec!(900));
        assert_eq!(out.risk_count, 1);
    }
}
