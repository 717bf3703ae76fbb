//! Period-over-period comparison datasets.
//!
//! Pairs each point of the current series with a previous-period value and
//! display labels. The previous-period date is the current date shifted back
//! by one month, one quarter or one year. It is a display label only; the
//! value itself comes from a [`BaselineSource`]. Switching granularity
//! rebuilds the whole previous series from the same current series.

use chrono::{Months, NaiveDate};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Instant;

use crate::comparison::baseline::{BaselineSource, SimulatedBaseline};
use crate::comparison::summary::{summarize_primary, summarize_secondary, ComparisonSummary};
use crate::config::ComparisonConfig;
use crate::series::{net_flow, require_non_empty, validate_daily_series};
use crate::types::{with_metadata, ComputationOutput, DailyForecastPoint, Money};
use crate::{ForecastError, ForecastResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How far back the comparison period lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn months(self) -> u32 {
        match self {
            Granularity::Month => 1,
            Granularity::Quarter => 3,
            Granularity::Year => 12,
        }
    }
}

/// Which field of a daily point is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKey {
    Balance,
    Inflows,
    Outflows,
    /// `inflows - outflows`
    NetFlow,
}

impl ValueKey {
    pub fn extract(self, point: &DailyForecastPoint) -> ForecastResult<Money> {
        match self {
            ValueKey::Balance => Ok(point.balance),
            ValueKey::Inflows => Ok(point.inflows),
            ValueKey::Outflows => Ok(point.outflows),
            ValueKey::NetFlow => net_flow(point),
        }
    }
}

/// Input for a period comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    /// Current-period daily series, ascending.
    pub series: Vec<DailyForecastPoint>,
    pub granularity: Granularity,
    pub primary_key: ValueKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<ValueKey>,
}

/// Current/previous pair for the optional secondary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryValues {
    pub current_value: Money,
    pub previous_value: Money,
}

/// One point of the paired dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    pub current_value: Money,
    pub previous_value: Money,
    pub display_date: String,
    pub previous_display_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryValues>,
}

/// Paired dataset plus aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub granularity: Granularity,
    pub primary_key: ValueKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<ValueKey>,
    /// True when previous values were simulated rather than observed.
    pub simulated: bool,
    pub points: Vec<ComparisonPoint>,
    pub summary: ComparisonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_summary: Option<ComparisonSummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Shift `date` back by one comparison period, clamping to month end.
pub fn previous_period_date(date: NaiveDate, granularity: Granularity) -> ForecastResult<NaiveDate> {
    date.checked_sub_months(Months::new(granularity.months()))
        .ok_or_else(|| {
            ForecastError::DateError(format!(
                "Cannot shift {date} back {} month(s).",
                granularity.months()
            ))
        })
}

/// Build the paired comparison points for `input` from `source`.
pub fn synthesize_comparison<S: BaselineSource + ?Sized>(
    input: &ComparisonInput,
    config: &ComparisonConfig,
    source: &mut S,
) -> ForecastResult<Vec<ComparisonPoint>> {
    require_non_empty(&input.series, "period comparison")?;
    validate_daily_series(&input.series)?;

    input
        .series
        .iter()
        .map(|point| {
            let previous_date = previous_period_date(point.date, input.granularity)?;
            let current_value = input.primary_key.extract(point)?;
            let previous_value =
                source.previous_value(previous_date, input.primary_key, current_value)?;

            let secondary = match input.secondary_key {
                Some(key) => {
                    let current = key.extract(point)?;
                    Some(SecondaryValues {
                        current_value: current,
                        previous_value: source.previous_value(previous_date, key, current)?,
                    })
                }
                None => None,
            };

            Ok(ComparisonPoint {
                date: point.date,
                current_value,
                previous_value,
                display_date: format_date(point.date, &config.display_format)?,
                previous_display_date: format_date(previous_date, &config.display_format)?,
                secondary,
            })
        })
        .collect()
}

/// Build the comparison dataset with totals and percent change.
///
/// Fails with `DivisionByZero` when a previous-period total is zero. This
/// includes the secondary total: a secondary key whose previous values sum
/// to zero fails the whole comparison even when the primary summary is valid.
pub fn analyze_period_comparison<S: BaselineSource + ?Sized>(
    input: &ComparisonInput,
    config: &ComparisonConfig,
    source: &mut S,
) -> ForecastResult<ComputationOutput<PeriodComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    let points = synthesize_comparison(input, config, source)?;
    let summary = summarize_primary(&points)?;
    let secondary_summary = summarize_secondary(&points)?;

    let simulated = source.is_simulated();
    if simulated {
        warnings.push(
            "Previous-period values are simulated from the current period, not observed history."
                .to_string(),
        );
    }

    debug!(
        "period comparison: {} points, granularity={:?}, change={}%",
        points.len(),
        input.granularity,
        summary.percent_change
    );

    let result = PeriodComparison {
        granularity: input.granularity,
        primary_key: input.primary_key,
        secondary_key: input.secondary_key,
        simulated,
        points,
        summary,
        secondary_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Period-over-period comparison (sum of current vs previous, percent change on previous total)",
        &serde_json::json!({
            "granularity": input.granularity,
            "primary_key": input.primary_key,
            "secondary_key": input.secondary_key,
            "factor_min": config.factor_min,
            "factor_max": config.factor_max,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Comparison against a simulated baseline drawn from a seeded or entropy RNG.
pub fn analyze_simulated_comparison(
    input: &ComparisonInput,
    config: &ComparisonConfig,
    seed: Option<u64>,
) -> ForecastResult<ComputationOutput<PeriodComparison>> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut source = SimulatedBaseline::new(&mut rng, config)?;
    analyze_period_comparison(input, config, &mut source)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn format_date(date: NaiveDate, format: &str) -> ForecastResult<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).map_err(|_| ForecastError::InvalidInput {
        field: "comparison.display_format".into(),
        reason: format!("'{format}' is not a valid date format."),
    })?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
