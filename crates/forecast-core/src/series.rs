//! Shared helpers over daily and monthly series.
//!
//! Provides:
//! - Shape validation for daily series (ascending unique dates, confidence 0-100)
//! - Net flow of a single point
//! - Merging a historical and a forecast series into one chart timeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DailyForecastPoint, Money, MonthlyForecastPoint};
use crate::{ForecastError, ForecastResult};

/// Origin of a point on a merged timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    Historical,
    Forecast,
}

/// A point on the merged historical + forecast timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    #[serde(flatten)]
    pub point: DailyForecastPoint,
    pub source: PointSource,
}

/// Net cash movement of a day: inflows minus outflows.
pub fn net_flow(point: &DailyForecastPoint) -> ForecastResult<Money> {
    point
        .inflows
        .checked_sub(point.outflows)
        .ok_or_else(|| ForecastError::overflow("net flow"))
}

/// Fail with `EmptySeries` when `series` has no points.
pub fn require_non_empty<T>(series: &[T], context: &str) -> ForecastResult<()> {
    if series.is_empty() {
        return Err(ForecastError::EmptySeries {
            context: context.into(),
        });
    }
    Ok(())
}

/// Check ordering and confidence bounds of a daily series.
///
/// Gaps between dates are allowed.
pub fn validate_daily_series(series: &[DailyForecastPoint]) -> ForecastResult<()> {
    for (idx, point) in series.iter().enumerate() {
        check_confidence(point.confidence, idx)?;
        if idx > 0 && point.date <= series[idx - 1].date {
            return Err(ForecastError::InvalidInput {
                field: format!("series[{idx}].date"),
                reason: format!(
                    "Dates must be strictly ascending ({} follows {}).",
                    point.date,
                    series[idx - 1].date
                ),
            });
        }
    }
    Ok(())
}

/// Check confidence bounds of a monthly series.
pub fn validate_monthly_series(series: &[MonthlyForecastPoint]) -> ForecastResult<()> {
    series
        .iter()
        .enumerate()
        .try_for_each(|(idx, point)| check_confidence(point.confidence, idx))
}

fn check_confidence(confidence: u8, idx: usize) -> ForecastResult<()> {
    if confidence > 100 {
        return Err(ForecastError::InvalidInput {
            field: format!("series[{idx}].confidence"),
            reason: format!("Confidence {confidence} exceeds 100."),
        });
    }
    Ok(())
}

/// Merge historical actuals and a forecast into one ascending timeline.
///
/// Forecast points dated on or before the last historical date are dropped,
/// so actuals always win where the two overlap.
pub fn merge_timeline(
    historical: &[DailyForecastPoint],
    forecast: &[DailyForecastPoint],
) -> ForecastResult<Vec<TimelinePoint>> {
    validate_daily_series(historical)?;
    validate_daily_series(forecast)?;

    let cutoff: Option<NaiveDate> = historical.last().map(|p| p.date);

    let mut timeline: Vec<TimelinePoint> = historical
        .iter()
        .cloned()
        .map(|point| TimelinePoint {
            point,
            source: PointSource::Historical,
        })
        .collect();

    timeline.extend(
        forecast
            .iter()
            .filter(|p| cutoff.is_none_or(|c| p.date > c))
            .cloned()
            .map(|point| TimelinePoint {
                point,
                source: PointSource::Forecast,
            }),
    );

    Ok(timeline)
}
