use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::comparison::synthesizer::ComparisonPoint;
use crate::types::{Money, Percent};
use crate::{ForecastError, ForecastResult};

/// Aggregate of a comparison dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub current_total: Money,
    pub previous_total: Money,
    /// `(current_total - previous_total) / previous_total * 100`
    pub percent_change: Percent,
    pub is_positive: bool,
}

/// Percent change from `previous` to `current`.
pub fn percent_change(current: Money, previous: Money) -> ForecastResult<Percent> {
    if previous.is_zero() {
        return Err(ForecastError::DivisionByZero {
            context: "percent change (previous period total is zero)".into(),
        });
    }
    current
        .checked_sub(previous)
        .and_then(|diff| diff.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| ForecastError::overflow("percent change"))
}

/// Sum current/previous pairs and compute the change between the totals.
pub fn summarize_pairs(
    pairs: impl IntoIterator<Item = (Money, Money)>,
) -> ForecastResult<ComparisonSummary> {
    let (current_total, previous_total) = pairs
        .into_iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(c, p), (cur, prev)| {
            Some((c.checked_add(cur)?, p.checked_add(prev)?))
        })
        .ok_or_else(|| ForecastError::overflow("comparison totals"))?;
    let change = percent_change(current_total, previous_total)?;
    debug!("summary: current={current_total} previous={previous_total} change={change}");
    Ok(ComparisonSummary {
        current_total,
        previous_total,
        percent_change: change,
        is_positive: change >= Decimal::ZERO,
    })
}

/// Summary over the primary values.
pub fn summarize_primary(points: &[ComparisonPoint]) -> ForecastResult<ComparisonSummary> {
    summarize_pairs(points.iter().map(|p| (p.current_value, p.previous_value)))
}

/// Summary over the secondary values, `None` when the dataset carries none.
pub fn summarize_secondary(
    points: &[ComparisonPoint],
) -> ForecastResult<Option<ComparisonSummary>> {
    if points.iter().all(|p| p.secondary.is_none()) {
        return Ok(None);
    }
    summarize_pairs(
        points
            .iter()
            .filter_map(|p| p.secondary.as_ref())
            .map(|s| (s.current_value, s.previous_value)),
    )
    .map(Some)
}
