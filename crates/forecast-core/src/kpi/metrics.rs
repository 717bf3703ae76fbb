//! Headline cash KPIs derived from a forecast.
//!
//! Provides:
//! - Current balance and the balance 30 days ahead, with the delta between them
//! - Monthly burn rate averaged over the leading forecast months
//! - Cash conversion cycle = DSO + DIO - DPO, with DIO an assumed constant
//! - Runway in days at the current daily burn
//! - Display tiers for the cycle and the runway
//!
//! All calculations use `rust_decimal::Decimal`. No `f64`.

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{KpiConfig, ZeroBurnPolicy};
use crate::kpi::tiers::{cash_conversion_tier, runway_tier, CashConversionTier, RunwayTier};
use crate::series::{require_non_empty, validate_daily_series, validate_monthly_series};
use crate::types::{
    with_metadata, ComputationOutput, DailyForecastPoint, Days, Money, MonthlyForecastPoint,
    Percent,
};
use crate::{ForecastError, ForecastResult};

/// Days per month used to turn a monthly burn into a daily burn.
const DAYS_PER_MONTH: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Input for KPI derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiInput {
    /// Daily forecast, ascending. At least 30 points.
    pub daily: Vec<DailyForecastPoint>,
    /// Monthly forecast, ascending. At least 3 points.
    pub monthly: Vec<MonthlyForecastPoint>,
    /// Raw days sales outstanding from the KPI payload.
    pub dso: Decimal,
    /// Raw days payable outstanding from the KPI payload.
    pub dpo: Decimal,
}

/// Derived headline metrics. Recomputed on every input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub current_balance: Money,
    pub projected_balance_30d: Money,
    /// `projected_balance_30d - current_balance`
    pub delta: Money,
    /// Delta relative to the magnitude of the current balance, in percent.
    /// `None` when the current balance is zero.
    pub delta_pct: Option<Percent>,
    /// Average monthly outflow, always a positive magnitude.
    pub monthly_burn_rate: Money,
    pub dso: Days,
    pub dpo: Days,
    pub days_inventory_outstanding: Days,
    pub cash_conversion_cycle_days: Days,
    /// `None` when the burn rate is zero and the policy is `Unbounded`.
    pub runway_days: Option<Days>,
    pub cash_conversion_tier: CashConversionTier,
    pub runway_tier: RunwayTier,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full KPI set from a daily and a monthly forecast.
pub fn derive_kpis(
    input: &KpiInput,
    config: &KpiConfig,
) -> ForecastResult<ComputationOutput<KpiSet>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    validate_daily_series(&input.daily)?;
    validate_monthly_series(&input.monthly)?;

    let current = current_balance(&input.daily)?;
    let projected = projected_balance(&input.daily, config.projection_index)?;
    let delta = projected
        .checked_sub(current)
        .ok_or_else(|| ForecastError::overflow("30-day balance delta"))?;
    let delta_pct = if current.is_zero() {
        None
    } else {
        Some(
            delta
                .checked_div(current.abs())
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(|| ForecastError::overflow("30-day balance delta percent"))?,
        )
    };

    let burn = monthly_burn_rate(&input.monthly, config.burn_rate_months)?;
    let dso = round_days(input.dso);
    let dpo = round_days(input.dpo);
    let ccc = cash_conversion_cycle(dso, dpo, config.days_inventory_outstanding)?;

    let runway = match runway_days(current, burn) {
        Ok(days) => Some(days),
        Err(ForecastError::DivisionByZero { .. })
            if config.zero_burn_policy == ZeroBurnPolicy::Unbounded =>
        {
            warn!("zero monthly burn rate, reporting unbounded runway");
            warnings.push(
                "Monthly burn rate is zero; runway is unbounded at the current spend."
                    .to_string(),
            );
            None
        }
        Err(e) => return Err(e),
    };

    if current < Decimal::ZERO {
        warnings.push(format!(
            "Current balance is negative ({current}); runway is already exhausted."
        ));
    }
    if let Some(confidence) = input.daily.get(config.projection_index).map(|p| p.confidence) {
        if confidence < 50 {
            warnings.push(format!(
                "Projected balance carries low forecast confidence ({confidence}%)."
            ));
        }
    }

    debug!(
        "derived kpis: current={current} projected={projected} burn={burn} ccc={ccc} runway={runway:?}"
    );

    let kpis = KpiSet {
        current_balance: current,
        projected_balance_30d: projected,
        delta,
        delta_pct,
        monthly_burn_rate: burn,
        dso,
        dpo,
        days_inventory_outstanding: config.days_inventory_outstanding,
        cash_conversion_cycle_days: ccc,
        runway_days: runway,
        cash_conversion_tier: cash_conversion_tier(ccc),
        runway_tier: runway_tier(runway),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash KPI derivation (first-day balance, day-30 projection, trailing burn, DSO + DIO - DPO)",
        config,
        warnings,
        elapsed,
        kpis,
    ))
}

/// Balance of the first daily point.
pub fn current_balance(daily: &[DailyForecastPoint]) -> ForecastResult<Money> {
    require_non_empty(daily, "current balance")?;
    Ok(daily[0].balance)
}

/// Balance 30 days ahead: the point at index 29.
pub fn projected_balance_30d(daily: &[DailyForecastPoint]) -> ForecastResult<Money> {
    projected_balance(daily, 29)
}

/// Balance of the point at `index`.
pub fn projected_balance(daily: &[DailyForecastPoint], index: usize) -> ForecastResult<Money> {
    daily.get(index).map(|p| p.balance).ok_or_else(|| {
        ForecastError::InsufficientData(format!(
            "Projected balance needs at least {} daily points, got {}.",
            index + 1,
            daily.len()
        ))
    })
}

/// Mean outflow magnitude over the first `months` monthly points.
pub fn monthly_burn_rate(
    monthly: &[MonthlyForecastPoint],
    months: usize,
) -> ForecastResult<Money> {
    if months == 0 || monthly.len() < months {
        return Err(ForecastError::InsufficientData(format!(
            "Burn rate needs at least {} monthly points, got {}.",
            months.max(1),
            monthly.len()
        )));
    }
    let total = monthly[..months]
        .iter()
        .try_fold(Decimal::ZERO, |acc, m| acc.checked_add(m.outflows.abs()))
        .ok_or_else(|| ForecastError::overflow("monthly burn rate"))?;
    Ok(total / Decimal::from(months as u64))
}

/// Round a DSO/DPO figure to whole days, half away from zero.
pub fn round_days(days: Days) -> Days {
    days.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `dso + days_inventory_outstanding - dpo`
pub fn cash_conversion_cycle(
    dso: Days,
    dpo: Days,
    days_inventory_outstanding: Days,
) -> ForecastResult<Days> {
    dso.checked_add(days_inventory_outstanding)
        .and_then(|d| d.checked_sub(dpo))
        .ok_or_else(|| ForecastError::overflow("cash conversion cycle"))
}

/// `current_balance / (monthly_burn_rate / 30)`.
///
/// A zero burn rate is a `DivisionByZero`, never an infinite runway. A
/// runway too long to represent is an `Overflow`.
pub fn runway_days(current_balance: Money, monthly_burn_rate: Money) -> ForecastResult<Days> {
    if monthly_burn_rate.is_zero() {
        return Err(ForecastError::DivisionByZero {
            context: "runway (monthly burn rate is zero)".into(),
        });
    }
    let daily_burn = monthly_burn_rate / DAYS_PER_MONTH;
    if daily_burn.is_zero() {
        return Err(ForecastError::overflow("runway (daily burn rounds to zero)"));
    }
    current_balance
        .checked_div(daily_burn)
        .ok_or_else(|| ForecastError::overflow("runway"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
