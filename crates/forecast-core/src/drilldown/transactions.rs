//! Illustrative transaction detail behind a monthly summary.
//!
//! Expands one monthly forecast record into 5-10 synthesized transactions for
//! the nested drilldown table. Each transaction is income with probability
//! 0.6 and sized at 5%-20% of the month's inflows or outflows.
//!
//! The generated set is NOT a ledger: it does not sum to the month's totals,
//! and regenerating yields a different but statistically similar set. Seed
//! the RNG for stable output.

use chrono::{Datelike, Duration, Months, NaiveDate};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{to_basis_points, DrilldownConfig, BASIS_POINTS_PER_UNIT};
use crate::series::{require_non_empty, validate_monthly_series};
use crate::types::{with_metadata, ComputationOutput, Money, MonthlyForecastPoint, Rate};
use crate::{ForecastError, ForecastResult};

const INCOME_DESCRIPTIONS: &[&str] = &[
    "Customer Payment",
    "Invoice Settlement",
    "Subscription Revenue",
    "Service Fee",
    "Consulting Revenue",
    "Product Sales",
];

const EXPENSE_DESCRIPTIONS: &[&str] = &[
    "Payroll",
    "Office Rent",
    "Software Subscriptions",
    "Supplier Invoice",
    "Marketing Spend",
    "Utilities",
    "Insurance Premium",
];

const STATUSES: &[TransactionStatus] = &[
    TransactionStatus::Completed,
    TransactionStatus::Pending,
    TransactionStatus::Processing,
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCategory {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Processing,
}

/// One synthesized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: TransactionCategory,
    /// Income positive, expense negative.
    pub amount: Money,
    pub status: TransactionStatus,
}

/// Drilldown rows for one month with display totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthDrilldown {
    pub month: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub transactions: Vec<TransactionRecord>,
    pub transaction_count: usize,
    /// Sum of income amounts. Not reconciled against the month's inflows.
    pub total_income: Money,
    /// Sum of expense magnitudes. Not reconciled against the month's outflows.
    pub total_expense: Money,
    pub net: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// First day of the labelled month and its number of days.
///
/// Accepts "2024-03", "2024-03-17", "Mar 2024" and "March 2024".
pub fn month_bounds(label: &str) -> ForecastResult<(NaiveDate, u32)> {
    let label = label.trim();
    let first = NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(label, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("01 {label}"), "%d %B %Y"))
        .map_err(|_| {
            ForecastError::DateError(format!("Unrecognised month label '{label}'."))
        })?
        .with_day(1)
        .ok_or_else(|| ForecastError::DateError(format!("Invalid month '{label}'.")))?;

    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| ForecastError::DateError(format!("Month '{label}' out of range.")))?;
    let days = (next - first).num_days() as u32;
    Ok((first, days))
}

/// Synthesize the transactions of one month, sorted ascending by date.
pub fn generate_transactions<R: Rng + ?Sized>(
    month: &MonthlyForecastPoint,
    config: &DrilldownConfig,
    rng: &mut R,
) -> ForecastResult<Vec<TransactionRecord>> {
    config.validate()?;
    let (first, days) = month_bounds(&month.month)?;
    let min_bps = to_basis_points("drilldown.min_fraction", config.min_fraction)?;
    let max_bps = to_basis_points("drilldown.max_fraction", config.max_fraction)?;

    let count = rng.gen_range(config.min_transactions..=config.max_transactions);

    let mut drawn: Vec<TransactionRecord> = (0..count)
        .map(|_| {
            let income = rng.gen_bool(config.inflow_probability);
            let (category, base, vocabulary) = if income {
                (
                    TransactionCategory::Income,
                    month.inflows.abs(),
                    INCOME_DESCRIPTIONS,
                )
            } else {
                (
                    TransactionCategory::Expense,
                    month.outflows.abs(),
                    EXPENSE_DESCRIPTIONS,
                )
            };

            let fraction: Rate =
                Decimal::from(rng.gen_range(min_bps..=max_bps)) / BASIS_POINTS_PER_UNIT;
            let magnitude = (base * fraction)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let amount = match category {
                TransactionCategory::Income => magnitude,
                TransactionCategory::Expense => -magnitude,
            };

            TransactionRecord {
                id: String::new(),
                date: first + Duration::days(rng.gen_range(0..days) as i64),
                description: vocabulary[rng.gen_range(0..vocabulary.len())].to_string(),
                category,
                amount,
                status: STATUSES[rng.gen_range(0..STATUSES.len())],
            }
        })
        .collect();

    drawn.sort_by_key(|t| t.date);
    let prefix = first.format("%Y%m").to_string();
    for (i, tx) in drawn.iter_mut().enumerate() {
        tx.id = format!("TX-{prefix}-{:03}", i + 1);
    }

    Ok(drawn)
}

/// Transactions of one month plus display totals.
pub fn drilldown_month<R: Rng + ?Sized>(
    month: &MonthlyForecastPoint,
    config: &DrilldownConfig,
    rng: &mut R,
) -> ForecastResult<MonthDrilldown> {
    let transactions = generate_transactions(month, config, rng)?;
    let (first, days) = month_bounds(&month.month)?;

    let total_income = category_total(&transactions, TransactionCategory::Income)?;
    let total_expense = category_total(&transactions, TransactionCategory::Expense)?;

    debug!(
        "drilldown {}: {} transactions, income={total_income} expense={total_expense}",
        month.month,
        transactions.len()
    );

    Ok(MonthDrilldown {
        month: month.month.clone(),
        period_start: first,
        period_end: first + Duration::days(days as i64 - 1),
        transaction_count: transactions.len(),
        transactions,
        total_income,
        total_expense,
        net: total_income - total_expense,
    })
}

/// One drilldown per month of `monthly`.
pub fn drilldown_series<R: Rng + ?Sized>(
    monthly: &[MonthlyForecastPoint],
    config: &DrilldownConfig,
    rng: &mut R,
) -> ForecastResult<ComputationOutput<Vec<MonthDrilldown>>> {
    let start = Instant::now();

    require_non_empty(monthly, "monthly drilldown")?;
    validate_monthly_series(monthly)?;

    let months = monthly
        .iter()
        .map(|m| drilldown_month(m, config, rng))
        .collect::<ForecastResult<Vec<_>>>()?;

    let warnings = vec![
        "Drilldown transactions are illustrative and do not reconcile to monthly totals."
            .to_string(),
    ];

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Synthesized monthly drilldown (uniform count, 5-20% of monthly total per transaction)",
        config,
        warnings,
        elapsed,
        months,
    ))
}

fn category_total(
    transactions: &[TransactionRecord],
    category: TransactionCategory,
) -> ForecastResult<Money> {
    transactions
        .iter()
        .filter(|t| t.category == category)
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount.abs()))
        .ok_or_else(|| ForecastError::overflow("drilldown totals"))
}

/// [`drilldown_series`] with a seeded or entropy RNG.
pub fn drilldown_series_seeded(
    monthly: &[MonthlyForecastPoint],
    config: &DrilldownConfig,
    seed: Option<u64>,
) -> ForecastResult<ComputationOutput<Vec<MonthDrilldown>>> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    drilldown_series(monthly, config, &mut rng)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
