//! Sources for previous-period comparison values.
//!
//! The dashboard has no real prior-period feed yet, so the default source
//! *simulates* one: each previous value is the current value scaled by a
//! random factor. Output is non-deterministic unless the RNG is seeded. A
//! historical lookup implements the same trait and drops in without any
//! change to the synthesizer or its consumers.

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::comparison::synthesizer::ValueKey;
use crate::config::{to_basis_points, ComparisonConfig, BASIS_POINTS_PER_UNIT};
use crate::types::{DailyForecastPoint, Money};
use crate::{ForecastError, ForecastResult};

/// Supplies the previous-period value for one comparison point.
pub trait BaselineSource {
    /// Value of `key` on `previous_date`, given the current period's value.
    fn previous_value(
        &mut self,
        previous_date: NaiveDate,
        key: ValueKey,
        current: Money,
    ) -> ForecastResult<Money>;

    /// True when values are synthesized rather than observed.
    fn is_simulated(&self) -> bool;
}

/// Simulated prior period: `round(current * factor)`, factor uniform in
/// `[factor_min, factor_max]` on the basis-point grid.
pub struct SimulatedBaseline<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    min_bps: u32,
    max_bps: u32,
}

impl<'a, R: Rng + ?Sized> SimulatedBaseline<'a, R> {
    pub fn new(rng: &'a mut R, config: &ComparisonConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self {
            rng,
            min_bps: to_basis_points("comparison.factor_min", config.factor_min)?,
            max_bps: to_basis_points("comparison.factor_max", config.factor_max)?,
        })
    }

    fn draw_factor(&mut self) -> Decimal {
        Decimal::from(self.rng.gen_range(self.min_bps..=self.max_bps)) / BASIS_POINTS_PER_UNIT
    }
}

impl<R: Rng + ?Sized> BaselineSource for SimulatedBaseline<'_, R> {
    fn previous_value(
        &mut self,
        _previous_date: NaiveDate,
        _key: ValueKey,
        current: Money,
    ) -> ForecastResult<Money> {
        let factor = self.draw_factor();
        current
            .checked_mul(factor)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .ok_or_else(|| ForecastError::overflow("simulated previous-period value"))
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Deterministic lookup into an observed historical daily series.
#[derive(Debug, Clone, Default)]
pub struct HistoricalBaseline {
    by_date: BTreeMap<NaiveDate, DailyForecastPoint>,
}

impl HistoricalBaseline {
    pub fn new(history: &[DailyForecastPoint]) -> Self {
        Self {
            by_date: history.iter().map(|p| (p.date, p.clone())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

impl BaselineSource for HistoricalBaseline {
    fn previous_value(
        &mut self,
        previous_date: NaiveDate,
        key: ValueKey,
        _current: Money,
    ) -> ForecastResult<Money> {
        let point = self.by_date.get(&previous_date).ok_or_else(|| {
            ForecastError::InsufficientData(format!("No historical point for {previous_date}."))
        })?;
        key.extract(point)
    }

    fn is_simulated(&self) -> bool {
        false
    }
}
