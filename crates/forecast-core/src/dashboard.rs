//! One-shot computation of every dashboard dataset.
//!
//! Runs the KPI deriver, the liquidity risk classifier, the period comparison
//! and the monthly drilldown independently over one forecast payload. None of
//! them reads another's output.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::comparison::baseline::{HistoricalBaseline, SimulatedBaseline};
use crate::comparison::synthesizer::{
    analyze_period_comparison, ComparisonInput, Granularity, PeriodComparison, ValueKey,
};
use crate::config::EngineConfig;
use crate::drilldown::transactions::{drilldown_series, MonthDrilldown};
use crate::kpi::metrics::{derive_kpis, KpiInput, KpiSet};
use crate::risk::classifier::{classify_liquidity_risk, RiskAnnotatedSeries};
use crate::series::{merge_timeline, TimelinePoint};
use crate::types::{with_metadata, ComputationOutput, DailyForecastPoint, MonthlyForecastPoint};
use crate::ForecastResult;

/// Where previous-period comparison values come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    #[default]
    Simulated,
    Historical,
}

/// Comparison view requested by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub granularity: Granularity,
    pub primary_key: ValueKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<ValueKey>,
    #[serde(default)]
    pub baseline: BaselineKind,
}

/// Payload from the historical-data and forecast providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(default)]
    pub historical: Vec<DailyForecastPoint>,
    pub daily: Vec<DailyForecastPoint>,
    pub monthly: Vec<MonthlyForecastPoint>,
    pub dso: Decimal,
    pub dpo: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonRequest>,
}

/// Every derived dataset the dashboard renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub kpis: KpiSet,
    pub risk: RiskAnnotatedSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<PeriodComparison>,
    pub drilldown: Vec<MonthDrilldown>,
    pub timeline: Vec<TimelinePoint>,
}

/// Compute all dashboard datasets with randomness drawn from `rng`.
pub fn build_dashboard<R: Rng + ?Sized>(
    input: &DashboardInput,
    config: &EngineConfig,
    rng: &mut R,
) -> ForecastResult<ComputationOutput<Dashboard>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;

    let kpis = derive_kpis(
        &KpiInput {
            daily: input.daily.clone(),
            monthly: input.monthly.clone(),
            dso: input.dso,
            dpo: input.dpo,
        },
        &config.kpi,
    )?;
    collect_warnings(&mut warnings, "kpi", kpis.warnings);

    let risk = classify_liquidity_risk(&input.daily, &config.risk)?;
    collect_warnings(&mut warnings, "risk", risk.warnings);

    let comparison = match &input.comparison {
        Some(request) => {
            let comparison_input = ComparisonInput {
                series: input.daily.clone(),
                granularity: request.granularity,
                primary_key: request.primary_key,
                secondary_key: request.secondary_key,
            };
            let out = match request.baseline {
                BaselineKind::Simulated => {
                    let mut source = SimulatedBaseline::new(&mut *rng, &config.comparison)?;
                    analyze_period_comparison(&comparison_input, &config.comparison, &mut source)?
                }
                BaselineKind::Historical => {
                    let mut source = HistoricalBaseline::new(&input.historical);
                    analyze_period_comparison(&comparison_input, &config.comparison, &mut source)?
                }
            };
            collect_warnings(&mut warnings, "comparison", out.warnings);
            Some(out.result)
        }
        None => None,
    };

    let drilldown = drilldown_series(&input.monthly, &config.drilldown, rng)?;
    collect_warnings(&mut warnings, "drilldown", drilldown.warnings);

    let timeline = merge_timeline(&input.historical, &input.daily)?;

    info!(
        "dashboard built: {} daily points, {} months, {} risk dates",
        input.daily.len(),
        input.monthly.len(),
        risk.result.risk_count
    );

    let dashboard = Dashboard {
        kpis: kpis.result,
        risk: risk.result,
        comparison,
        drilldown: drilldown.result,
        timeline,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash-flow dashboard: KPIs, liquidity risk, period comparison, monthly drilldown",
        config,
        warnings,
        elapsed,
        dashboard,
    ))
}

/// [`build_dashboard`] seeded from `config.seed`, or OS entropy when unset.
pub fn build_dashboard_seeded(
    input: &DashboardInput,
    config: &EngineConfig,
) -> ForecastResult<ComputationOutput<Dashboard>> {
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    build_dashboard(input, config, &mut rng)
}

fn collect_warnings(into: &mut Vec<String>, section: &str, from: Vec<String>) {
    into.extend(from.into_iter().map(|w| format!("[{section}] {w}")));
}
