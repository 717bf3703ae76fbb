use napi::Result as NapiResult;
use napi_derive::napi;

use forecast_core::comparison::synthesizer::{self, ComparisonInput};
use forecast_core::dashboard::{self, DashboardInput};
use forecast_core::drilldown::transactions;
use forecast_core::kpi::metrics::{self, KpiInput};
use forecast_core::risk::classifier;
use forecast_core::{DailyForecastPoint, EngineConfig, MonthlyForecastPoint};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional engine configuration; absent means defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    let config = match config_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str::<EngineConfig>(&json).map_err(to_napi_error)?
        }
        _ => EngineConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_kpis(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: KpiInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = metrics::derive_kpis(&input, &config.kpi).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Liquidity risk
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct RiskBindingInput {
    series: Vec<DailyForecastPoint>,
    #[serde(default)]
    min_safe_balance: Option<rust_decimal::Decimal>,
}

#[napi]
pub fn classify_liquidity_risk(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: RiskBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = match input.min_safe_balance {
        Some(floor) => classifier::classify_against_threshold(&input.series, floor, &config.risk),
        None => classifier::classify_liquidity_risk(&input.series, &config.risk),
    }
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Period comparison
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ComparisonBindingInput {
    #[serde(flatten)]
    input: ComparisonInput,
    /// Observed history; when present it replaces the simulated baseline.
    #[serde(default)]
    history: Option<Vec<DailyForecastPoint>>,
}

#[napi]
pub fn compare_periods(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let binding_input: ComparisonBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = match binding_input.history {
        Some(history) => {
            let mut source =
                forecast_core::comparison::baseline::HistoricalBaseline::new(&history);
            synthesizer::analyze_period_comparison(
                &binding_input.input,
                &config.comparison,
                &mut source,
            )
        }
        None => synthesizer::analyze_simulated_comparison(
            &binding_input.input,
            &config.comparison,
            config.seed,
        ),
    }
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Drilldown
// ---------------------------------------------------------------------------

#[napi]
pub fn drilldown_month(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let month: MonthlyForecastPoint = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = transactions::drilldown_series_seeded(
        std::slice::from_ref(&month),
        &config.drilldown,
        config.seed,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn drilldown_series(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let monthly: Vec<MonthlyForecastPoint> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = transactions::drilldown_series_seeded(&monthly, &config.drilldown, config.seed)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[napi]
pub fn build_dashboard(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input: DashboardInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dashboard::build_dashboard_seeded(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
