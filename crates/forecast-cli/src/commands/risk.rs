use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use forecast_core::risk::classifier;
use forecast_core::{DailyForecastPoint, EngineConfig};

use crate::input;

/// Arguments for liquidity risk classification
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON input file (array of daily points)
    #[arg(long)]
    pub input: Option<String>,

    /// Classify against this fixed minimum safe balance instead of deriving it
    #[arg(long)]
    pub min_safe_balance: Option<Decimal>,

    /// Only print the flagged dates
    #[arg(long)]
    pub dates_only: bool,
}

pub fn run_risk(args: RiskArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let series: Vec<DailyForecastPoint> =
        input::load(args.input.as_deref(), "liquidity risk classification")?;

    let result = match args.min_safe_balance {
        Some(floor) => {
            debug!(%floor, "classifying against fixed safe balance");
            classifier::classify_against_threshold(&series, floor, &config.risk)?
        }
        None => classifier::classify_liquidity_risk(&series, &config.risk)?,
    };

    if args.dates_only {
        return Ok(serde_json::to_value(&result.result.risk_dates)?);
    }
    Ok(serde_json::to_value(result)?)
}
