use clap::Args;
use serde_json::Value;

use forecast_core::drilldown::transactions;
use forecast_core::{EngineConfig, MonthlyForecastPoint};

use crate::input;

/// Arguments for monthly drilldown
#[derive(Args)]
pub struct DrilldownArgs {
    /// Path to JSON input file (array of monthly points)
    #[arg(long)]
    pub input: Option<String>,

    /// Only expand the month with this label
    #[arg(long)]
    pub month: Option<String>,
}

pub fn run_drilldown(
    args: DrilldownArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut monthly: Vec<MonthlyForecastPoint> =
        input::load(args.input.as_deref(), "monthly drilldown")?;

    if let Some(ref label) = args.month {
        monthly.retain(|m| m.month == *label);
        if monthly.is_empty() {
            return Err(format!("No month labelled '{label}' in the input").into());
        }
    }

    let result =
        transactions::drilldown_series_seeded(&monthly, &config.drilldown, config.seed)?;
    Ok(serde_json::to_value(result)?)
}
