use clap::Args;
use serde_json::Value;
use tracing::info;

use forecast_core::dashboard::{self, DashboardInput};
use forecast_core::EngineConfig;

use crate::input;

/// Arguments for the full dashboard computation
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to JSON input file ({historical?, daily, monthly, dso, dpo, comparison?})
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_dashboard(
    args: DashboardArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dashboard_input: DashboardInput = input::load(args.input.as_deref(), "dashboard")?;
    let result = dashboard::build_dashboard_seeded(&dashboard_input, config)?;
    info!(
        warnings = result.warnings.len(),
        micros = result.metadata.computation_time_us,
        "dashboard computed"
    );
    Ok(serde_json::to_value(result)?)
}
