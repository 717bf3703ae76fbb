use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use forecast_core::config::ZeroBurnPolicy;
use forecast_core::kpi::metrics::{self, KpiInput};
use forecast_core::EngineConfig;

use crate::input;

/// Arguments for KPI derivation
#[derive(Args)]
pub struct KpiArgs {
    /// Path to JSON input file ({daily, monthly, dso, dpo})
    #[arg(long)]
    pub input: Option<String>,

    /// Override the days sales outstanding from the input
    #[arg(long)]
    pub dso: Option<Decimal>,

    /// Override the days payable outstanding from the input
    #[arg(long)]
    pub dpo: Option<Decimal>,

    /// Report an unbounded runway instead of failing when burn is zero
    #[arg(long)]
    pub allow_zero_burn: bool,
}

pub fn run_kpis(args: KpiArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut kpi_input: KpiInput = input::load(args.input.as_deref(), "KPI derivation")?;
    if let Some(dso) = args.dso {
        kpi_input.dso = dso;
    }
    if let Some(dpo) = args.dpo {
        kpi_input.dpo = dpo;
    }

    let mut kpi_config = config.kpi.clone();
    if args.allow_zero_burn {
        kpi_config.zero_burn_policy = ZeroBurnPolicy::Unbounded;
    }

    debug!(
        daily = kpi_input.daily.len(),
        monthly = kpi_input.monthly.len(),
        "deriving kpis"
    );
    let result = metrics::derive_kpis(&kpi_input, &kpi_config)?;
    Ok(serde_json::to_value(result)?)
}
