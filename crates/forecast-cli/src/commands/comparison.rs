use clap::{Args, ValueEnum};
use serde_json::Value;
use tracing::debug;

use forecast_core::comparison::baseline::HistoricalBaseline;
use forecast_core::comparison::synthesizer::{self, ComparisonInput, Granularity};
use forecast_core::{DailyForecastPoint, EngineConfig};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Month,
    Quarter,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Quarter => Granularity::Quarter,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

/// Arguments for period-over-period comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file ({series, granularity, primary_key, secondary_key?})
    #[arg(long)]
    pub input: Option<String>,

    /// Override the comparison granularity from the input
    #[arg(long)]
    pub granularity: Option<GranularityArg>,

    /// JSON file of observed daily history; replaces the simulated baseline
    #[arg(long)]
    pub history: Option<String>,
}

pub fn run_compare(
    args: CompareArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison_input: ComparisonInput =
        input::load(args.input.as_deref(), "period comparison")?;
    if let Some(granularity) = args.granularity {
        comparison_input.granularity = granularity.into();
    }

    let result = match args.history {
        Some(ref path) => {
            let history: Vec<DailyForecastPoint> = input::file::read_json(path)?;
            debug!(points = history.len(), "comparing against observed history");
            let mut source = HistoricalBaseline::new(&history);
            synthesizer::analyze_period_comparison(
                &comparison_input,
                &config.comparison,
                &mut source,
            )?
        }
        None => synthesizer::analyze_simulated_comparison(
            &comparison_input,
            &config.comparison,
            config.seed,
        )?,
    };
    Ok(serde_json::to_value(result)?)
}
