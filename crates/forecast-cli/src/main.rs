mod commands;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use forecast_core::EngineConfig;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::comparison::CompareArgs;
use commands::dashboard::DashboardArgs;
use commands::drilldown::DrilldownArgs;
use commands::kpi::KpiArgs;
use commands::risk::RiskArgs;

/// Cash-flow forecast analytics
#[derive(Parser)]
#[command(
    name = "fae",
    version,
    about = "Cash-flow forecast analytics",
    long_about = "A CLI for deriving cash KPIs, liquidity risk flags, period-over-period \
                  comparisons and monthly drilldowns from daily and monthly forecast series \
                  with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Seed for simulated comparison baselines and drilldown transactions
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log engine diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive balance, burn rate, runway and cash conversion cycle KPIs
    Kpis(KpiArgs),
    /// Flag liquidity risk dates against the minimum safe balance
    Risk(RiskArgs),
    /// Build a period-over-period comparison dataset
    Compare(CompareArgs),
    /// Expand monthly summaries into illustrative transactions
    Drilldown(DrilldownArgs),
    /// Compute every dashboard dataset in one pass
    Dashboard(DashboardArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Version => {
            println!("fae {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        command => settings::load_engine_config(cli.config.as_deref(), cli.seed)
            .and_then(|config| dispatch(command, &config)),
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn dispatch(
    command: Commands,
    config: &EngineConfig,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Kpis(args) => commands::kpi::run_kpis(args, config),
        Commands::Risk(args) => commands::risk::run_risk(args, config),
        Commands::Compare(args) => commands::comparison::run_compare(args, config),
        Commands::Drilldown(args) => commands::drilldown::run_drilldown(args, config),
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args, config),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
