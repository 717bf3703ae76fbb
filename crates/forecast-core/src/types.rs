use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Multipliers and rates expressed as decimals (0.8 = 80%). Never as percentages.
pub type Rate = Decimal;

/// Percentages expressed on a 0-100 scale (12.5 = 12.5%).
pub type Percent = Decimal;

/// Day counts (runway, DSO, DPO, cash conversion cycle).
pub type Days = Decimal;

/// A single day of a historical or forecast cash position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastPoint {
    pub date: NaiveDate,
    /// Closing cash balance for the day. May be negative.
    pub balance: Money,
    pub inflows: Money,
    pub outflows: Money,
    /// Forecast confidence, integer percent 0-100.
    #[serde(default = "default_confidence")]
    pub confidence: u8,
}

/// A single month of a forecast, labelled e.g. "2024-03".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecastPoint {
    pub month: String,
    pub inflows: Money,
    pub outflows: Money,
    pub balance: Money,
    #[serde(default = "default_confidence")]
    pub confidence: u8,
}

fn default_confidence() -> u8 {
    100
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
