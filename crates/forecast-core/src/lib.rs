pub mod config;
pub mod error;
pub mod series;
pub mod types;

#[cfg(feature = "kpi")]
pub mod kpi;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "drilldown")]
pub mod drilldown;

#[cfg(all(
    feature = "kpi",
    feature = "risk",
    feature = "comparison",
    feature = "drilldown"
))]
pub mod dashboard;

pub use config::EngineConfig;
pub use error::ForecastError;
pub use types::*;

/// Standard result type for all forecast engine operations
pub type ForecastResult<T> = Result<T, ForecastError>;
