use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Empty series: {context} requires at least one point")]
    EmptySeries { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ForecastError {
    pub(crate) fn overflow(context: &str) -> Self {
        ForecastError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::SerializationError(e.to_string())
    }
}
