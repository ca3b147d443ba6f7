//! Error types for the gram_forecast crate

use thiserror::Error;

/// Custom error types for forecasting and rendering operations
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The requested commodity is not in the tracked catalog
    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),

    /// The requested horizon label is not one of short/medium/long
    #[error("Unknown horizon: {0}")]
    UnknownHorizon(String),

    /// The commodity is tracked but its series could not be built
    #[error("No series available for commodity: {0}")]
    Unavailable(String),

    /// The series is too short for the seasonal model
    #[error("Insufficient history: need at least {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Model estimation failed to produce usable coefficients
    #[error("Model fit failed: {0}")]
    FitFailed(String),

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Chart rendering or encoding failed
    #[error("Chart error: {0}")]
    Chart(String),

    /// Error from the underlying price-series layer
    #[error("Data error: {0}")]
    Data(#[from] gram_price::NormalizeError),

    /// Payload serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The render queue is full and the caller should shed load
    #[error("Render pool saturated, try again later")]
    Saturated,

    /// A render worker went away before replying
    #[error("Render worker unavailable: {0}")]
    Worker(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
