//! # Gram Forecast
//!
//! Seasonal ARIMA forecasting for normalized gram-price series, with chart
//! payloads rendered for a thin presentation layer.
//!
//! ## Features
//!
//! - Fixed-order SARIMA (1,1,1)x(1,1,1,7) fitted on the full history
//! - Three horizon profiles: short, medium, and long
//! - Eagerly built, read-only series cache with per-commodity isolation
//! - Bounded fit-and-render worker pool with load shedding
//! - PNG chart payloads encoded as base64 for inline embedding
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use gram_forecast::models::sarima::SarimaModel;
//! use gram_forecast::models::{ForecastModel, TrainedForecastModel};
//! use gram_price::{NormalizedPoint, NormalizedSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let points = (0..60)
//!     .map(|i| NormalizedPoint {
//!         date: start + Duration::days(i),
//!         gram_price: 2000.0 + i as f64,
//!     })
//!     .collect();
//! let series = NormalizedSeries::new(points);
//!
//! let trained = SarimaModel::gram_price_default().fit(&series).unwrap();
//! let forecast = trained.forecast(7).unwrap();
//!
//! assert_eq!(forecast.len(), 7);
//! assert_eq!(forecast.dates()[0], start + Duration::days(60));
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod horizon;
pub mod models;
pub mod service;

pub use crate::config::Commodity;
pub use crate::error::{ForecastError, Result};
pub use crate::horizon::{Horizon, HorizonProfile};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::service::{ForecastPayload, ForecastService, SeriesCache};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
