//! # Gram Price
//!
//! `gram_price` turns daily commodity closes quoted in USD per troy ounce
//! into a local-currency price-per-gram series.
//!
//! The pipeline has three stages:
//!
//! - Load `(date, close)` rows from provider CSV exports (or build them in
//!   memory)
//! - Inner-join the commodity series with the exchange-rate series on exact
//!   calendar date, dropping rows without a counterpart
//! - Convert each matched close into a gram price via the troy-ounce factor
//!   and the day's exchange rate
//!
//! ## Usage Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gram_price::{normalize, RawPricePoint};
//!
//! let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let metal = vec![
//!     RawPricePoint::new(day(1), 2020.0),
//!     RawPricePoint::new(day(2), 2034.5),
//! ];
//! let fx = vec![
//!     RawPricePoint::new(day(1), 29.8),
//!     RawPricePoint::new(day(2), 29.9),
//! ];
//!
//! let series = normalize(&metal, &fx).unwrap();
//! assert_eq!(series.len(), 2);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod loader;
pub mod normalize;
pub mod utils;

pub use loader::load_close_series;
pub use normalize::{normalize, GRAMS_PER_TROY_OUNCE};

/// Errors raised while loading or normalizing price series
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The input is missing a column the pipeline needs
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The two series share no dates after cleaning
    #[error("No overlapping dates between commodity and exchange-rate series")]
    NoOverlap,

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for series loading and normalization
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// A single daily close as delivered by the quote provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint {
    /// Trading date of the close
    pub date: NaiveDate,
    /// Closing price in the instrument's native quote currency
    pub close: f64,
}

impl RawPricePoint {
    /// Create a new raw price point
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// One normalized observation: local-currency price per gram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// Trading date shared by both source series
    pub date: NaiveDate,
    /// Local-currency price per gram
    pub gram_price: f64,
}

/// A commodity's gram-price history, strictly increasing by date.
///
/// A series is immutable once built; refreshing data means replacing the
/// whole series, never patching it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    /// Build a series from arbitrary points, sorting by date and keeping the
    /// first point per date.
    pub fn new(mut points: Vec<NormalizedPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// All points in date order
    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    /// Gram prices in date order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.gram_price).collect()
    }

    /// Observation dates in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points on or after `start`, for display windows
    pub fn window_from(&self, start: NaiveDate) -> Vec<NormalizedPoint> {
        self.points
            .iter()
            .copied()
            .filter(|p| p.date >= start)
            .collect()
    }
}
