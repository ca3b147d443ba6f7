//! Forecasting models for normalized gram-price series

use std::fmt::Debug;

use chrono::NaiveDate;
use gram_price::NormalizedSeries;
use serde::Serialize;

use crate::error::{ForecastError, Result};

pub mod sarima;

/// Forecast result: one predicted gram price per future calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Contiguous daily dates after the last observation
    dates: Vec<NaiveDate>,
    /// Predicted gram prices, parallel to `dates`
    values: Vec<f64>,
    /// Symmetric confidence intervals, when requested
    intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast dates ({}) and values ({}) must have the same length",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self {
            dates,
            values,
            intervals: None,
        })
    }

    /// Create a forecast result carrying confidence intervals
    pub fn with_intervals(
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if intervals.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "intervals ({}) and values ({}) must have the same length",
                intervals.len(),
                values.len()
            )));
        }
        let mut result = Self::new(dates, values)?;
        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Forecast dates in step order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Forecast values in step order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Confidence intervals, if any
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast holds no steps
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(date, value)` pairs in step order
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + Clone + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// A fitted model ready to produce forecasts
pub trait TrainedForecastModel: Debug {
    /// Point forecast for the given number of future daily steps
    fn forecast(&self, steps: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A forecast model that can be fitted to a normalized series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model against the full series
    fn fit(&self, series: &NormalizedSeries) -> Result<Self::Trained>;

    /// Name of the model
    fn name(&self) -> &str;
}
