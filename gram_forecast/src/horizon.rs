//! Forecast horizons and their display-window parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// The three recognized forecast horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    /// One week ahead, three months of history displayed
    Short,
    /// One month ahead, one year of history displayed
    Medium,
    /// One year ahead, three years of history displayed
    Long,
}

/// Display window and step count resolved from a [`Horizon`].
///
/// `history_window_days` only clamps what the chart shows; the model is
/// always fitted on the full series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonProfile {
    /// Days of history shown on the chart
    pub history_window_days: i64,
    /// Number of future daily steps to forecast
    pub forecast_steps: usize,
}

impl Horizon {
    /// All recognized horizons, shortest first
    pub fn all() -> [Horizon; 3] {
        [Horizon::Short, Horizon::Medium, Horizon::Long]
    }

    /// Resolve a caller-supplied label. Anything outside the three
    /// recognized labels is an error, never a silent default.
    pub fn from_label(label: &str) -> Result<Horizon> {
        let trimmed = label.trim();
        Horizon::all()
            .into_iter()
            .find(|h| trimmed.eq_ignore_ascii_case(h.label()))
            .ok_or_else(|| ForecastError::UnknownHorizon(label.to_string()))
    }

    /// Canonical lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Short => "short",
            Horizon::Medium => "medium",
            Horizon::Long => "long",
        }
    }

    /// Window parameters for this horizon
    pub fn profile(&self) -> HorizonProfile {
        match self {
            Horizon::Short => HorizonProfile {
                history_window_days: 90,
                forecast_steps: 7,
            },
            Horizon::Medium => HorizonProfile {
                history_window_days: 365,
                forecast_steps: 30,
            },
            Horizon::Long => HorizonProfile {
                history_window_days: 1095,
                forecast_steps: 365,
            },
        }
    }
}
