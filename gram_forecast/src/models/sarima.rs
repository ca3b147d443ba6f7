//! Seasonal ARIMA with a fixed order, fitted by conditional least squares.
//!
//! The model family is the multiplicative (1,1,1)x(1,1,1,s) form: one
//! regular and one seasonal difference, then a first-order AR and MA term at
//! both the regular and seasonal lag. Coefficients are estimated by
//! minimizing the conditional sum of squared one-step residuals with a
//! Nelder-Mead search.

use chrono::{Duration, NaiveDate};
use gram_price::NormalizedSeries;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};

/// A full (p,d,q)x(P,D,Q,s) model order.
///
/// The order in service is a fixed design parameter, not tuned per request.
/// Changing it is a configuration change and must go through a new named
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    /// Seasonal period in observations
    pub season: usize,
}

/// Order used for gram-price forecasting: (1,1,1)x(1,1,1,7)
pub const GRAM_PRICE_V1: SarimaOrder = SarimaOrder {
    p: 1,
    d: 1,
    q: 1,
    seasonal_p: 1,
    seasonal_d: 1,
    seasonal_q: 1,
    season: 7,
};

impl SarimaOrder {
    /// Minimum observations required before a fit is attempted: two full
    /// seasonal cycles.
    pub fn min_observations(&self) -> usize {
        2 * self.season
    }
}

/// Coefficients are kept strictly inside the unit box
const PARAM_BOUND: f64 = 0.99;

/// Fitted SARIMA coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarimaParams {
    /// Non-seasonal AR coefficient
    pub phi: f64,
    /// Non-seasonal MA coefficient
    pub theta: f64,
    /// Seasonal AR coefficient
    pub seasonal_phi: f64,
    /// Seasonal MA coefficient
    pub seasonal_theta: f64,
}

/// SARIMA model configuration, ready to fit
#[derive(Debug, Clone)]
pub struct SarimaModel {
    name: String,
    order: SarimaOrder,
}

impl SarimaModel {
    /// Create a model with the given order.
    ///
    /// Only the first-order multiplicative family (1,1,1)x(1,1,1,s) is
    /// supported; other orders are rejected up front.
    pub fn new(order: SarimaOrder) -> Result<Self> {
        let first_order = order.p == 1
            && order.d == 1
            && order.q == 1
            && order.seasonal_p == 1
            && order.seasonal_d == 1
            && order.seasonal_q == 1;
        if !first_order {
            return Err(ForecastError::InvalidParameter(format!(
                "unsupported order ({},{},{})x({},{},{},{})",
                order.p,
                order.d,
                order.q,
                order.seasonal_p,
                order.seasonal_d,
                order.seasonal_q,
                order.season
            )));
        }
        if order.season < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period {} is too short",
                order.season
            )));
        }
        Ok(Self {
            name: format!("SARIMA(1,1,1)(1,1,1,{})", order.season),
            order,
        })
    }

    /// Model with the order used for gram prices ([`GRAM_PRICE_V1`])
    pub fn gram_price_default() -> Self {
        Self {
            name: format!("SARIMA(1,1,1)(1,1,1,{})", GRAM_PRICE_V1.season),
            order: GRAM_PRICE_V1,
        }
    }

    /// Model order
    pub fn order(&self) -> SarimaOrder {
        self.order
    }
}

impl ForecastModel for SarimaModel {
    type Trained = TrainedSarimaModel;

    fn fit(&self, series: &NormalizedSeries) -> Result<TrainedSarimaModel> {
        let prices = series.prices();
        let required = self.order.min_observations();
        if prices.len() < required {
            return Err(ForecastError::InsufficientHistory {
                required,
                actual: prices.len(),
            });
        }
        let last_date = series
            .last_date()
            .ok_or_else(|| ForecastError::InsufficientHistory {
                required,
                actual: 0,
            })?;

        let season = self.order.season;
        let diffed = double_difference(&prices, season);

        let objective = |params: &[f64]| css_objective(&diffed, season, params);
        let start = [0.1, 0.1, 0.1, 0.1];
        let best = nelder_mead(&objective, &start, 500, 1e-8);

        let Some((point, css)) = best else {
            return Err(ForecastError::FitFailed(
                "no finite objective anywhere the search looked".to_string(),
            ));
        };
        if !css.is_finite() {
            return Err(ForecastError::FitFailed(
                "conditional sum of squares diverged".to_string(),
            ));
        }

        let params = SarimaParams {
            phi: point[0],
            theta: point[1],
            seasonal_phi: point[2],
            seasonal_theta: point[3],
        };
        let residuals = one_step_residuals(&diffed, season, &params);
        if residuals.iter().any(|e| !e.is_finite()) {
            return Err(ForecastError::FitFailed(
                "non-finite residuals at the fitted parameters".to_string(),
            ));
        }
        let sigma2 = if residuals.is_empty() {
            0.0
        } else {
            residuals.iter().map(|e| e * e).sum::<f64>() / residuals.len() as f64
        };

        let tail = prices[prices.len() - (season + 1)..].to_vec();

        Ok(TrainedSarimaModel {
            name: self.name.clone(),
            order: self.order,
            params,
            diffed,
            residuals,
            sigma2,
            tail,
            last_date,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fitted SARIMA model holding coefficients and the state needed to forecast
#[derive(Debug, Clone)]
pub struct TrainedSarimaModel {
    name: String,
    order: SarimaOrder,
    params: SarimaParams,
    /// Doubly differenced training series
    diffed: Vec<f64>,
    /// One-step residuals under the fitted coefficients
    residuals: Vec<f64>,
    /// Residual variance estimate
    sigma2: f64,
    /// Trailing original observations needed to undo the differencing
    tail: Vec<f64>,
    /// Date of the last training observation
    last_date: NaiveDate,
}

impl TrainedSarimaModel {
    /// Fitted coefficients
    pub fn params(&self) -> SarimaParams {
        self.params
    }

    /// Residual variance estimate
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Model order
    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// Date of the last training observation
    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Point forecast plus symmetric normal-quantile intervals scaled by the
    /// residual standard deviation and the step distance.
    pub fn forecast_with_intervals(
        &self,
        steps: usize,
        confidence: f64,
    ) -> Result<ForecastResult> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level {} outside (0, 1)",
                confidence
            )));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + confidence / 2.0);
        let sigma = self.sigma2.sqrt();

        let point = self.forecast(steps)?;
        let intervals = point
            .values()
            .iter()
            .enumerate()
            .map(|(h, v)| {
                let margin = z * sigma * ((h + 1) as f64).sqrt();
                (v - margin, v + margin)
            })
            .collect();

        ForecastResult::with_intervals(point.dates().to_vec(), point.values().to_vec(), intervals)
    }
}

impl TrainedForecastModel for TrainedSarimaModel {
    fn forecast(&self, steps: usize) -> Result<ForecastResult> {
        if steps == 0 {
            return ForecastResult::new(Vec::new(), Vec::new());
        }

        let season = self.order.season;
        let lag = season + 1;
        let SarimaParams {
            phi,
            theta,
            seasonal_phi,
            seasonal_theta,
        } = self.params;

        // Extend the differenced series with its own forecasts; future
        // shocks are zero.
        let mut w = self.diffed.clone();
        let mut e = self.residuals.clone();
        let m = w.len();

        for h in 0..steps {
            let t = m + h;
            let w_at = |k: usize, w: &[f64]| if t >= k { w[t - k] } else { 0.0 };
            let e_at = |k: usize, e: &[f64]| if t >= k { e[t - k] } else { 0.0 };

            let next = phi * w_at(1, &w) + seasonal_phi * w_at(season, &w)
                - phi * seasonal_phi * w_at(lag, &w)
                + theta * e_at(1, &e)
                + seasonal_theta * e_at(season, &e)
                + theta * seasonal_theta * e_at(lag, &e);

            w.push(next);
            e.push(0.0);
        }

        // Undo both differences over a growing tail of original values:
        // y_t = w_t + y_{t-1} + y_{t-s} - y_{t-s-1}.
        let mut history = self.tail.clone();
        let mut dates = Vec::with_capacity(steps);
        let mut values = Vec::with_capacity(steps);

        for h in 0..steps {
            let len = history.len();
            let next = w[m + h] + history[len - 1] + history[len - season] - history[len - lag];
            if !next.is_finite() {
                return Err(ForecastError::FitFailed(
                    "forecast recursion diverged".to_string(),
                ));
            }
            history.push(next);
            values.push(next);
            dates.push(self.last_date + Duration::days((h + 1) as i64));
        }

        ForecastResult::new(dates, values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Apply one regular and one seasonal difference: w_t = (1-B)(1-B^s) y_t
fn double_difference(values: &[f64], season: usize) -> Vec<f64> {
    let lag = season + 1;
    (lag..values.len())
        .map(|t| values[t] - values[t - 1] - values[t - season] + values[t - lag])
        .collect()
}

/// One-step residuals of the ARMA recursion on the differenced series.
/// Pre-sample values and shocks are taken as zero (conditional estimation).
fn one_step_residuals(diffed: &[f64], season: usize, params: &SarimaParams) -> Vec<f64> {
    let SarimaParams {
        phi,
        theta,
        seasonal_phi,
        seasonal_theta,
    } = *params;
    let lag = season + 1;
    let mut errors: Vec<f64> = Vec::with_capacity(diffed.len());

    for t in 0..diffed.len() {
        let w_at = |k: usize| if t >= k { diffed[t - k] } else { 0.0 };
        let e_at = |k: usize, errors: &[f64]| if t >= k { errors[t - k] } else { 0.0 };

        let predicted = phi * w_at(1) + seasonal_phi * w_at(season)
            - phi * seasonal_phi * w_at(lag)
            + theta * e_at(1, &errors)
            + seasonal_theta * e_at(season, &errors)
            + theta * seasonal_theta * e_at(lag, &errors);

        errors.push(diffed[t] - predicted);
    }

    errors
}

/// Conditional sum of squares at one parameter point. Points outside the
/// coefficient box, or points where the recursion degenerates, score
/// positive infinity so the search routes around them.
fn css_objective(diffed: &[f64], season: usize, params: &[f64]) -> f64 {
    if params.iter().any(|p| !p.is_finite() || p.abs() >= PARAM_BOUND) {
        return f64::INFINITY;
    }
    let params = SarimaParams {
        phi: params[0],
        theta: params[1],
        seasonal_phi: params[2],
        seasonal_theta: params[3],
    };
    let sse: f64 = one_step_residuals(diffed, season, &params)
        .iter()
        .map(|e| e * e)
        .sum();
    if sse.is_finite() {
        sse
    } else {
        f64::INFINITY
    }
}

/// Derivative-free Nelder-Mead minimization.
///
/// Returns the best vertex and its objective value, or `None` when the
/// objective is non-finite everywhere the search looked.
fn nelder_mead<F>(
    objective: &F,
    start: &[f64],
    max_iterations: usize,
    tolerance: f64,
) -> Option<(Vec<f64>, f64)>
where
    F: Fn(&[f64]) -> f64,
{
    const REFLECTION: f64 = 1.0;
    const EXPANSION: f64 = 2.0;
    const CONTRACTION: f64 = 0.5;
    const SHRINK: f64 = 0.5;
    const INITIAL_STEP: f64 = 0.25;

    let n = start.len();
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.to_vec(), objective(start)));
    for i in 0..n {
        let mut vertex = start.to_vec();
        vertex[i] += INITIAL_STEP;
        let value = objective(&vertex);
        simplex.push((vertex, value));
    }

    for _ in 0..max_iterations {
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = simplex[0].1;
        let worst = simplex[n].1;
        if best.is_finite() && (worst - best).abs() < tolerance {
            break;
        }

        // Centroid of every vertex except the worst
        let mut centroid = vec![0.0; n];
        for (vertex, _) in &simplex[..n] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / n as f64;
            }
        }

        let worst_vertex = simplex[n].0.clone();
        let reflected: Vec<f64> = centroid
            .iter()
            .zip(&worst_vertex)
            .map(|(c, w)| c + REFLECTION * (c - w))
            .collect();
        let reflected_value = objective(&reflected);

        if reflected_value < simplex[0].1 {
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(&worst_vertex)
                .map(|(c, w)| c + EXPANSION * (c - w))
                .collect();
            let expanded_value = objective(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
        } else if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
        } else {
            let contracted: Vec<f64> = centroid
                .iter()
                .zip(&worst_vertex)
                .map(|(c, w)| c + CONTRACTION * (w - c))
                .collect();
            let contracted_value = objective(&contracted);
            if contracted_value < simplex[n].1 {
                simplex[n] = (contracted, contracted_value);
            } else {
                // Shrink every vertex toward the best
                let best_vertex = simplex[0].0.clone();
                for (vertex, value) in simplex.iter_mut().skip(1) {
                    for (v, b) in vertex.iter_mut().zip(&best_vertex) {
                        *v = b + SHRINK * (*v - b);
                    }
                    *value = objective(vertex);
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (point, value) = simplex.swap_remove(0);
    value.is_finite().then_some((point, value))
}
