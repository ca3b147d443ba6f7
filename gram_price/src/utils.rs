//! Synthetic close-series generation for demos and tests.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::RawPricePoint;

/// Generate a random-walk daily close series.
///
/// # Arguments
///
/// * `days` - Number of consecutive daily points
/// * `start_date` - Date of the first point
/// * `start_price` - Close of the first point
/// * `daily_volatility` - Relative standard deviation of day-over-day moves
pub fn generate_close_series(
    days: usize,
    start_date: NaiveDate,
    start_price: f64,
    daily_volatility: f64,
) -> Vec<RawPricePoint> {
    let mut rng = rand::thread_rng();
    walk(&mut rng, days, start_date, start_price, daily_volatility)
}

/// Deterministic variant of [`generate_close_series`] for reproducible runs.
pub fn generate_close_series_seeded(
    seed: u64,
    days: usize,
    start_date: NaiveDate,
    start_price: f64,
    daily_volatility: f64,
) -> Vec<RawPricePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    walk(&mut rng, days, start_date, start_price, daily_volatility)
}

fn walk<R: Rng>(
    rng: &mut R,
    days: usize,
    start_date: NaiveDate,
    start_price: f64,
    daily_volatility: f64,
) -> Vec<RawPricePoint> {
    let moves = Normal::new(0.0, daily_volatility.max(0.0)).unwrap();

    let mut points = Vec::with_capacity(days);
    let mut price = start_price;

    for i in 0..days {
        let date = start_date.checked_add_days(Days::new(i as u64)).unwrap();
        points.push(RawPricePoint { date, close: price });

        let step: f64 = moves.sample(rng);
        price = (price * (1.0 + step)).max(0.01);
    }

    points
}
