//! Model-level walkthrough: normalize a synthetic gold series, fit the
//! seasonal model, inspect the forecast, and render the chart.
//!
//! Run with: cargo run --example gold_forecast

use chrono::{Duration, Utc};
use gram_forecast::chart;
use gram_forecast::models::sarima::SarimaModel;
use gram_forecast::models::{ForecastModel, TrainedForecastModel};
use gram_forecast::Horizon;
use gram_price::utils::generate_close_series_seeded;
use gram_price::normalize;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Gold Gram-Price Forecast Example");
    println!("================================\n");

    // Two years of synthetic provider data ending today.
    let days = 730;
    let start_date = Utc::now().date_naive() - Duration::days(days as i64);
    let gold = generate_close_series_seeded(42, days, start_date, 2000.0, 0.01);
    let fx = generate_close_series_seeded(43, days, start_date, 30.0, 0.005);

    let series = normalize(&gold, &fx)?;
    println!("Normalized series: {} points", series.len());
    if let Some(last) = series.points().last() {
        println!("Last observation: {} at {:.2} per gram\n", last.date, last.gram_price);
    }

    // Fit once on the full history, then forecast the short horizon.
    let model = SarimaModel::gram_price_default();
    let trained = model.fit(&series)?;
    println!("Fitted {}", trained.name());
    let params = trained.params();
    println!(
        "Coefficients: phi={:.4} theta={:.4} Phi={:.4} Theta={:.4}",
        params.phi, params.theta, params.seasonal_phi, params.seasonal_theta
    );
    println!("Residual variance: {:.6}\n", trained.sigma2());

    let profile = Horizon::Short.profile();
    let forecast = trained.forecast_with_intervals(profile.forecast_steps, 0.95)?;

    println!("{}-step forecast with 95% intervals:", forecast.len());
    let intervals = forecast.intervals().unwrap_or(&[]);
    for ((date, value), (lo, hi)) in forecast.points().zip(intervals.iter()) {
        println!("  {}  {:>8.2}  [{:>8.2}, {:>8.2}]", date, value, lo, hi);
    }

    // Render the same view the service would serve.
    let display_start = Utc::now().date_naive() - Duration::days(profile.history_window_days);
    let observed = series.window_from(display_start);
    let png = chart::render_png(&observed, &forecast, display_start)?;

    let path = std::env::temp_dir().join("gold_forecast.png");
    std::fs::write(&path, &png)?;
    println!("\nChart written to {} ({} bytes)", path.display(), png.len());

    Ok(())
}
