//! End-to-end demo: build a synthetic cache, then fit and render every
//! commodity and horizon combination through the service.
//!
//! Run with: cargo run --bin forecast_demo

use chrono::{Duration, Utc};
use gram_forecast::{Commodity, ForecastService, Horizon, SeriesCache};
use gram_price::utils::generate_close_series_seeded;
use gram_price::RawPricePoint;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Gram-Price Forecast Demo");
    println!("========================\n");

    let days = 1200;
    let start_date = Utc::now().date_naive() - Duration::days(days as i64);

    let fx = generate_close_series_seeded(11, days, start_date, 30.0, 0.004);
    let commodity_raw: Vec<(Commodity, Vec<RawPricePoint>)> = vec![
        (
            Commodity::Gold,
            generate_close_series_seeded(1, days, start_date, 2000.0, 0.010),
        ),
        (
            Commodity::Silver,
            generate_close_series_seeded(2, days, start_date, 24.0, 0.015),
        ),
        (
            Commodity::Platinum,
            generate_close_series_seeded(3, days, start_date, 950.0, 0.012),
        ),
    ];

    let cache = SeriesCache::build(&commodity_raw, &fx);
    println!("Cache ready with {} commodities\n", cache.len());

    let service = ForecastService::new(cache);

    println!("Rendering all commodity/horizon combinations:");
    for commodity in Commodity::all() {
        for horizon in Horizon::all() {
            match service.render_forecast(commodity.display_name(), horizon.label()) {
                Ok(payload) => {
                    let last = payload.forecast.values().last().copied().unwrap_or(f64::NAN);
                    println!(
                        "  {:<9} {:<7} {} steps, final {:.2} per gram, {} base64 bytes",
                        payload.commodity,
                        payload.horizon,
                        payload.forecast.len(),
                        last,
                        payload.image_base64.len()
                    );
                }
                Err(e) => println!(
                    "  {:<9} {:<7} failed: {}",
                    commodity.display_name(),
                    horizon.label(),
                    e
                ),
            }
        }
    }

    println!("\nRejecting bad requests:");
    for (commodity, horizon) in [("Copper", "short"), ("Gold", "weekly")] {
        match service.render_forecast(commodity, horizon) {
            Ok(_) => println!("  {commodity}/{horizon} unexpectedly succeeded"),
            Err(e) => println!("  {commodity}/{horizon} -> {e}"),
        }
    }

    service.shutdown();
    println!("\nDemo complete.");
    Ok(())
}
