use std::fs::File;
use std::io::Write;
use std::thread;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use gram_forecast::{Commodity, ForecastError, ForecastService, SeriesCache};
use gram_price::utils::generate_close_series_seeded;
use gram_price::RawPricePoint;
use pretty_assertions::assert_eq;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Synthetic aligned provider data for the whole catalog, ending yesterday
fn build_cache(days: usize) -> SeriesCache {
    let start = Utc::now().date_naive() - Duration::days(days as i64);
    let fx = generate_close_series_seeded(100, days, start, 30.0, 0.004);
    let commodity_raw = vec![
        (
            Commodity::Gold,
            generate_close_series_seeded(101, days, start, 2000.0, 0.010),
        ),
        (
            Commodity::Silver,
            generate_close_series_seeded(102, days, start, 24.0, 0.015),
        ),
        (
            Commodity::Platinum,
            generate_close_series_seeded(103, days, start, 950.0, 0.012),
        ),
    ];
    SeriesCache::build(&commodity_raw, &fx)
}

#[test]
fn unknown_commodity_is_rejected_before_dispatch() {
    let service = ForecastService::new(build_cache(60));

    let err = service.render_forecast("Copper", "short").unwrap_err();
    assert!(matches!(err, ForecastError::UnknownCommodity(ref n) if n == "Copper"));
}

#[test]
fn unknown_horizon_is_rejected_before_dispatch() {
    let service = ForecastService::new(build_cache(60));

    let err = service.render_forecast("Gold", "weekly").unwrap_err();
    assert!(matches!(err, ForecastError::UnknownHorizon(ref l) if l == "weekly"));
}

#[test]
fn payload_carries_a_decodable_png_chart() {
    let service = ForecastService::new(build_cache(200));

    let payload = service.render_forecast("Gold", "short").unwrap();

    assert_eq!(payload.commodity, "Gold");
    assert_eq!(payload.horizon, "short");
    assert_eq!(payload.model, "SARIMA(1,1,1)(1,1,1,7)");
    assert_eq!(payload.forecast.len(), 7);

    let png = BASE64_STANDARD.decode(&payload.image_base64).unwrap();
    assert_eq!(&png[..8], &PNG_MAGIC);

    let json = payload.to_json().unwrap();
    assert!(json.contains("\"commodity\":\"Gold\""));
    assert!(json.contains("image_base64"));
}

#[test]
fn each_horizon_resolves_its_step_count() {
    let service = ForecastService::new(build_cache(200));

    for (label, steps) in [("short", 7), ("medium", 30), ("long", 365)] {
        let payload = service.render_forecast("Gold", label).unwrap();
        assert_eq!(payload.forecast.len(), steps, "horizon {}", label);
    }
}

#[test]
fn failed_commodity_is_isolated_from_the_rest() {
    let days = 60;
    let start = Utc::now().date_naive() - Duration::days(days as i64);
    let fx = generate_close_series_seeded(200, days, start, 30.0, 0.004);
    let commodity_raw = vec![
        (
            Commodity::Gold,
            generate_close_series_seeded(201, days, start, 2000.0, 0.010),
        ),
        // Silver has no rows at all, so its normalization fails.
        (Commodity::Silver, Vec::<RawPricePoint>::new()),
    ];
    let cache = SeriesCache::build(&commodity_raw, &fx);
    assert_eq!(cache.available(), vec![Commodity::Gold]);

    let service = ForecastService::new(cache);

    let err = service.render_forecast("Silver", "short").unwrap_err();
    assert!(matches!(err, ForecastError::Unavailable(ref n) if n == "Silver"));

    let payload = service.render_forecast("Gold", "short").unwrap();
    assert_eq!(payload.forecast.len(), 7);
}

#[test]
fn saturated_pool_sheds_load_instead_of_queueing() {
    let service = ForecastService::with_pool(build_cache(400), 1, 1);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| service.render_forecast("Gold", "medium")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Accepted jobs complete; everything else is shed with Saturated.
    assert!(results
        .iter()
        .all(|r| matches!(r, Ok(_) | Err(ForecastError::Saturated))));
    assert!(results.iter().any(|r| r.is_ok()));
}

#[test]
fn service_survives_shutdown_and_reports_availability() {
    let service = ForecastService::new(build_cache(60));
    assert_eq!(
        service.available_commodities(),
        vec![Commodity::Gold, Commodity::Silver, Commodity::Platinum]
    );
    service.shutdown();
}

#[test]
fn cache_builds_from_a_directory_of_csv_exports() {
    let dir = tempfile::tempdir().unwrap();
    let start = Utc::now().date_naive() - Duration::days(30);

    for (name, base) in [
        ("GC=F", 2000.0),
        ("SI=F", 24.0),
        ("PL=F", 950.0),
        ("USDTRY=X", 30.0),
    ] {
        let mut file = File::create(dir.path().join(format!("{name}.csv"))).unwrap();
        writeln!(file, "Date,Close").unwrap();
        for i in 0..30 {
            let date = start + Duration::days(i);
            writeln!(file, "{},{}", date, base + i as f64 * 0.1).unwrap();
        }
    }

    let cache = SeriesCache::from_csv_dir(dir.path()).unwrap();
    assert_eq!(cache.len(), 3);
}

#[test]
fn missing_commodity_file_only_drops_that_commodity() {
    let dir = tempfile::tempdir().unwrap();
    let start = Utc::now().date_naive() - Duration::days(30);

    for name in ["GC=F", "USDTRY=X"] {
        let mut file = File::create(dir.path().join(format!("{name}.csv"))).unwrap();
        writeln!(file, "Date,Close").unwrap();
        for i in 0..30 {
            writeln!(file, "{},{}", start + Duration::days(i), 100.0 + i as f64).unwrap();
        }
    }

    let cache = SeriesCache::from_csv_dir(dir.path()).unwrap();
    assert_eq!(cache.available(), vec![Commodity::Gold]);
}

#[test]
fn missing_fx_file_fails_the_whole_build() {
    let dir = tempfile::tempdir().unwrap();

    let err = SeriesCache::from_csv_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ForecastError::Data(_)));
}
