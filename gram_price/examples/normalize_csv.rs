//! Round-trip demo: write provider-style CSVs, load them back, and derive a
//! gram-price series.
//!
//! Run with: cargo run --example normalize_csv

use std::fs::File;
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use gram_price::utils::generate_close_series_seeded;
use gram_price::{load_close_series, normalize, RawPricePoint};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Gram-Price Normalization Example");
    println!("================================\n");

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad start date")?;
    let metal = generate_close_series_seeded(1, 120, start, 2000.0, 0.01);
    let fx = generate_close_series_seeded(2, 120, start, 30.0, 0.005);

    // Knock a few dates out of each side so the join has work to do.
    let metal: Vec<RawPricePoint> = metal.into_iter().filter(|p| p.date.day() != 13).collect();
    let fx: Vec<RawPricePoint> = fx.into_iter().filter(|p| p.date.day() != 21).collect();

    let dir = std::env::temp_dir();
    let metal_path = dir.join("normalize_csv_metal.csv");
    let fx_path = dir.join("normalize_csv_fx.csv");
    write_csv(&metal_path, &metal)?;
    write_csv(&fx_path, &fx)?;
    println!("Wrote {} metal rows to {}", metal.len(), metal_path.display());
    println!("Wrote {} fx rows to {}\n", fx.len(), fx_path.display());

    let metal_points = load_close_series(&metal_path)?;
    let fx_points = load_close_series(&fx_path)?;
    let series = normalize(&metal_points, &fx_points)?;

    println!("Normalized series: {} points", series.len());
    if let (Some(first), Some(last)) = (series.points().first(), series.points().last()) {
        println!("First: {}  {:.4} per gram", first.date, first.gram_price);
        println!("Last:  {}  {:.4} per gram", last.date, last.gram_price);
    }

    println!("\nHead of the series:");
    for p in series.points().iter().take(5) {
        println!("  {}  {:.4}", p.date, p.gram_price);
    }

    Ok(())
}

fn write_csv(path: &std::path::Path, points: &[RawPricePoint]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Date,Close")?;
    for p in points {
        writeln!(file, "{},{}", p.date, p.close)?;
    }
    Ok(())
}
