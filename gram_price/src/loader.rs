//! CSV ingestion for daily close series.

use std::path::Path;

use chrono::NaiveDate;

use crate::{NormalizeError, RawPricePoint, Result};

/// Load a `(date, close)` series from a CSV file.
///
/// The date and close columns are located by case-insensitive header match
/// ("date"/"timestamp" and "close"/"price"). Rows whose close is empty or
/// unparseable are skipped: the provider publishes holes instead of
/// placeholder values, and incomplete rows must be excluded rather than
/// imputed.
pub fn load_close_series<P: AsRef<Path>>(path: P) -> Result<Vec<RawPricePoint>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &["date", "timestamp"])
        .ok_or_else(|| NormalizeError::MissingColumn("date".to_string()))?;
    let close_idx = find_column(&headers, &["close", "price"])
        .ok_or_else(|| NormalizeError::MissingColumn("close".to_string()))?;

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;

        let Some(date) = record.get(date_idx).and_then(parse_date) else {
            continue;
        };
        let Some(close) = record
            .get(close_idx)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|c| c.is_finite())
        else {
            continue;
        };

        points.push(RawPricePoint { date, close });
    }

    Ok(points)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|name| {
        let name = name.to_ascii_lowercase();
        candidates.iter().any(|c| name.contains(c))
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
