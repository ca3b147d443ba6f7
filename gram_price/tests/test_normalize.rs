use std::io::Write;

use chrono::NaiveDate;
use gram_price::{
    load_close_series, normalize, NormalizeError, RawPricePoint, GRAMS_PER_TROY_OUNCE,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn point(y: i32, m: u32, d: u32, close: f64) -> RawPricePoint {
    RawPricePoint::new(date(y, m, d), close)
}

#[test]
fn join_keeps_only_shared_dates() {
    // 01-03 has no fx close and 01-04 has no commodity close, so only the
    // first two days survive.
    let metal = vec![
        point(2024, 1, 1, 100.0),
        point(2024, 1, 2, 102.0),
        point(2024, 1, 3, 101.0),
    ];
    let fx = vec![
        point(2024, 1, 1, 30.0),
        point(2024, 1, 2, 30.0),
        point(2024, 1, 4, 31.0),
    ];

    let series = normalize(&metal, &fx).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[0].date, date(2024, 1, 1));
    assert_eq!(series.points()[1].date, date(2024, 1, 2));
}

#[rstest]
#[case(100.0, 30.0)]
#[case(2034.25, 29.87)]
#[case(0.0, 31.0)]
fn gram_price_follows_unit_conversion(#[case] close: f64, #[case] fx_close: f64) {
    let series = normalize(&[point(2024, 1, 1, close)], &[point(2024, 1, 1, fx_close)]).unwrap();

    let expected = (close / GRAMS_PER_TROY_OUNCE) * fx_close;
    assert_eq!(series.points()[0].gram_price, expected);
}

#[test]
fn output_is_sorted_and_unique_for_messy_input() {
    let metal = vec![
        point(2024, 1, 3, 103.0),
        point(2024, 1, 1, 101.0),
        point(2024, 1, 1, 999.0),
        point(2024, 1, 2, 102.0),
    ];
    let fx = vec![
        point(2024, 1, 2, 30.0),
        point(2024, 1, 1, 30.0),
        point(2024, 1, 3, 30.0),
    ];

    let series = normalize(&metal, &fx).unwrap();

    assert_eq!(
        series.dates(),
        vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
    );
    // The duplicated 01-01 row keeps its first occurrence.
    let expected = (101.0 / GRAMS_PER_TROY_OUNCE) * 30.0;
    assert_eq!(series.points()[0].gram_price, expected);
}

#[test]
fn disjoint_series_report_no_overlap() {
    let metal = vec![point(2024, 1, 1, 100.0)];
    let fx = vec![point(2024, 2, 1, 30.0)];

    let err = normalize(&metal, &fx).unwrap_err();
    assert!(matches!(err, NormalizeError::NoOverlap));
}

#[test]
fn non_finite_closes_are_dropped_before_joining() {
    let metal = vec![point(2024, 1, 1, f64::NAN), point(2024, 1, 2, 102.0)];
    let fx = vec![point(2024, 1, 1, 30.0), point(2024, 1, 2, 30.0)];

    let series = normalize(&metal, &fx).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.points()[0].date, date(2024, 1, 2));
}

#[test]
fn loader_reads_date_and_close_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,Close").unwrap();
    writeln!(file, "2024-01-01,99.0,100.5").unwrap();
    writeln!(file, "2024-01-02,100.5,").unwrap();
    writeln!(file, "2024-01-03,101.0,102.25").unwrap();

    let points = load_close_series(file.path()).unwrap();

    // The row with an empty close is skipped, not imputed.
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, date(2024, 1, 1));
    assert_eq!(points[0].close, 100.5);
    assert_eq!(points[1].date, date(2024, 1, 3));
}

#[test]
fn loader_skips_rows_with_bad_dates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,close").unwrap();
    writeln!(file, "not-a-date,100.0").unwrap();
    writeln!(file, "2024-01-02,101.0").unwrap();

    let points = load_close_series(file.path()).unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].date, date(2024, 1, 2));
}

#[test]
fn loader_requires_close_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Volume").unwrap();
    writeln!(file, "2024-01-01,1000").unwrap();

    let err = load_close_series(file.path()).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingColumn(ref c) if c == "close"));
}

#[test]
fn loader_requires_date_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Symbol,Close").unwrap();
    writeln!(file, "GC,1000.0").unwrap();

    let err = load_close_series(file.path()).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingColumn(ref c) if c == "date"));
}

#[test]
fn loaded_series_normalizes_end_to_end() {
    let mut metal = NamedTempFile::new().unwrap();
    writeln!(metal, "Date,Close").unwrap();
    writeln!(metal, "2024-01-01,2000.0").unwrap();
    writeln!(metal, "2024-01-02,2010.0").unwrap();

    let mut fx = NamedTempFile::new().unwrap();
    writeln!(fx, "Date,Close").unwrap();
    writeln!(fx, "2024-01-02,30.0").unwrap();
    writeln!(fx, "2024-01-03,30.5").unwrap();

    let metal_points = load_close_series(metal.path()).unwrap();
    let fx_points = load_close_series(fx.path()).unwrap();
    let series = normalize(&metal_points, &fx_points).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.points()[0].date, date(2024, 1, 2));
    assert_eq!(
        series.points()[0].gram_price,
        (2010.0 / GRAMS_PER_TROY_OUNCE) * 30.0
    );
}
