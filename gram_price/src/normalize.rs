//! Date alignment and gram-price derivation.

use crate::{NormalizeError, NormalizedPoint, NormalizedSeries, RawPricePoint, Result};

/// Grams per troy ounce, the fixed conversion for metals quoted per ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1;

/// Align a commodity close series with an exchange-rate series and derive
/// the local-currency gram price for every shared date.
///
/// Rows without a usable close on either side are dropped, never
/// interpolated. Dates present in only one input contribute no output row:
/// pairing a commodity close from one day with an exchange rate from another
/// would silently skew the derived series.
pub fn normalize(
    commodity_raw: &[RawPricePoint],
    fx_raw: &[RawPricePoint],
) -> Result<NormalizedSeries> {
    let commodity = clean(commodity_raw);
    let fx = clean(fx_raw);

    let mut points = Vec::with_capacity(commodity.len().min(fx.len()));
    let mut i = 0;
    let mut j = 0;

    while i < commodity.len() && j < fx.len() {
        match commodity[i].date.cmp(&fx[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                points.push(NormalizedPoint {
                    date: commodity[i].date,
                    gram_price: (commodity[i].close / GRAMS_PER_TROY_OUNCE) * fx[j].close,
                });
                i += 1;
                j += 1;
            }
        }
    }

    if points.is_empty() {
        return Err(NormalizeError::NoOverlap);
    }

    Ok(NormalizedSeries::new(points))
}

/// Drop non-finite closes, sort by date, keep the first row per date.
fn clean(raw: &[RawPricePoint]) -> Vec<RawPricePoint> {
    let mut rows: Vec<RawPricePoint> = raw
        .iter()
        .copied()
        .filter(|p| p.close.is_finite())
        .collect();
    rows.sort_by_key(|p| p.date);
    rows.dedup_by_key(|p| p.date);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(d: u32, close: f64) -> RawPricePoint {
        RawPricePoint::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), close)
    }

    #[test]
    fn test_clean_sorts_and_keeps_first_duplicate() {
        let rows = clean(&[point(3, 30.0), point(1, 10.0), point(1, 99.0), point(2, 20.0)]);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].close, 10.0);
        assert_eq!(rows[2].close, 30.0);
    }

    #[test]
    fn test_clean_drops_non_finite() {
        let rows = clean(&[point(1, f64::NAN), point(2, f64::INFINITY), point(3, 30.0)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 30.0);
    }

    #[test]
    fn test_normalize_formula() {
        let series = normalize(&[point(1, 100.0)], &[point(1, 30.0)]).unwrap();
        let expected = (100.0 / GRAMS_PER_TROY_OUNCE) * 30.0;
        assert_eq!(series.points()[0].gram_price, expected);
    }

    #[test]
    fn test_normalize_empty_inputs() {
        let err = normalize(&[], &[]).unwrap_err();
        assert!(matches!(err, NormalizeError::NoOverlap));
    }
}
