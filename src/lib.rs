//! # GramCast
//!
//! Umbrella crate for the GramCast workspace. The heavy lifting lives in
//! the member crates:
//!
//! - [`gram_price`] loads daily closes and derives local-currency
//!   gram-price series
//! - [`gram_forecast`] fits the seasonal model and renders forecast chart
//!   payloads
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gramcast_workspace::gram_price::{normalize, RawPricePoint};
//!
//! let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let metal = vec![RawPricePoint::new(day(1), 2020.0), RawPricePoint::new(day(2), 2034.5)];
//! let fx = vec![RawPricePoint::new(day(1), 29.8), RawPricePoint::new(day(2), 29.9)];
//!
//! let series = normalize(&metal, &fx).unwrap();
//! assert_eq!(series.len(), 2);
//! ```

pub use gram_forecast;
pub use gram_price;
