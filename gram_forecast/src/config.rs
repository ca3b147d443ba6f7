//! Fixed catalog configuration: tracked commodities, the exchange-rate
//! pair, and the history start date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Quote-provider symbol for the USD/TRY exchange rate
pub const CURRENCY_PAIR: &str = "USDTRY=X";

/// First date requested from the quote provider
pub fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()
}

/// The fixed set of tracked commodities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commodity {
    Gold,
    Silver,
    Platinum,
}

impl Commodity {
    /// All tracked commodities
    pub fn all() -> [Commodity; 3] {
        [Commodity::Gold, Commodity::Silver, Commodity::Platinum]
    }

    /// Human-facing display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Commodity::Gold => "Gold",
            Commodity::Silver => "Silver",
            Commodity::Platinum => "Platinum",
        }
    }

    /// Quote-provider ticker
    pub fn ticker(&self) -> &'static str {
        match self {
            Commodity::Gold => "GC=F",
            Commodity::Silver => "SI=F",
            Commodity::Platinum => "PL=F",
        }
    }

    /// Resolve a caller-supplied display name. Unknown names are an error,
    /// never a silent default.
    pub fn from_display_name(name: &str) -> Result<Commodity> {
        let trimmed = name.trim();
        Commodity::all()
            .into_iter()
            .find(|c| trimmed.eq_ignore_ascii_case(c.display_name()))
            .ok_or_else(|| ForecastError::UnknownCommodity(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_round_trip() {
        for commodity in Commodity::all() {
            assert_eq!(
                Commodity::from_display_name(commodity.display_name()).unwrap(),
                commodity
            );
        }
    }

    #[test]
    fn test_from_display_name_ignores_case() {
        assert_eq!(
            Commodity::from_display_name("gold").unwrap(),
            Commodity::Gold
        );
        assert_eq!(
            Commodity::from_display_name(" SILVER ").unwrap(),
            Commodity::Silver
        );
    }

    #[test]
    fn test_unknown_commodity_is_an_error() {
        let err = Commodity::from_display_name("Copper").unwrap_err();
        assert!(matches!(err, ForecastError::UnknownCommodity(ref n) if n == "Copper"));
    }

    #[test]
    fn test_tickers_are_distinct() {
        let tickers: Vec<&str> = Commodity::all().iter().map(|c| c.ticker()).collect();
        assert_eq!(tickers, vec!["GC=F", "SI=F", "PL=F"]);
    }
}
