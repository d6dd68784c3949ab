//! Historical indicator sample representation.

use chrono::NaiveDate;

use super::error::ActiveDcaError;

/// One day of input: BTC price and the valuation indicator for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSample {
    pub date: NaiveDate,
    pub price: f64,
    pub indicator: f64,
}

impl IndicatorSample {
    pub fn new(date: NaiveDate, price: f64, indicator: f64) -> Self {
        IndicatorSample {
            date,
            price,
            indicator,
        }
    }
}

/// Parse a calendar date given as `YYYYMMDD` (the series' native form) or `YYYY-MM-DD`.
pub fn parse_sample_date(raw: &str) -> Result<NaiveDate, ActiveDcaError> {
    let trimmed = raw.trim();
    let format = if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        "%Y%m%d"
    } else {
        "%Y-%m-%d"
    };
    NaiveDate::parse_from_str(trimmed, format).map_err(|e| ActiveDcaError::DataParse {
        reason: format!("invalid date '{}': {}", trimmed, e),
    })
}
