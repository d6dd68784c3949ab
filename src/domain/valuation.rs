//! AHR999-style valuation indicator.
//!
//! indicator = (price / growth_curve_price) * (price / 200-day average)
//!
//! The growth curve is a log-log fit of BTC price against days since the genesis block.

use chrono::NaiveDate;

use super::error::ActiveDcaError;

/// Minimum number of historical prices needed for the moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 200;

const GROWTH_SLOPE: f64 = 5.84;
const GROWTH_INTERCEPT: f64 = 17.01;

/// Live indicator reading paired with the price it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveIndicator {
    pub indicator: f64,
    pub price: f64,
}

pub fn genesis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2009, 1, 3).expect("genesis date is valid")
}

/// Whole days elapsed since the genesis block.
pub fn age_in_days(today: NaiveDate) -> i64 {
    (today - genesis_date()).num_days()
}

/// 10^(5.84 * log10(age_days) - 17.01)
pub fn growth_curve_price(age_days: i64) -> f64 {
    10f64.powf(GROWTH_SLOPE * (age_days as f64).log10() - GROWTH_INTERCEPT)
}

/// Mean of the trailing [`MOVING_AVERAGE_WINDOW`] prices.
pub fn moving_average(history: &[f64]) -> Result<f64, ActiveDcaError> {
    if history.len() < MOVING_AVERAGE_WINDOW {
        return Err(ActiveDcaError::InsufficientHistory {
            have: history.len(),
            need: MOVING_AVERAGE_WINDOW,
        });
    }
    let window = &history[history.len() - MOVING_AVERAGE_WINDOW..];
    Ok(window.iter().sum::<f64>() / MOVING_AVERAGE_WINDOW as f64)
}

/// Compute the indicator for `price` on `today` given the daily price history.
pub fn compute_indicator(
    price: f64,
    history: &[f64],
    today: NaiveDate,
) -> Result<LiveIndicator, ActiveDcaError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ActiveDcaError::InvalidInput {
            reason: format!("current price must be positive, got {}", price),
        });
    }

    let age = age_in_days(today);
    if age <= 0 {
        return Err(ActiveDcaError::InvalidInput {
            reason: format!("{} is not after the genesis date", today),
        });
    }

    let average = moving_average(history)?;
    if !average.is_finite() || average <= 0.0 {
        return Err(ActiveDcaError::InvalidInput {
            reason: format!("moving average must be positive, got {}", average),
        });
    }

    let target = growth_curve_price(age);
    Ok(LiveIndicator {
        indicator: (price / target) * (price / average),
        price,
    })
}
