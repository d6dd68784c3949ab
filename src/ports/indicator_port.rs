//! Live indicator source port trait.

use crate::domain::error::ActiveDcaError;
use crate::domain::valuation::LiveIndicator;

/// Supplies the current indicator and BTC price.
///
/// A failed fetch is reported as `Err`; callers must not run a decision without a reading.
pub trait IndicatorProvider {
    fn fetch_current_indicator(&self) -> Result<LiveIndicator, ActiveDcaError>;
}
