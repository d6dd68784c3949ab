//! Historical series access port trait.

use crate::domain::error::ActiveDcaError;
use crate::domain::sample::IndicatorSample;

pub trait SeriesPort {
    /// Load the full series in source order.
    fn load_series(&self) -> Result<Vec<IndicatorSample>, ActiveDcaError>;
}
