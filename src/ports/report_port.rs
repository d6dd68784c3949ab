//! Ledger export port trait.

use std::path::Path;

use crate::domain::backtest::ActionRecord;
use crate::domain::error::ActiveDcaError;

/// Port for writing the per-day action ledger.
pub trait ReportPort {
    fn write(&self, records: &[ActionRecord], output_path: &Path) -> Result<(), ActiveDcaError>;
}
