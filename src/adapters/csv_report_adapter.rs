//! CSV ledger writer.

use crate::domain::backtest::ActionRecord;
use crate::domain::error::ActiveDcaError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub const LEDGER_HEADER: [&str; 8] = [
    "Date",
    "Price",
    "Indicator",
    "Cash",
    "Position",
    "Action",
    "OperationAmount",
    "PortfolioValue",
];

/// Writes one row per record at reporting precision.
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn row(record: &ActionRecord) -> [String; 8] {
        let r = record.rounded();
        [
            r.date.format("%Y-%m-%d").to_string(),
            format!("{:.1}", r.price),
            format!("{:.3}", r.indicator),
            format!("{:.1}", r.cash),
            format!("{:.5}", r.position),
            r.action.to_string(),
            format!("{:.1}", r.operation_amount),
            format!("{:.1}", r.portfolio_value),
        ]
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, records: &[ActionRecord], output_path: &Path) -> Result<(), ActiveDcaError> {
        let report_err = |e: csv::Error| ActiveDcaError::Report {
            reason: format!("{}: {}", output_path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(report_err)?;
        wtr.write_record(LEDGER_HEADER).map_err(report_err)?;
        for record in records {
            wtr.write_record(Self::row(record)).map_err(report_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::Action;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn sample_record() -> ActionRecord {
        ActionRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            price: 50_000.0,
            indicator: 0.9,
            cash: 10_000.0,
            position: 100.0 / 0.9 / 50_000.0,
            action: Action::Buy,
            operation_amount: 100.0 / 0.9,
            portfolio_value: 10_000.0 + 100.0 / 0.9,
        }
    }

    #[test]
    fn writes_header_and_rounded_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");

        CsvReportAdapter.write(&[sample_record()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Price,Indicator,Cash,Position,Action,OperationAmount,PortfolioValue"
        );
        assert_eq!(
            lines[1],
            "2024-01-15,50000.0,0.900,10000.0,0.00222,Buy,111.1,10111.1"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn empty_ledger_has_only_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        CsvReportAdapter.write(&[], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn unwritable_path_is_report_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("ledger.csv");
        let err = CsvReportAdapter.write(&[], &path).unwrap_err();
        assert!(matches!(err, ActiveDcaError::Report { .. }));
    }
}
