//! CSV file series adapter.
//!
//! Expects a header row with a date column plus price and indicator columns:
//! `Date,btc_price,ahr999` (or `Date,price,indicator`). Rows are returned in
//! file order.

use crate::domain::error::ActiveDcaError;
use crate::domain::sample::{parse_sample_date, IndicatorSample};
use crate::ports::data_port::SeriesPort;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const DATE_COLUMNS: &[&str] = &["date"];
const PRICE_COLUMNS: &[&str] = &["btc_price", "price"];
const INDICATOR_COLUMNS: &[&str] = &["ahr999", "indicator"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_field(
        record: &csv::StringRecord,
        column: usize,
        name: &str,
        line: u64,
    ) -> Result<f64, ActiveDcaError> {
        let raw = record.get(column).ok_or_else(|| ActiveDcaError::DataParse {
            reason: format!("line {}: missing {} column", line, name),
        })?;
        raw.trim().parse().map_err(|e| ActiveDcaError::DataParse {
            reason: format!("line {}: invalid {} value '{}': {}", line, name, raw, e),
        })
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().trim_start_matches('\u{feff}').to_lowercase();
        names.contains(&h.as_str())
    })
}

impl SeriesPort for CsvAdapter {
    fn load_series(&self) -> Result<Vec<IndicatorSample>, ActiveDcaError> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ActiveDcaError::DataNotFound {
                path: self.path.display().to_string(),
            },
            _ => ActiveDcaError::Io(e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| ActiveDcaError::DataParse {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let missing = |what: &str| ActiveDcaError::DataParse {
            reason: format!("{}: no {} column in header", self.path.display(), what),
        };
        let date_col = find_column(&headers, DATE_COLUMNS).ok_or_else(|| missing("date"))?;
        let price_col = find_column(&headers, PRICE_COLUMNS).ok_or_else(|| missing("price"))?;
        let indicator_col =
            find_column(&headers, INDICATOR_COLUMNS).ok_or_else(|| missing("indicator"))?;

        let mut samples: Vec<IndicatorSample> = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ActiveDcaError::DataParse {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date_str = record.get(date_col).ok_or_else(|| ActiveDcaError::DataParse {
                reason: format!("line {}: missing date column", line),
            })?;
            let date = parse_sample_date(date_str).map_err(|e| ActiveDcaError::DataParse {
                reason: format!("line {}: {}", line, e),
            })?;
            let price = Self::parse_field(&record, price_col, "price", line)?;
            let indicator = Self::parse_field(&record, indicator_col, "indicator", line)?;

            if let Some(prev) = samples.last() {
                if date <= prev.date {
                    log::warn!(
                        "{}: line {}: date {} does not follow {}; series is not chronological",
                        self.path.display(),
                        line,
                        date,
                        prev.date
                    );
                }
            }

            samples.push(IndicatorSample::new(date, price, indicator));
        }

        log::debug!("loaded {} samples from {}", samples.len(), self.path.display());
        Ok(samples)
    }
}
