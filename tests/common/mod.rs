#![allow(dead_code)]

use activedca::domain::backtest::ActionRecord;
use activedca::domain::error::ActiveDcaError;
pub use activedca::domain::sample::IndicatorSample;
use activedca::domain::strategy::{StrategyConfig, StrategyEngine};
use activedca::domain::valuation::LiveIndicator;
use activedca::ports::data_port::SeriesPort;
use activedca::ports::indicator_port::IndicatorProvider;
use activedca::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

pub struct MockSeriesPort {
    pub samples: Vec<IndicatorSample>,
    pub error: Option<String>,
}

impl MockSeriesPort {
    pub fn new(samples: Vec<IndicatorSample>) -> Self {
        Self {
            samples,
            error: None,
        }
    }

    pub fn missing(path: &str) -> Self {
        Self {
            samples: Vec::new(),
            error: Some(path.to_string()),
        }
    }
}

impl SeriesPort for MockSeriesPort {
    fn load_series(&self) -> Result<Vec<IndicatorSample>, ActiveDcaError> {
        if let Some(path) = &self.error {
            return Err(ActiveDcaError::DataNotFound { path: path.clone() });
        }
        Ok(self.samples.clone())
    }
}

/// Captures what would have been written instead of touching disk.
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(PathBuf, Vec<ActionRecord>)>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write(&self, records: &[ActionRecord], output_path: &Path) -> Result<(), ActiveDcaError> {
        self.written
            .borrow_mut()
            .push((output_path.to_path_buf(), records.to_vec()));
        Ok(())
    }
}

pub struct MockIndicatorProvider {
    pub reading: Option<LiveIndicator>,
    pub calls: Cell<usize>,
}

impl MockIndicatorProvider {
    pub fn returning(indicator: f64, price: f64) -> Self {
        Self {
            reading: Some(LiveIndicator { indicator, price }),
            calls: Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reading: None,
            calls: Cell::new(0),
        }
    }
}

impl IndicatorProvider for MockIndicatorProvider {
    fn fetch_current_indicator(&self) -> Result<LiveIndicator, ActiveDcaError> {
        self.calls.set(self.calls.get() + 1);
        self.reading.ok_or_else(|| ActiveDcaError::IndicatorFetch {
            reason: "connection refused".to_string(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_sample(date: &str, price: f64, indicator: f64) -> IndicatorSample {
    IndicatorSample::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        price,
        indicator,
    )
}

pub fn default_engine() -> StrategyEngine {
    StrategyEngine::new(StrategyConfig::default()).unwrap()
}

/// Daily series cycling the indicator through every regime.
pub fn generate_series(start_date: &str, count: usize, start_price: f64) -> Vec<IndicatorSample> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    let indicators = [0.45, 0.8, 1.3, 1.6, 2.1, 1.0, 0.55, 1.9];
    (0..count)
        .map(|i| {
            IndicatorSample::new(
                start + chrono::Duration::days(i as i64),
                start_price + (i as f64) * 250.0,
                indicators[i % indicators.len()],
            )
        })
        .collect()
}
