//! Backtest runner: a left-to-right fold of the strategy over a sample series.

use chrono::NaiveDate;

use super::error::ActiveDcaError;
use super::portfolio::PortfolioState;
use super::sample::IndicatorSample;
use super::strategy::{Action, StrategyEngine};

/// One ledger row: the sample, the decision taken on it and the post-decision holdings.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub indicator: f64,
    pub cash: f64,
    pub position: f64,
    pub action: Action,
    pub operation_amount: f64,
    pub portfolio_value: f64,
}

impl ActionRecord {
    /// Copy rounded to reporting precision. Never fed back into the run.
    pub fn rounded(&self) -> ActionRecord {
        ActionRecord {
            date: self.date,
            price: round_to(self.price, 1),
            indicator: round_to(self.indicator, 3),
            cash: round_to(self.cash, 1),
            position: round_to(self.position, 5),
            action: self.action,
            operation_amount: round_to(self.operation_amount, 1),
            portfolio_value: round_to(self.portfolio_value, 1),
        }
    }
}

/// Round to `decimals` places. Ties on the scaled value round away from zero
/// (`f64::round`), not to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Run `engine` over `samples` in the given order, mutating `state` step by step.
///
/// The series is not re-sorted. An invalid sample aborts the run.
pub fn run_backtest(
    samples: &[IndicatorSample],
    engine: &StrategyEngine,
    state: &mut PortfolioState,
) -> Result<Vec<ActionRecord>, ActiveDcaError> {
    let mut records = Vec::with_capacity(samples.len());

    for sample in samples {
        let decision = engine
            .decide(sample.indicator, sample.price, state)
            .map_err(|e| match e {
                ActiveDcaError::InvalidInput { reason } => ActiveDcaError::InvalidInput {
                    reason: format!("sample {}: {}", sample.date, reason),
                },
                other => other,
            })?;

        let record = ActionRecord {
            date: sample.date,
            price: sample.price,
            indicator: sample.indicator,
            cash: state.cash(),
            position: state.position(),
            action: decision.action,
            operation_amount: decision.operation_amount,
            portfolio_value: state.value(sample.price),
        };
        log::debug!(
            "{} {} amount={:.2} cash={:.2} position={:.6}",
            record.date,
            record.action,
            record.operation_amount,
            record.cash,
            record.position
        );
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::StrategyConfig;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn engine() -> StrategyEngine {
        StrategyEngine::new(StrategyConfig::default()).unwrap()
    }

    #[test]
    fn round_to_precisions() {
        assert_eq!(round_to(111.111_111, 1), 111.1);
        assert_eq!(round_to(0.002_222_22, 5), 0.00222);
        assert_eq!(round_to(0.876_51, 3), 0.877);
        assert_eq!(round_to(-2.25, 0), -2.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-0.5, 0), -1.0);
    }

    #[test]
    fn empty_series_yields_no_records() {
        let mut state = PortfolioState::new(10_000.0);
        let records = run_backtest(&[], &engine(), &mut state).unwrap();
        assert!(records.is_empty());
        assert_eq!(state, PortfolioState::new(10_000.0));
    }

    #[test]
    fn one_record_per_sample_in_input_order() {
        let samples = vec![
            IndicatorSample::new(day(3), 50_000.0, 1.5),
            IndicatorSample::new(day(1), 48_000.0, 0.9),
            IndicatorSample::new(day(2), 52_000.0, 2.0),
        ];
        let mut state = PortfolioState::new(10_000.0);
        let records = run_backtest(&samples, &engine(), &mut state).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(1), day(2)]);
        let actions: Vec<_> = records.iter().map(|r| r.action).collect();
        assert_eq!(actions, vec![Action::Hold, Action::Buy, Action::Sell]);
    }

    #[test]
    fn state_carries_between_steps() {
        let samples = vec![
            IndicatorSample::new(day(1), 40_000.0, 1.0),
            IndicatorSample::new(day(2), 60_000.0, 2.0),
        ];
        let mut state = PortfolioState::new(1_000.0);
        let records = run_backtest(&samples, &engine(), &mut state).unwrap();

        let bought = (100.0 / 1.0) / 40_000.0;
        assert_relative_eq!(records[0].position, bought, epsilon = 1e-12);
        assert_eq!(records[1].action, Action::Sell);
        assert_relative_eq!(records[1].operation_amount, bought * 60_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.cash(), 1_000.0 + bought * 60_000.0, epsilon = 1e-9);
        assert_eq!(state.position(), 0.0);
    }

    #[test]
    fn portfolio_value_uses_post_decision_state() {
        let samples = vec![IndicatorSample::new(day(1), 50_000.0, 0.5)];
        let mut state = PortfolioState::new(1_000.0);
        let records = run_backtest(&samples, &engine(), &mut state).unwrap();
        let r = &records[0];
        assert_eq!(r.portfolio_value, r.cash + r.position * r.price);
    }

    #[test]
    fn invalid_sample_aborts_with_date() {
        let samples = vec![
            IndicatorSample::new(day(1), 50_000.0, 1.5),
            IndicatorSample::new(day(2), 50_000.0, 0.0),
        ];
        let mut state = PortfolioState::new(10_000.0);
        let err = run_backtest(&samples, &engine(), &mut state).unwrap_err();
        match err {
            ActiveDcaError::InvalidInput { reason } => assert!(reason.contains("2024-01-02")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rounded_record_precision() {
        let r = ActionRecord {
            date: day(1),
            price: 50_000.04,
            indicator: 0.900_49,
            cash: 10_000.06,
            position: 0.002_222_22,
            action: Action::Buy,
            operation_amount: 111.111_111,
            portfolio_value: 10_111.17,
        };
        let rounded = r.rounded();
        assert_eq!(rounded.price, 50_000.0);
        assert_eq!(rounded.indicator, 0.9);
        assert_eq!(rounded.cash, 10_000.1);
        assert_eq!(rounded.position, 0.00222);
        assert_eq!(rounded.operation_amount, 111.1);
        assert_eq!(rounded.portfolio_value, 10_111.2);
        assert_eq!(rounded.action, Action::Buy);
    }
}
