//! End-of-run summary statistics.

use super::backtest::ActionRecord;
use super::strategy::Action;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub days: usize,
    pub holds: usize,
    pub buys: usize,
    pub sells: usize,
    pub dip_buys: usize,
    pub initial_cash: f64,
    pub final_cash: f64,
    pub final_position: f64,
    pub final_value: f64,
    /// Initial cash plus every amount reported on a `Buy` row.
    pub cumulative_investment: f64,
    /// (final_value - cumulative_investment) / cumulative_investment
    pub total_return: f64,
    pub peak_value: f64,
    pub max_drawdown: f64,
}

impl BacktestSummary {
    pub fn compute(initial_cash: f64, records: &[ActionRecord]) -> Self {
        let mut holds = 0usize;
        let mut buys = 0usize;
        let mut sells = 0usize;
        let mut dip_buys = 0usize;
        let mut cumulative_investment = initial_cash;

        for record in records {
            match record.action {
                Action::Hold => holds += 1,
                Action::Buy => {
                    buys += 1;
                    cumulative_investment += record.operation_amount;
                }
                Action::Sell => sells += 1,
                Action::DipBuy => dip_buys += 1,
            }
        }

        let (final_cash, final_position, final_value) = records
            .last()
            .map(|r| (r.cash, r.position, r.portfolio_value))
            .unwrap_or((initial_cash, 0.0, initial_cash));

        let total_return = if cumulative_investment > 0.0 {
            (final_value - cumulative_investment) / cumulative_investment
        } else {
            0.0
        };

        let (peak_value, max_drawdown) = compute_drawdown(records);

        BacktestSummary {
            days: records.len(),
            holds,
            buys,
            sells,
            dip_buys,
            initial_cash,
            final_cash,
            final_position,
            final_value,
            cumulative_investment,
            total_return,
            peak_value,
            max_drawdown,
        }
    }
}

fn compute_drawdown(records: &[ActionRecord]) -> (f64, f64) {
    let Some(first) = records.first() else {
        return (0.0, 0.0);
    };

    let mut peak = first.portfolio_value;
    let mut max_dd = 0.0_f64;

    for record in records {
        if record.portfolio_value > peak {
            peak = record.portfolio_value;
        } else if peak > 0.0 {
            let dd = (peak - record.portfolio_value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    (peak, max_dd)
}
