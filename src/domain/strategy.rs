//! Active DCA strategy configuration and decision engine.
//!
//! Each call to [`StrategyEngine::decide`] runs two phases against the portfolio:
//!
//! 1. A primary regime chosen by the indicator: buy below `stop_investing`,
//!    bank the daily amount as cash up to `sell_threshold`, sell everything at or above it.
//! 2. A dip overlay: below `dip_buy_threshold`, deploy `invest_percentage` of idle cash.
//!
//! Phase 2 overwrites the reported action and amount of phase 1, but the
//! financial effects of both phases are applied.
//!
//! The phase-1 buy is funded by fresh capital and never debits `cash`. This is
//! the strategy's accounting as published; it overstates returns relative to a
//! closed budget and is kept as-is.

use std::fmt;

use super::error::ActiveDcaError;
use super::portfolio::PortfolioState;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub stop_investing: f64,
    pub sell_threshold: f64,
    pub dip_buy_threshold: f64,
    pub invest_percentage: f64,
    pub daily_investment: f64,
    pub weight_coefficient: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            stop_investing: 1.10,
            sell_threshold: 1.85,
            dip_buy_threshold: 0.6,
            invest_percentage: 0.7,
            daily_investment: 100.0,
            weight_coefficient: 1.0,
        }
    }
}

impl StrategyConfig {
    /// Check ranges and the `dip_buy_threshold < stop_investing < sell_threshold` ordering.
    pub fn validate(&self) -> Result<(), ActiveDcaError> {
        let positive = [
            ("stop_investing", self.stop_investing),
            ("sell_threshold", self.sell_threshold),
            ("dip_buy_threshold", self.dip_buy_threshold),
            ("daily_investment", self.daily_investment),
            ("weight_coefficient", self.weight_coefficient),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, format!("{} must be a positive number", key)));
            }
        }

        if !(0.0..=1.0).contains(&self.invest_percentage) {
            return Err(invalid(
                "invest_percentage",
                "invest_percentage must be between 0 and 1".to_string(),
            ));
        }

        if self.dip_buy_threshold >= self.stop_investing {
            return Err(invalid(
                "dip_buy_threshold",
                format!(
                    "dip_buy_threshold ({}) must be below stop_investing ({})",
                    self.dip_buy_threshold, self.stop_investing
                ),
            ));
        }
        if self.stop_investing >= self.sell_threshold {
            return Err(invalid(
                "stop_investing",
                format!(
                    "stop_investing ({}) must be below sell_threshold ({})",
                    self.stop_investing, self.sell_threshold
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: String) -> ActiveDcaError {
    ActiveDcaError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hold,
    Buy,
    Sell,
    DipBuy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hold => "Hold",
            Action::Buy => "Buy",
            Action::Sell => "Sell",
            Action::DipBuy => "DipBuy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one decision: the reported action and the amount of cash it moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub operation_amount: f64,
}

impl Decision {
    fn hold() -> Self {
        Decision {
            action: Action::Hold,
            operation_amount: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrategyEngine {
    config: StrategyConfig,
}

impl StrategyEngine {
    pub fn new(config: StrategyConfig) -> Result<Self, ActiveDcaError> {
        config.validate()?;
        Ok(StrategyEngine { config })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// daily_investment * (weight_coefficient / indicator)
    pub fn dynamic_investment(&self, indicator: f64) -> f64 {
        self.config.daily_investment * (self.config.weight_coefficient / indicator)
    }

    /// Apply one day's decision to `state`.
    ///
    /// Rejects non-finite or non-positive inputs without touching `state`.
    pub fn decide(
        &self,
        indicator: f64,
        price: f64,
        state: &mut PortfolioState,
    ) -> Result<Decision, ActiveDcaError> {
        check_input("indicator", indicator)?;
        check_input("price", price)?;

        let cfg = &self.config;
        let mut decision = Decision::hold();

        if indicator < cfg.stop_investing {
            let amount = self.dynamic_investment(indicator);
            state.add_units(amount / price);
            decision = Decision {
                action: Action::Buy,
                operation_amount: amount,
            };
        } else if indicator < cfg.sell_threshold {
            state.deposit(cfg.daily_investment);
        } else if state.position() > 0.0 {
            let proceeds = state.liquidate(price);
            decision = Decision {
                action: Action::Sell,
                operation_amount: proceeds,
            };
        }

        if indicator < cfg.dip_buy_threshold && state.cash() > 0.0 {
            let amount = state.cash() * cfg.invest_percentage;
            state.add_units(amount / price);
            state.withdraw(amount);
            decision = Decision {
                action: Action::DipBuy,
                operation_amount: amount,
            };
        }

        Ok(decision)
    }
}

fn check_input(name: &str, value: f64) -> Result<(), ActiveDcaError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ActiveDcaError::InvalidInput {
            reason: format!("{} must be a positive finite number, got {}", name, value),
        })
    }
}
