//! Configuration validation.
//!
//! Validates every section before a run starts. Values that are present but
//! unparseable are rejected here rather than replaced by defaults.

use std::time::Duration;

use crate::domain::error::ActiveDcaError;
use crate::domain::strategy::StrategyConfig;
use crate::domain::valuation::MOVING_AVERAGE_WINDOW;
use crate::ports::config_port::ConfigPort;

/// Read `[strategy]`, falling back to [`StrategyConfig::default`] per key.
pub fn read_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, ActiveDcaError> {
    let d = StrategyConfig::default();
    Ok(StrategyConfig {
        stop_investing: config.require_double("strategy", "stop_investing", d.stop_investing)?,
        sell_threshold: config.require_double("strategy", "sell_threshold", d.sell_threshold)?,
        dip_buy_threshold: config.require_double(
            "strategy",
            "dip_buy_threshold",
            d.dip_buy_threshold,
        )?,
        invest_percentage: config.require_double(
            "strategy",
            "invest_percentage",
            d.invest_percentage,
        )?,
        daily_investment: config.require_double(
            "strategy",
            "daily_investment",
            d.daily_investment,
        )?,
        weight_coefficient: config.require_double(
            "strategy",
            "weight_coefficient",
            d.weight_coefficient,
        )?,
    })
}

/// Read `[strategy]` and check it with [`StrategyConfig::validate`].
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, ActiveDcaError> {
    let strategy = read_strategy_config(config)?;
    strategy.validate()?;
    Ok(strategy)
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), ActiveDcaError> {
    validate_non_negative(config, "backtest", "initial_cash")?;
    validate_non_blank(config, "backtest", "data_file")?;
    validate_non_blank(config, "backtest", "output_file")?;
    Ok(())
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), ActiveDcaError> {
    validate_non_negative(config, "portfolio", "cash")?;
    validate_non_negative(config, "portfolio", "position")?;
    Ok(())
}

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
/// Upper bound for `[live] timeout_secs`: one day.
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// `[live] history_days`: an integer of at least [`MOVING_AVERAGE_WINDOW`].
pub fn read_history_days(config: &dyn ConfigPort) -> Result<i64, ActiveDcaError> {
    let days = config.require_int("live", "history_days", MOVING_AVERAGE_WINDOW as i64)?;
    if days < MOVING_AVERAGE_WINDOW as i64 {
        return Err(ActiveDcaError::ConfigInvalid {
            section: "live".to_string(),
            key: "history_days".to_string(),
            reason: format!("history_days must be at least {}", MOVING_AVERAGE_WINDOW),
        });
    }
    Ok(days)
}

/// `[live] timeout_secs` as a [`Duration`], in `(0, MAX_TIMEOUT_SECS]`.
pub fn read_timeout(config: &dyn ConfigPort) -> Result<Duration, ActiveDcaError> {
    let secs = config.require_double("live", "timeout_secs", DEFAULT_TIMEOUT_SECS)?;
    let out_of_range = || ActiveDcaError::ConfigInvalid {
        section: "live".to_string(),
        key: "timeout_secs".to_string(),
        reason: format!("timeout_secs must be in (0, {}]", MAX_TIMEOUT_SECS),
    };
    if !(secs > 0.0 && secs <= MAX_TIMEOUT_SECS) {
        return Err(out_of_range());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| out_of_range())
}

pub fn validate_live_config(config: &dyn ConfigPort) -> Result<(), ActiveDcaError> {
    read_history_days(config)?;
    read_timeout(config)?;
    validate_non_blank(config, "live", "current_price_url")?;
    validate_non_blank(config, "live", "history_url")?;
    Ok(())
}

fn validate_non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), ActiveDcaError> {
    let value = config.require_double(section, key, 0.0)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ActiveDcaError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be non-negative", key),
        });
    }
    Ok(())
}

/// Optional keys may be absent, but not present and empty.
fn validate_non_blank(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), ActiveDcaError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().is_empty() => Err(ActiveDcaError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        }),
        _ => Ok(()),
    }
}
