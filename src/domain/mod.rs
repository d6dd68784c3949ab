//! Core domain types and logic.

pub mod sample;
pub mod portfolio;
pub mod strategy;
pub mod backtest;
pub mod metrics;
pub mod valuation;
pub mod config_validation;
pub mod error;
