//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod ledger;
pub mod indicator;
pub mod cross;
pub mod signal;
pub mod risk;
pub mod strategy;
pub mod augmented;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
