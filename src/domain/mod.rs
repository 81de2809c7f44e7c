//! Core domain types and pure pipeline stages.

pub mod price;
pub mod indicator;
pub mod position;
pub mod signal;
pub mod returns;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
