//! Configuration validation.
//!
//! Each `read_*` function parses and checks one field so callers can swap in
//! their own value for any of them before the whole set is validated.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::domain::error::MacdError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::MacdParams;
use crate::domain::metrics::DAILY_RISK_FREE_RATE;
use crate::ports::config_port::ConfigPort;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate every field a backtest needs before any data is fetched.
pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacdError> {
    read_symbol(config)?;
    read_date_range(config)?;
    read_params(config)?;
    read_risk_free_rate(config)?;
    read_data_dir(config)?;
    Ok(())
}

fn missing(section: &str, key: &str) -> MacdError {
    MacdError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

/// `[backtest] symbol`, trimmed and uppercased.
pub fn read_symbol(config: &dyn ConfigPort) -> Result<String, MacdError> {
    let raw = config
        .get_string("backtest", "symbol")
        .ok_or_else(|| missing("backtest", "symbol"))?;
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(MacdError::config_invalid(
            "backtest",
            "symbol",
            "symbol must not be empty",
        ));
    }
    Ok(symbol)
}

pub fn read_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, MacdError> {
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| missing("backtest", key))?;
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        MacdError::config_invalid(
            "backtest",
            key,
            "invalid date format (expected YYYY-MM-DD)",
        )
    })
}

/// `start_date` and `end_date`, with `start_date < end_date`.
pub fn read_date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), MacdError> {
    let start = read_date(config, "start_date")?;
    let end = read_date(config, "end_date")?;
    if start >= end {
        return Err(MacdError::config_invalid(
            "backtest",
            "end_date",
            "end_date must be after start_date",
        ));
    }
    Ok((start, end))
}

fn read_span(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, MacdError> {
    match config.get_string("backtest", key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            MacdError::config_invalid(
                "backtest",
                key,
                format!("'{}' is not a positive integer", raw.trim()),
            )
        }),
    }
}

/// The three spans as written, falling back to 12/26/9. Not checked as a set.
pub fn read_spans(config: &dyn ConfigPort) -> Result<MacdParams, MacdError> {
    Ok(MacdParams {
        fast: read_span(config, "fast_span", DEFAULT_FAST)?,
        slow: read_span(config, "slow_span", DEFAULT_SLOW)?,
        signal: read_span(config, "signal_span", DEFAULT_SIGNAL)?,
    })
}

/// The three spans, validated as a set against their config keys.
pub fn read_params(config: &dyn ConfigPort) -> Result<MacdParams, MacdError> {
    let params = read_spans(config)?;
    params.validate().map_err(|e| match e {
        MacdError::InvalidParameter { name, reason } => {
            MacdError::config_invalid("backtest", &format!("{}_span", name), reason)
        }
        other => other,
    })?;
    Ok(params)
}

/// Daily risk-free rate in [0, 1), defaulting to `DAILY_RISK_FREE_RATE`.
pub fn read_risk_free_rate(config: &dyn ConfigPort) -> Result<f64, MacdError> {
    let Some(raw) = config.get_string("backtest", "risk_free_rate") else {
        return Ok(DAILY_RISK_FREE_RATE);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && (0.0..1.0).contains(&v) => Ok(v),
        _ => Err(MacdError::config_invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be a daily rate between 0 and 1",
        )),
    }
}

pub fn read_data_dir(config: &dyn ConfigPort) -> Result<PathBuf, MacdError> {
    match config.get_string("data", "dir") {
        Some(d) if !d.trim().is_empty() => Ok(PathBuf::from(d.trim())),
        _ => Err(missing("data", "dir")),
    }
}
