//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with MACD[0]
//!
//! Default parameters: fast=12, slow=26, signal=9

use std::fmt;

use tracing::debug;

use crate::domain::error::MacdError;
use crate::domain::indicator::{calculate_ema, IndicatorRow, IndicatorSeries};
use crate::domain::price::PriceSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdParams {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, MacdError> {
        let params = Self { fast, slow, signal };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), MacdError> {
        if self.fast < 1 {
            return Err(MacdError::invalid_parameter("fast", "span must be at least 1"));
        }
        if self.slow < 1 {
            return Err(MacdError::invalid_parameter("slow", "span must be at least 1"));
        }
        if self.signal < 1 {
            return Err(MacdError::invalid_parameter("signal", "span must be at least 1"));
        }
        if self.fast >= self.slow {
            return Err(MacdError::invalid_parameter(
                "fast",
                format!(
                    "fast span ({}) must be less than slow span ({})",
                    self.fast, self.slow
                ),
            ));
        }
        Ok(())
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl fmt::Display for MacdParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MACD({},{},{})", self.fast, self.slow, self.signal)
    }
}

/// Compute the indicator series for `prices`. Output has exactly one row per price.
pub fn calculate_macd(
    prices: &PriceSeries,
    params: &MacdParams,
) -> Result<IndicatorSeries, MacdError> {
    params.validate()?;
    if prices.is_empty() {
        return Err(MacdError::EmptyInput);
    }

    let closes = prices.closes();
    let ema_fast = calculate_ema(&closes, params.fast);
    let ema_slow = calculate_ema(&closes, params.slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal_line = calculate_ema(&macd_line, params.signal);

    let rows = prices
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            date: point.date,
            close: point.close,
            ema_fast: ema_fast[i],
            ema_slow: ema_slow[i],
            macd: macd_line[i],
            signal_line: signal_line[i],
        })
        .collect::<Vec<_>>();

    debug!(%params, rows = rows.len(), "computed indicator series");

    Ok(IndicatorSeries {
        params: *params,
        rows,
    })
}
