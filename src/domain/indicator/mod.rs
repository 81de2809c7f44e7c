//! Indicator engine: recursive EMAs, MACD line and signal line.
//!
//! - `IndicatorRow`: one bar of derived indicator values
//! - `IndicatorSeries`: rows aligned one-to-one with the input price series

pub mod ema;
pub mod macd;

pub use ema::{calculate_ema, smoothing_factor};
pub use macd::{calculate_macd, MacdParams};

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub signal_line: f64,
}

impl IndicatorRow {
    /// MACD line minus signal line.
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal_line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub params: MacdParams,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_is_macd_minus_signal() {
        let row = IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            close: 100.0,
            ema_fast: 101.0,
            ema_slow: 100.5,
            macd: 0.5,
            signal_line: 0.2,
        };
        assert!((row.histogram() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn series_len() {
        let series = IndicatorSeries {
            params: MacdParams::default(),
            rows: Vec::new(),
        };
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }
}
