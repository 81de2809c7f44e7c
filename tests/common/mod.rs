#![allow(dead_code)]

use chrono::NaiveDate;
use macdtrader::domain::backtest::BacktestConfig;
use macdtrader::domain::error::MacdError;
use macdtrader::domain::indicator::MacdParams;
use macdtrader::domain::metrics::DAILY_RISK_FREE_RATE;
pub use macdtrader::domain::price::{PricePoint, PriceSeries};
use macdtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.data
            .insert(symbol.to_string(), make_series(closes).points().to_vec());
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacdError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MacdError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.date >= start_date && p.date < end_date)
            .collect();
        if points.is_empty() {
            return Err(MacdError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no rows".to_string(),
            });
        }
        PriceSeries::new(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacdError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdError> {
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => Ok(Some((
                points[0].date,
                points[points.len() - 1].date,
                points.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect(),
    )
    .unwrap()
}

pub fn sample_config(symbol: &str, params: MacdParams) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2025, 1, 1),
        params,
        risk_free_rate: DAILY_RISK_FREE_RATE,
    }
}

/// Closes 100, 102, 101, 105, 103: the worked MACD(2,3,2) example.
pub const WORKED_CLOSES: [f64; 5] = [100.0, 102.0, 101.0, 105.0, 103.0];
