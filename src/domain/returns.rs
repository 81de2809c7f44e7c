//! Return simulation with a one-bar execution lag.
//!
//! market_return[t] = close[t] / close[t-1] - 1
//! strategy_return[t] = market_return[t] * position[t-1]
//!
//! Bar 0 has no prior close and is not emitted.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::MacdError;
use crate::domain::price::PriceSeries;
use crate::domain::signal::SignalSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub market_return: f64,
    pub strategy_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub rows: Vec<ReturnRow>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn market_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.market_return).collect()
    }

    pub fn strategy_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.strategy_return).collect()
    }
}

fn check_alignment(prices: &PriceSeries, signals: &SignalSeries) -> Result<(), MacdError> {
    if prices.len() != signals.len() {
        return Err(MacdError::Misaligned {
            reason: format!(
                "price series has {} rows, signal series has {}",
                prices.len(),
                signals.len()
            ),
        });
    }
    let mismatch = prices
        .points()
        .iter()
        .zip(&signals.rows)
        .position(|(p, s)| p.date != s.date);
    if let Some(i) = mismatch {
        return Err(MacdError::Misaligned {
            reason: format!(
                "row {}: price date {} != signal date {}",
                i,
                prices.points()[i].date,
                signals.rows[i].date
            ),
        });
    }
    Ok(())
}

pub fn simulate_returns(
    prices: &PriceSeries,
    signals: &SignalSeries,
) -> Result<ReturnSeries, MacdError> {
    check_alignment(prices, signals)?;

    let rows: Vec<ReturnRow> = prices
        .points()
        .windows(2)
        .zip(signals.rows.windows(2))
        .map(|(p, s)| {
            let market_return = p[1].close / p[0].close - 1.0;
            ReturnRow {
                date: p[1].date,
                market_return,
                strategy_return: market_return * s[0].position.exposure(),
            }
        })
        .collect();

    debug!(rows = rows.len(), "simulated returns");
    Ok(ReturnSeries { rows })
}
