//! MACD/signal-line crossover detection and position series.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::indicator::{IndicatorRow, IndicatorSeries};
use crate::domain::position::{derive_positions, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub buy: bool,
    pub sell: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.rows.iter().filter(|r| r.buy).count()
    }

    pub fn sell_count(&self) -> usize {
        self.rows.iter().filter(|r| r.sell).count()
    }

    pub fn final_position(&self) -> Position {
        self.rows.last().map(|r| r.position).unwrap_or_default()
    }
}

/// MACD crosses strictly above the signal line at `curr`.
pub fn crosses_above(prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    curr.macd > curr.signal_line && prev.macd <= prev.signal_line
}

/// MACD crosses strictly below the signal line at `curr`.
pub fn crosses_below(prev: &IndicatorRow, curr: &IndicatorRow) -> bool {
    curr.macd < curr.signal_line && prev.macd >= prev.signal_line
}

pub fn generate_signals(indicators: &IndicatorSeries) -> SignalSeries {
    let events: Vec<(bool, bool)> = indicators
        .rows
        .iter()
        .enumerate()
        .map(|(i, curr)| match i.checked_sub(1).map(|p| &indicators.rows[p]) {
            Some(prev) => (crosses_above(prev, curr), crosses_below(prev, curr)),
            None => (false, false),
        })
        .collect();
    let positions = derive_positions(&events);

    let rows = indicators
        .rows
        .iter()
        .zip(events)
        .zip(positions)
        .map(|((row, (buy, sell)), position)| SignalRow {
            date: row.date,
            buy,
            sell,
            position,
        })
        .collect();

    let series = SignalSeries { rows };
    debug!(
        rows = series.len(),
        buys = series.buy_count(),
        sells = series.sell_count(),
        "generated signals"
    );
    series
}
