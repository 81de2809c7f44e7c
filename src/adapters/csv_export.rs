//! Per-bar CSV export of a finished backtest.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacdError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct ExportRow {
    date: NaiveDate,
    close: f64,
    ema_fast: f64,
    ema_slow: f64,
    macd: f64,
    signal_line: f64,
    histogram: f64,
    buy: bool,
    sell: bool,
    position: u8,
    market_return: Option<f64>,
    strategy_return: Option<f64>,
}

pub struct CsvExportAdapter;

impl ReportPort for CsvExportAdapter {
    fn write(
        &self,
        result: &BacktestResult<'_>,
        _symbol: &str,
        output_path: &Path,
    ) -> Result<(), MacdError> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        for row in export_rows(result)? {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn export_rows(result: &BacktestResult<'_>) -> Result<Vec<ExportRow>, MacdError> {
    if result.indicators.len() != result.signals.len()
        || result.returns.len() + 1 != result.signals.len()
    {
        return Err(MacdError::Misaligned {
            reason: "export requires aligned indicator, signal and return series".to_string(),
        });
    }

    // returns start at bar 1
    let returns = std::iter::once(None).chain(result.returns.rows.iter().map(Some));

    Ok(result
        .indicators
        .rows
        .iter()
        .zip(&result.signals.rows)
        .zip(returns)
        .map(|((ind, sig), ret)| ExportRow {
            date: ind.date,
            close: ind.close,
            ema_fast: ind.ema_fast,
            ema_slow: ind.ema_slow,
            macd: ind.macd,
            signal_line: ind.signal_line,
            histogram: ind.histogram(),
            buy: sig.buy,
            sell: sig.sell,
            position: sig.position.as_u8(),
            market_return: ret.map(|r| r.market_return),
            strategy_return: ret.map(|r| r.strategy_return),
        })
        .collect())
}
