//! Pipeline entry points: prices -> indicators -> signals -> returns -> metrics.
//!
//! BacktestConfig carries the parameters read from an INI file; the pipeline
//! functions themselves only need the spans and the risk-free rate.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::error::MacdError;
use crate::domain::indicator::{calculate_macd, IndicatorSeries, MacdParams};
use crate::domain::metrics::{Metrics, PerformanceReport, DAILY_RISK_FREE_RATE};
use crate::domain::price::PriceSeries;
use crate::domain::returns::{simulate_returns, ReturnSeries};
use crate::domain::signal::{generate_signals, SignalSeries};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub symbol: String,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub params: MacdParams,
    pub risk_free_rate: f64,
}

/// Every stage's output for one run. Borrows the caller's price series.
#[derive(Debug, Clone)]
pub struct BacktestResult<'a> {
    pub prices: &'a PriceSeries,
    pub indicators: IndicatorSeries,
    pub signals: SignalSeries,
    pub returns: ReturnSeries,
    pub metrics: Metrics,
    pub report: PerformanceReport,
}

impl BacktestResult<'_> {
    /// Number of entries (buy signals) taken.
    pub fn trades(&self) -> usize {
        self.signals.buy_count()
    }
}

pub fn run_backtest<'a>(
    prices: &'a PriceSeries,
    params: &MacdParams,
    daily_risk_free_rate: f64,
) -> Result<BacktestResult<'a>, MacdError> {
    let indicators = calculate_macd(prices, params)?;
    let signals = generate_signals(&indicators);
    let returns = simulate_returns(prices, &signals)?;
    let metrics = Metrics::compute(&returns, daily_risk_free_rate)?;
    let report = PerformanceReport::from_metrics(&metrics);

    info!(
        %params,
        bars = prices.len(),
        buys = signals.buy_count(),
        sells = signals.sell_count(),
        strategy_return_pct = report.total_strategy_return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        prices,
        indicators,
        signals,
        returns,
        metrics,
        report,
    })
}

/// Run the whole pipeline with the default daily risk-free rate.
pub fn run(
    prices: &PriceSeries,
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> Result<PerformanceReport, MacdError> {
    let params = MacdParams::new(fast_span, slow_span, signal_span)?;
    run_backtest(prices, &params, DAILY_RISK_FREE_RATE).map(|result| result.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            prices
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

    #[test]
    fn run_hand_computed_scenario() {
        let report = run(&make_series(&[100.0, 102.0, 101.0, 105.0, 103.0]), 2, 3, 2).unwrap();
        assert_eq!(report.total_market_return_pct, 3.0);
        assert_eq!(report.total_strategy_return_pct, -2.87);
        assert_eq!(report.max_drawdown_pct, -2.87);
        assert_eq!(report.sharpe_ratio, Some(-12.696));
    }

    #[test]
    fn run_backtest_keeps_stage_outputs() {
        let prices = make_series(&[100.0, 102.0, 101.0, 105.0, 103.0]);
        let params = MacdParams::new(2, 3, 2).unwrap();
        let result = run_backtest(&prices, &params, DAILY_RISK_FREE_RATE).unwrap();
        assert_eq!(result.indicators.len(), 5);
        assert_eq!(result.signals.len(), 5);
        assert_eq!(result.returns.len(), 4);
        assert_eq!(result.trades(), 2);
        assert_eq!(result.metrics.bars, 4);
    }

    #[test]
    fn run_rejects_bad_spans() {
        let prices = make_series(&[100.0, 101.0]);
        assert!(matches!(run(&prices, 26, 12, 9), Err(MacdError::InvalidParameter { .. })));
        assert!(matches!(run(&prices, 0, 12, 9), Err(MacdError::InvalidParameter { .. })));
    }

    #[test]
    fn run_empty_prices() {
        let prices = PriceSeries::new(vec![]).unwrap();
        assert!(matches!(run(&prices, 12, 26, 9), Err(MacdError::EmptyInput)));
    }

    #[test]
    fn run_single_price_has_no_returns() {
        // one bar yields indicators but no return rows to evaluate
        let prices = make_series(&[100.0]);
        assert!(matches!(run(&prices, 12, 26, 9), Err(MacdError::EmptyInput)));
    }

    #[test]
    fn custom_risk_free_rate_changes_sharpe_only() {
        let prices = make_series(&[100.0, 102.0, 101.0, 105.0, 103.0]);
        let params = MacdParams::new(2, 3, 2).unwrap();
        let a = run_backtest(&prices, &params, 0.0).unwrap().report;
        let b = run_backtest(&prices, &params, DAILY_RISK_FREE_RATE).unwrap().report;
        assert_eq!(a.total_strategy_return_pct, b.total_strategy_return_pct);
        assert_ne!(a.sharpe_ratio, b.sharpe_ratio);
    }
}
