//! Performance metrics over a return series.
//!
//! `Metrics` keeps full precision; `PerformanceReport` is the rounded view
//! handed to callers.

use tracing::debug;

use crate::domain::error::MacdError;
use crate::domain::returns::ReturnSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Daily risk-free rate subtracted from strategy returns in the Sharpe ratio.
pub const DAILY_RISK_FREE_RATE: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub bars: usize,
    pub total_market_return: f64,
    pub total_strategy_return: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
}

impl Metrics {
    pub fn compute(returns: &ReturnSeries, daily_risk_free_rate: f64) -> Result<Self, MacdError> {
        if returns.is_empty() {
            return Err(MacdError::EmptyInput);
        }

        let market = returns.market_returns();
        let strategy = returns.strategy_returns();

        let sharpe_ratio = match sharpe_ratio(&strategy, daily_risk_free_rate) {
            Ok(value) => Some(value),
            Err(MacdError::Undefined { reason, .. }) => {
                debug!(%reason, "sharpe ratio undefined");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Metrics {
            bars: returns.len(),
            total_market_return: total_return(&market),
            total_strategy_return: total_return(&strategy),
            sharpe_ratio,
            max_drawdown: max_drawdown(&strategy),
        })
    }
}

/// Compounded return exp(Σ ln(1 + r)) - 1.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| r.ln_1p()).sum::<f64>().exp_m1()
}

/// Annualized Sharpe ratio of `returns` in excess of a daily risk-free rate,
/// using the sample standard deviation.
pub fn sharpe_ratio(returns: &[f64], daily_risk_free_rate: f64) -> Result<f64, MacdError> {
    let undefined = |reason: &str| MacdError::Undefined {
        statistic: "sharpe ratio".to_string(),
        reason: reason.to_string(),
    };

    if returns.len() < 2 {
        return Err(undefined("fewer than two returns"));
    }

    let excess: Vec<f64> = returns.iter().map(|r| r - daily_risk_free_rate).collect();
    if excess.iter().all(|&e| e == excess[0]) {
        return Err(undefined("excess returns have zero variance"));
    }

    let n = excess.len() as f64;
    let mean = excess.iter().sum::<f64>() / n;
    let variance = excess.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev == 0.0 || !stddev.is_finite() {
        return Err(undefined("excess returns have zero variance"));
    }

    Ok(TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev)
}

/// Most negative decline of the compounded equity curve from its running peak.
/// Zero or negative.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut equity = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for r in returns {
        equity *= 1.0 + r;
        peak = peak.max(equity);
        if peak > 0.0 {
            max_dd = max_dd.min((equity - peak) / peak);
        }
    }

    max_dd
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounded summary: percentages to 2 places, Sharpe to 3.
/// `sharpe_ratio` is `None` when the statistic is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReport {
    pub total_market_return_pct: f64,
    pub total_strategy_return_pct: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown_pct: f64,
}

impl PerformanceReport {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            total_market_return_pct: round_to(metrics.total_market_return * 100.0, 2),
            total_strategy_return_pct: round_to(metrics.total_strategy_return * 100.0, 2),
            sharpe_ratio: metrics.sharpe_ratio.map(|s| round_to(s, 3)),
            max_drawdown_pct: round_to(metrics.max_drawdown * 100.0, 2),
        }
    }

    /// The Sharpe ratio, or `Undefined` for callers that treat it as a hard failure.
    pub fn sharpe(&self) -> Result<f64, MacdError> {
        self.sharpe_ratio.ok_or_else(|| MacdError::Undefined {
            statistic: "sharpe ratio".to_string(),
            reason: "excess returns have zero variance".to_string(),
        })
    }
}

pub fn evaluate_performance(
    returns: &ReturnSeries,
    daily_risk_free_rate: f64,
) -> Result<PerformanceReport, MacdError> {
    let metrics = Metrics::compute(returns, daily_risk_free_rate)?;
    Ok(PerformanceReport::from_metrics(&metrics))
}
