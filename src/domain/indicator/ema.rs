//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first observation, then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! Defined from index 0: no warmup region.

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive EMA over `values`. Returns an empty vector for empty input or a zero span.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if span == 0 {
        return Vec::new();
    }

    let k = smoothing_factor(span);
    let mut ema = first;
    let mut out = Vec::with_capacity(values.len());
    out.push(ema);

    for &value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }

    out
}
