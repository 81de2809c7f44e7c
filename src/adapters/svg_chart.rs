//! SVG price chart with buy/sell markers.
//!
//! Reads close, buy and sell only; coordinate scaling is the sole arithmetic.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacdError;
use crate::domain::price::PriceSeries;
use crate::domain::signal::SignalSeries;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const PADDING: f64 = 50.0;
const MARKER: f64 = 7.0;

pub struct SvgChartAdapter;

impl ReportPort for SvgChartAdapter {
    fn write(
        &self,
        result: &BacktestResult<'_>,
        symbol: &str,
        output_path: &Path,
    ) -> Result<(), MacdError> {
        let svg = format_signal_chart(symbol, result.prices, &result.signals)?;
        fs::write(output_path, svg)?;
        Ok(())
    }
}

/// Escape text for use inside SVG element content or attribute values.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn triangle(x: f64, y: f64, up: bool) -> String {
    // up: apex above the base, as drawn under a buy bar
    let (tip, base) = if up { (y - MARKER, y + MARKER) } else { (y + MARKER, y - MARKER) };
    format!(
        "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
        x,
        tip,
        x - MARKER,
        base,
        x + MARKER,
        base
    )
}

pub fn format_signal_chart(
    symbol: &str,
    prices: &PriceSeries,
    signals: &SignalSeries,
) -> Result<String, MacdError> {
    if prices.len() != signals.len() {
        return Err(MacdError::Misaligned {
            reason: format!(
                "chart needs one signal per price: {} prices, {} signals",
                prices.len(),
                signals.len()
            ),
        });
    }

    let closes = prices.closes();
    let min_close = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max_close = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_close - min_close;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if closes.len() > 1 {
        plot_width / (closes.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |i: usize| PADDING + i as f64 * scale_x;
    let y_at = |close: f64| HEIGHT - PADDING - (close - min_close) * scale_y;

    let polyline = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| format!("{:.1},{:.1}", x_at(i), y_at(c)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut markers = String::new();
    for (i, (row, &close)) in signals.rows.iter().zip(&closes).enumerate() {
        let (x, y) = (x_at(i), y_at(close));
        let marker = if row.buy {
            Some(("buy", "green", "Buy", triangle(x, y + MARKER * 2.0, true)))
        } else if row.sell {
            Some(("sell", "red", "Sell", triangle(x, y - MARKER * 2.0, false)))
        } else {
            None
        };
        if let Some((class, fill, label, points)) = marker {
            markers.push_str(&format!(
                "  <polygon class=\"{}\" points=\"{}\" fill=\"{}\">\
                 <title>{} {} @ {:.2}</title></polygon>\n",
                class, points, fill, label, row.date, close
            ));
        }
    }

    let period = match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "no data".to_string(),
    };

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
  <rect width="100%" height="100%" fill="white"/>
  <text x="{w2:.0}" y="{title_y:.0}" text-anchor="middle" font-family="sans-serif" font-size="18">{symbol} - Buy/Sell Signals</text>
  <text x="{w2:.0}" y="{sub_y:.0}" text-anchor="middle" font-family="sans-serif" font-size="11" fill="gray">{period}</text>
  <line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{bottom:.0}" stroke="black"/>
  <line x1="{p:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="black"/>
  <text x="{label_x:.0}" y="{top_label:.0}" text-anchor="end" font-family="sans-serif" font-size="10">{max:.2}</text>
  <text x="{label_x:.0}" y="{bottom:.0}" text-anchor="end" font-family="sans-serif" font-size="10">{min:.2}</text>
  <polyline class="price" points="{polyline}" fill="none" stroke="steelblue" stroke-opacity="0.7" stroke-width="1.5"/>
{markers}  <g font-family="sans-serif" font-size="11">
    <line x1="{legend_x:.0}" y1="{l1:.0}" x2="{legend_x2:.0}" y2="{l1:.0}" stroke="steelblue" stroke-width="2"/>
    <text x="{legend_tx:.0}" y="{l1t:.0}">Price</text>
    <polygon points="{buy_icon}" fill="green"/>
    <text x="{legend_tx:.0}" y="{l2t:.0}">Buy Signal</text>
    <polygon points="{sell_icon}" fill="red"/>
    <text x="{legend_tx:.0}" y="{l3t:.0}">Sell Signal</text>
  </g>
</svg>
"#,
        symbol = escape_xml(symbol),
        w = WIDTH,
        h = HEIGHT,
        w2 = WIDTH / 2.0,
        title_y = PADDING / 2.0,
        sub_y = PADDING / 2.0 + 14.0,
        p = PADDING,
        bottom = HEIGHT - PADDING,
        right = WIDTH - PADDING,
        label_x = PADDING - 4.0,
        top_label = PADDING + 4.0,
        max = max_close,
        min = min_close,
        legend_x = PADDING + 10.0,
        legend_x2 = PADDING + 30.0,
        legend_tx = PADDING + 36.0,
        l1 = PADDING + 10.0,
        l1t = PADDING + 14.0,
        l2t = PADDING + 30.0,
        l3t = PADDING + 46.0,
        buy_icon = triangle(PADDING + 20.0, PADDING + 26.0, true),
        sell_icon = triangle(PADDING + 20.0, PADDING + 42.0, false),
    ))
}
