//! Last-bar readings for an indicator summary panel.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Ohlcv, Price, bollinger_bands, ema, macd, rsi, sma, stochastic};

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;

/// Direction an indicator reading points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Neutral => "neutral",
        })
    }
}

/// One row of the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub name: String,
    /// Indicator value at the last bar, `None` when undefined there.
    pub value: Option<Price>,
    pub signal: Signal,
    pub description: String,
}

impl Reading {
    fn new(name: &str, value: Option<Price>, signal: Signal, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            value,
            signal,
            description: description.to_owned(),
        }
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}: {value:.2} ({})", self.name, self.signal),
            None => write!(f, "{}: n/a ({})", self.name, self.signal),
        }
    }
}

/// Buy below `low`, sell above `high`, neutral otherwise or when undefined.
fn band_signal(value: Option<Price>, low: Option<Price>, high: Option<Price>) -> Signal {
    match (value, low, high) {
        (Some(v), Some(low), _) if v < low => Signal::Buy,
        (Some(v), _, Some(high)) if v > high => Signal::Sell,
        _ => Signal::Neutral,
    }
}

/// Buy when `value` is above `reference`, sell when below.
fn trend_signal(value: Option<Price>, reference: Option<Price>) -> Signal {
    match (value, reference) {
        (Some(v), Some(r)) if v > r => Signal::Buy,
        (Some(v), Some(r)) if v < r => Signal::Sell,
        _ => Signal::Neutral,
    }
}

/// Summarizes the last bar of `bars` with the standard indicator set.
///
/// Readings come in a fixed order: RSI(14), MACD(12, 26, 9), SMA(50),
/// EMA(20), Bollinger Bands(20, 2) and Stochastic %K(14). An indicator
/// that is undefined at the last bar (or empty input) reads `None` with a
/// neutral signal.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Signal, readings};
///
/// let closes: Vec<f64> = (1..=60).map(f64::from).collect();
/// let summary = readings(&closes);
///
/// assert_eq!(summary[0].name, "RSI (14)");
/// assert_eq!(summary[0].value, Some(100.0));
/// assert_eq!(summary[0].signal, Signal::Sell);
/// ```
#[must_use]
pub fn readings(bars: &[impl Ohlcv]) -> Vec<Reading> {
    trace!(bars = bars.len(), "computing indicator readings");

    let close = bars.last().map(Ohlcv::close);

    let rsi = rsi(bars, 14).latest();
    let lines = macd(bars);
    let histogram = lines.histogram().latest();
    let sma = sma(bars, 50).latest();
    let ema = ema(bars, 20).latest();
    let bands = bollinger_bands(bars, 20, 2.0);
    let stoch = stochastic(bars, 14).latest();

    vec![
        Reading::new(
            "RSI (14)",
            rsi,
            band_signal(rsi, Some(RSI_OVERSOLD), Some(RSI_OVERBOUGHT)),
            "Momentum oscillator; below 30 is oversold, above 70 overbought",
        ),
        Reading::new(
            "MACD",
            lines.macd().latest(),
            trend_signal(histogram, Some(0.0)),
            "Trend momentum; histogram above zero is bullish",
        ),
        Reading::new(
            "SMA (50)",
            sma,
            trend_signal(close, sma),
            "Medium-term trend; price above the average is bullish",
        ),
        Reading::new(
            "EMA (20)",
            ema,
            trend_signal(close, ema),
            "Short-term trend weighted to recent prices",
        ),
        Reading::new(
            "Bollinger Bands",
            bands.middle().latest(),
            band_signal(close, bands.lower().latest(), bands.upper().latest()),
            "Volatility bands; price outside a band may revert",
        ),
        Reading::new(
            "Stochastic Oscillator",
            stoch,
            band_signal(stoch, Some(STOCH_OVERSOLD), Some(STOCH_OVERBOUGHT)),
            "Close against the 14-bar range; below 20 is oversold, above 80 overbought",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Candle;

    fn names(readings: &[Reading]) -> Vec<&str> {
        readings.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn fixed_order() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        assert_eq!(
            names(&readings(&closes)),
            [
                "RSI (14)",
                "MACD",
                "SMA (50)",
                "EMA (20)",
                "Bollinger Bands",
                "Stochastic Oscillator"
            ]
        );
    }

    #[test]
    fn empty_input_is_all_neutral() {
        let bars: [f64; 0] = [];
        let summary = readings(&bars);
        assert_eq!(summary.len(), 6);
        for reading in &summary {
            assert_eq!(reading.value, None);
            assert_eq!(reading.signal, Signal::Neutral);
        }
    }

    #[test]
    fn short_input_leaves_long_indicators_undefined() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let summary = readings(&closes);
        assert!(summary[0].value.is_some());
        // MACD line starts at bar 26, but the histogram needs bar 34
        assert!(summary[1].value.is_some());
        assert_eq!(summary[1].signal, Signal::Neutral);
        assert_eq!(summary[2].value, None);
        assert_eq!(summary[2].signal, Signal::Neutral);
    }

    #[test]
    fn uptrend_signals() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        let summary = readings(&closes);

        assert_eq!(summary[0].signal, Signal::Sell);
        assert_eq!(summary[2].signal, Signal::Buy);
        assert_eq!(summary[3].signal, Signal::Buy);
        // Linear prices sit inside the bands
        assert_eq!(summary[4].signal, Signal::Neutral);
        // Close at the top of its range
        assert_eq!(summary[5].value, Some(100.0));
        assert_eq!(summary[5].signal, Signal::Sell);
    }

    #[test]
    fn downtrend_signals() {
        let closes: Vec<f64> = (1..=60).rev().map(f64::from).collect();
        let summary = readings(&closes);

        assert_eq!(summary[0].value, Some(0.0));
        assert_eq!(summary[0].signal, Signal::Buy);
        assert_eq!(summary[2].signal, Signal::Sell);
        assert_eq!(summary[3].signal, Signal::Sell);
        assert_eq!(summary[5].value, Some(0.0));
        assert_eq!(summary[5].signal, Signal::Buy);
    }

    #[test]
    fn flat_prices_are_neutral() {
        let summary = readings(&[100.0; 60]);
        for reading in &summary {
            assert_eq!(reading.signal, Signal::Neutral, "{reading}");
        }
        assert_eq!(summary[0].value, Some(50.0));
        assert_eq!(summary[5].value, Some(50.0));
    }

    #[test]
    fn stochastic_uses_bar_ranges() {
        // Flat closes, but the last close sits in the lower quarter of the
        // 14-bar high-low range.
        let bars: Vec<Candle> = (0..20)
            .map(|_| Candle::new(100.0, 104.0, 96.0, 100.0))
            .chain(std::iter::once(Candle::new(100.0, 104.0, 96.0, 97.0)))
            .collect();
        let stoch = &readings(&bars)[5];

        assert_eq!(stoch.name, "Stochastic Oscillator");
        assert_eq!(stoch.value, Some(12.5));
        assert_eq!(stoch.signal, Signal::Buy);
    }

    #[test]
    fn breakout_above_upper_band_sells() {
        let mut closes = vec![100.0; 59];
        closes.push(150.0);
        let summary = readings(&closes);
        assert_eq!(summary[4].value.map(f64::round), Some(103.0));
        assert_eq!(summary[4].signal, Signal::Sell);
    }

    #[test]
    fn band_signal_thresholds() {
        assert_eq!(band_signal(Some(29.9), Some(30.0), Some(70.0)), Signal::Buy);
        assert_eq!(band_signal(Some(30.0), Some(30.0), Some(70.0)), Signal::Neutral);
        assert_eq!(band_signal(Some(70.1), Some(30.0), Some(70.0)), Signal::Sell);
        assert_eq!(band_signal(None, Some(30.0), Some(70.0)), Signal::Neutral);
        assert_eq!(band_signal(Some(10.0), None, None), Signal::Neutral);
    }

    #[test]
    fn display() {
        let reading = Reading::new("SMA (50)", Some(101.234), Signal::Buy, "");
        assert_eq!(reading.to_string(), "SMA (50): 101.23 (buy)");
        let reading = Reading::new("MACD", None, Signal::Neutral, "");
        assert_eq!(reading.to_string(), "MACD: n/a (neutral)");
    }

    #[test]
    fn serializes_signal_lowercase() {
        let json = serde_json::to_string(&Signal::Buy).unwrap();
        assert_eq!(json, r#""buy""#);
    }
}
