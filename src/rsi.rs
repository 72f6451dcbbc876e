use std::fmt::Display;

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    price_window::PriceWindow,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI needs `length` price changes, so output begins at bar
/// `length + 1` (index `length`).
///
/// # Example
///
/// ```
/// use finpulse_ta::{IndicatorConfig, RsiConfig};
///
/// let config = RsiConfig::close(14);
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.required_bars(), Some(15));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }

    #[inline]
    fn required_bars(&self) -> Option<usize> {
        if self.length == 0 {
            return None;
        }
        self.length.checked_add(1)
    }
}

impl RsiConfig {
    /// Number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: usize) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        let length = self.length.expect("length is required");

        RsiConfig {
            length,
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) over simple averages.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// Entry `i` looks at the `length` price changes ending at bar `i`. Gains
/// and losses are averaged with a plain mean over that window (no Wilder
/// smoothing, so each entry is independent of older windows):
///
/// ```text
/// avg_gain = Σ max(change, 0) / length
/// avg_loss = Σ max(−change, 0) / length
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// A window with gains and no losses is exactly 100. A flat window, with
/// neither, is exactly 50.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Rsi, RsiConfig};
///
/// let rsi = Rsi::new(RsiConfig::close(3));
/// let series = rsi.compute(&[10.0, 12.0, 11.0, 13.0]);
///
/// // Need 3 price changes (4 bars)
/// assert_eq!(series.get(2), None);
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// assert!((series.get(3).unwrap() - 80.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &RsiConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Series {
        rsi_of(&self.config.source.prices(bars), self.config.length)
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        if change.is_nan() {
            return (f64::NAN, f64::NAN);
        }

        (change.max(0.0), (-change).max(0.0))
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}

/// Relative strength index of closing prices over `period` changes.
///
/// Shorthand for `Rsi::new(RsiConfig::close(period)).compute(bars)`.
#[must_use]
pub fn rsi(bars: &[impl Ohlcv], period: usize) -> Series {
    Rsi::new(RsiConfig::close(period)).compute(bars)
}

pub(crate) fn rsi_of(prices: &[Price], period: usize) -> Series {
    if period == 0 || period > prices.len() {
        if !prices.is_empty() {
            debug!(period, bars = prices.len(), "RSI period outside input, series undefined");
        }
        return Series::undefined(prices.len());
    }

    let mut gains = PriceWindow::new(period);
    let mut losses = PriceWindow::new(period);

    let changes = prices.windows(2).map(|pair| {
        let (gain, loss) = Rsi::gain_and_loss(pair[0], pair[1]);
        gains.push(gain);
        losses.push(loss);

        match (gains.mean(), losses.mean()) {
            (Some(avg_gain), Some(avg_loss)) => Some(Rsi::rsi_from_averages(avg_gain, avg_loss)),
            _ => None,
        }
    });

    // The first bar has no previous price, hence no change.
    Series::from_values(std::iter::once(None).chain(changes))
}
