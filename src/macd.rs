use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    ema::ema_of,
};

/// Configuration for the Moving Average Convergence Divergence ([`Macd`])
/// indicator.
///
/// Defaults to the classic 12/26/9 setting on closing prices.
///
/// # Example
///
/// ```
/// use finpulse_ta::{IndicatorConfig, MacdConfig};
///
/// let config = MacdConfig::default();
/// assert_eq!((config.fast(), config.slow(), config.signal()), (12, 26, 9));
///
/// // 26 bars for the slow EMA, then 8 more for the 9-value signal window
/// assert_eq!(config.required_bars(), Some(34));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }

    fn required_bars(&self) -> Option<usize> {
        if self.fast == 0 || self.slow == 0 || self.signal == 0 {
            return None;
        }
        (self.fast.max(self.slow) - 1).checked_add(self.signal)
    }
}

impl MacdConfig {
    /// Fast EMA period.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    /// Slow EMA period.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
    }

    /// Number of MACD values averaged into the signal line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9,
/// source = [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast(mut self, fast: usize) -> Self {
        self.fast = fast;
        self
    }

    #[inline]
    #[must_use]
    pub fn slow(mut self, slow: usize) -> Self {
        self.slow = slow;
        self
    }

    #[inline]
    #[must_use]
    pub fn signal(mut self, signal: usize) -> Self {
        self.signal = signal;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
            source: self.source,
        }
    }
}

/// MACD line, signal line and histogram at a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    macd: Price,
    signal: Price,
    histogram: Price,
}

impl MacdValue {
    /// `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Simple mean of the last `signal` MACD values.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.histogram
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(m: {}, s: {}, h: {})",
            self.macd, self.signal, self.histogram
        )
    }
}

/// MACD line, signal line and histogram, each aligned with the input bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    macd: Series,
    signal: Series,
    histogram: Series,
}

impl MacdSeries {
    #[inline]
    #[must_use]
    pub fn macd(&self) -> &Series {
        &self.macd
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> &Series {
        &self.signal
    }

    #[inline]
    #[must_use]
    pub fn histogram(&self) -> &Series {
        &self.histogram
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// All three lines at `index`, if the histogram is defined there.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MacdValue> {
        Some(MacdValue {
            macd: self.macd.get(index)?,
            signal: self.signal.get(index)?,
            histogram: self.histogram.get(index)?,
        })
    }

    /// Lines at the last bar.
    #[must_use]
    pub fn latest(&self) -> Option<MacdValue> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = SMA(signal) of macd
/// histogram = macd − signal
/// ```
///
/// The signal line is a *simple* average of the MACD line rather than the
/// textbook EMA. Charts built on this engine render that variant, so it is
/// kept as is.
///
/// With the default 12/26/9 setting the MACD line is defined from index 25
/// and the signal line and histogram from index 33.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Macd, MacdConfig};
///
/// let closes: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i)).collect();
/// let lines = Macd::new(MacdConfig::default()).compute(&closes);
///
/// assert_eq!(lines.macd().first_defined(), Some(25));
/// assert_eq!(lines.signal().first_defined(), Some(33));
/// assert_eq!(lines.histogram().first_defined(), Some(33));
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &MacdConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> MacdSeries {
        macd_of(&self.config.source.prices(bars), &self.config)
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}

/// MACD(12, 26, 9) of closing prices.
///
/// Shorthand for `Macd::new(MacdConfig::default()).compute(bars)`.
#[must_use]
pub fn macd(bars: &[impl Ohlcv]) -> MacdSeries {
    Macd::new(MacdConfig::default()).compute(bars)
}

fn macd_of(prices: &[Price], config: &MacdConfig) -> MacdSeries {
    let line = ema_of(prices, config.fast).minus(&ema_of(prices, config.slow));
    let signal = line.rolling_mean(config.signal);
    let histogram = line.minus(&signal);

    MacdSeries {
        macd: line,
        signal,
        histogram,
    }
}
