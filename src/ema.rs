use std::fmt::{Debug, Display};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    sma::sma_of,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use finpulse_ta::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder};
///
/// let config = EmaConfig::builder().length(20).build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_bars(), Some(20));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }

    #[inline]
    fn required_bars(&self) -> Option<usize> {
        (self.length > 0).then_some(self.length)
    }
}

impl EmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let length = self.length as f64;
        2.0 / (length + 1.0)
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: usize) -> Self {
        Self::builder().length(length).build()
    }

    /// EMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: usize) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the indicator window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices, with the standard smoothing factor `α = 2 / (length + 1)`:
///
/// ```text
/// EMA[length − 1] = SMA of the first `length` prices
/// EMA[i]          = (price[i] − EMA[i − 1]) × α + EMA[i − 1]
/// ```
///
/// The recurrence runs in a single forward pass. Entries before the seed
/// are undefined. A non-finite price leaves every later entry undefined,
/// since all of them depend on it.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Ema, EmaConfig};
///
/// let ema = Ema::new(EmaConfig::close(3));
/// let series = ema.compute(&[2.0, 4.0, 6.0, 8.0]);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(series.get(2), Some(4.0));
///
/// // EMA(3) α = 0.5: (8 − 4) × 0.5 + 4 = 6.0
/// assert_eq!(series.get(3), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &EmaConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Series {
        ema_of(&self.config.source.prices(bars), self.config.length)
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}

/// Exponential moving average of closing prices over `period` bars.
///
/// Shorthand for `Ema::new(EmaConfig::close(period)).compute(bars)`.
#[must_use]
pub fn ema(bars: &[impl Ohlcv], period: usize) -> Series {
    Ema::new(EmaConfig::close(period)).compute(bars)
}

pub(crate) fn ema_of(prices: &[Price], period: usize) -> Series {
    if period == 0 || period > prices.len() {
        if !prices.is_empty() {
            debug!(period, bars = prices.len(), "EMA period outside input, series undefined");
        }
        return Series::undefined(prices.len());
    }

    let alpha = EmaConfig::close(period).alpha();
    let mut values = vec![None; prices.len()];

    // Same window arithmetic as the SMA, so the seed matches SMA[period - 1].
    let mut previous = sma_of(&prices[..period], period).latest();
    values[period - 1] = previous;

    for (slot, &price) in values.iter_mut().zip(prices).skip(period) {
        previous = previous.map(|prev| alpha.mul_add(price - prev, prev));
        *slot = previous;
    }

    Series::from_values(values)
}
