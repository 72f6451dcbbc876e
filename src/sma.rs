use std::fmt::{Debug, Display};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    price_window::PriceWindow,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use finpulse_ta::{IndicatorConfig, SmaConfig};
///
/// let config = SmaConfig::close(20);
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_bars(), Some(20));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
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

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: usize) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: usize) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// SMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: usize) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the window length. Zero is accepted and yields an
    /// all-undefined series.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple Moving Average (SMA).
///
/// Entry `i` is the unweighted mean of the `length` values ending at bar
/// `i`. The first `length - 1` entries are undefined. A zero length, or a
/// length longer than the input, leaves every entry undefined.
///
/// # Example
///
/// ```rust
/// use finpulse_ta::{Sma, SmaConfig};
///
/// let sma = Sma::new(SmaConfig::close(3));
/// let series = sma.compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
///
/// assert_eq!(series.as_slice(), &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &SmaConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Series {
        sma_of(&self.config.source.prices(bars), self.config.length)
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

/// Simple moving average of closing prices over `period` bars.
///
/// Shorthand for `Sma::new(SmaConfig::close(period)).compute(bars)`.
#[must_use]
pub fn sma(bars: &[impl Ohlcv], period: usize) -> Series {
    Sma::new(SmaConfig::close(period)).compute(bars)
}

pub(crate) fn sma_of(prices: &[Price], period: usize) -> Series {
    if period == 0 || period > prices.len() {
        if !prices.is_empty() {
            debug!(period, bars = prices.len(), "SMA period outside input, series undefined");
        }
        return Series::undefined(prices.len());
    }

    let mut window = PriceWindow::new(period);

    Series::from_values(prices.iter().map(|&price| {
        window.push(price);
        window.mean()
    }))
}
