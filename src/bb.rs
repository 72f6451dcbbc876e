use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    Series, price_window::PriceWindow,
};

/// Standard deviation multiplier for Bollinger Bands.
///
/// Wraps a positive, finite `f64`; [`try_new`](StdDev::try_new) rejects
/// anything else. Defaults to `2.0` (the standard Bollinger Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct StdDev(f64);

impl StdDev {
    /// Creates a new standard deviation multiplier.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidStdDev`] if `value` is zero, negative, NaN or
    /// infinite.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidStdDev(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

impl TryFrom<f64> for StdDev {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Example
///
/// ```
/// use finpulse_ta::{BbConfig, IndicatorConfig, IndicatorConfigBuilder, StdDev};
///
/// // Default: length 20, close, 2.0 std devs
/// let config = BbConfig::default_20();
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.std_dev().value(), 2.0);
///
/// let wide = BbConfig::builder()
///     .length(20)
///     .std_dev(StdDev::try_new(2.5).unwrap())
///     .build();
/// assert_eq!(wide.std_dev().value(), 2.5);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    std_dev: StdDev,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
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

impl BbConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// BB(20, Close, 2σ), the standard Bollinger Bands setting.
    #[must_use]
    pub fn default_20() -> Self {
        Self::close(20)
    }

    /// BB with custom length, close price, 2σ.
    #[must_use]
    pub fn close(length: usize) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value()
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`],
/// `std_dev` = `2.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    std_dev: StdDev,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            std_dev: StdDev::default(),
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length.replace(length);
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> BbConfig {
        BbConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            std_dev: self.std_dev,
        }
    }
}

/// Bollinger Bands at a single bar: upper, middle, and lower bands.
///
/// The middle band is the SMA. Upper and lower bands are offset by
/// `std_dev × σ`, where `σ` is the population standard deviation of the window.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbValue {
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BbValue {
    /// Upper band: `SMA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: SMA of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `SMA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// The three band series, each aligned with the input bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BbSeries {
    upper: Series,
    middle: Series,
    lower: Series,
}

impl BbSeries {
    fn undefined(len: usize) -> Self {
        Self {
            upper: Series::undefined(len),
            middle: Series::undefined(len),
            lower: Series::undefined(len),
        }
    }

    #[inline]
    #[must_use]
    pub fn upper(&self) -> &Series {
        &self.upper
    }

    #[inline]
    #[must_use]
    pub fn middle(&self) -> &Series {
        &self.middle
    }

    #[inline]
    #[must_use]
    pub fn lower(&self) -> &Series {
        &self.lower
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// All three bands at `index`, if every band is defined there.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BbValue> {
        Some(BbValue {
            upper: self.upper.get(index)?,
            middle: self.middle.get(index)?,
            lower: self.lower.get(index)?,
        })
    }

    /// Bands at the last bar.
    #[must_use]
    pub fn latest(&self) -> Option<BbValue> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// `upper − lower` at every bar.
    #[must_use]
    pub fn width(&self) -> Series {
        self.upper.minus(&self.lower)
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// standard deviations.
///
/// σ is computed in two passes over each window (mean first, then mean
/// squared deviation), which stays exact for flat windows.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Bb, BbConfig};
///
/// let bb = Bb::new(BbConfig::close(2));
/// let bands = bb.compute(&[3.0, 5.0]);
///
/// // window [3, 5]: mean 4, σ 1, k 2
/// let value = bands.get(1).unwrap();
/// assert_eq!(value.upper(), 6.0);
/// assert_eq!(value.middle(), 4.0);
/// assert_eq!(value.lower(), 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &BbConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> BbSeries {
        bb_of(
            &self.config.source.prices(bars),
            self.config.length,
            self.config.std_dev.value(),
        )
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev.value(),
        )
    }
}

/// Bollinger Bands of closing prices.
///
/// `std_dev` is taken as given: zero collapses the bands onto the middle,
/// a negative value swaps them, and a non-finite value leaves the outer
/// bands undefined. Use [`BbConfig`] with [`StdDev`] for a validated
/// multiplier.
///
/// The conventional setting, 20 bars at 2 standard deviations, is
/// `bollinger_bands(bars, 20, 2.0)` or, as a config,
/// [`BbConfig::default_20`]:
///
/// ```
/// use finpulse_ta::{Bb, BbConfig, bollinger_bands};
///
/// let closes: Vec<f64> = (1..=30).map(f64::from).collect();
/// let defaulted = Bb::new(BbConfig::default_20()).compute(&closes);
///
/// assert_eq!(defaulted, bollinger_bands(&closes, 20, 2.0));
/// assert_eq!(defaulted.middle().first_defined(), Some(19));
/// ```
#[must_use]
pub fn bollinger_bands(bars: &[impl Ohlcv], period: usize, std_dev: f64) -> BbSeries {
    bb_of(&PriceSource::Close.prices(bars), period, std_dev)
}

pub(crate) fn bb_of(prices: &[Price], period: usize, multiplier: f64) -> BbSeries {
    if period == 0 || period > prices.len() {
        if !prices.is_empty() {
            debug!(period, bars = prices.len(), "BB period outside input, bands undefined");
        }
        return BbSeries::undefined(prices.len());
    }

    let mut window = PriceWindow::new(period);
    let mut upper = Vec::with_capacity(prices.len());
    let mut middle = Vec::with_capacity(prices.len());
    let mut lower = Vec::with_capacity(prices.len());

    for &price in prices {
        window.push(price);

        let bands = window.mean().and_then(|mean| {
            let sigma = window.variance(mean)?.sqrt();
            let offset = multiplier * sigma;
            Some((mean + offset, mean, mean - offset))
        });

        upper.push(bands.map(|b| b.0));
        middle.push(bands.map(|b| b.1));
        lower.push(bands.map(|b| b.2));
    }

    BbSeries {
        upper: Series::from(upper),
        middle: Series::from(middle),
        lower: Series::from(lower),
    }
}
