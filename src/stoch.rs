use std::fmt::{Debug, Display};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    price_window::PriceWindow,
};

/// Configuration for the Stochastic Oscillator ([`Stoch`]) indicator.
///
/// The source is the price compared against the high-low range, normally
/// the close.
///
/// # Example
///
/// ```
/// use finpulse_ta::{IndicatorConfig, StochConfig};
///
/// let config = StochConfig::close(14);
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.required_bars(), Some(14));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for StochConfig {
    type Builder = StochConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        StochConfigBuilder::new()
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

impl StochConfig {
    /// Lookback for the highest high and lowest low.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// %K of the closing price.
    #[must_use]
    pub fn close(length: usize) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for StochConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StochConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`StochConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct StochConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl StochConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the lookback length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<StochConfig> for StochConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> StochConfig {
        StochConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Stochastic Oscillator, fast %K.
///
/// Where the price sits within the high-low range of the last `length`
/// bars, on a 0-100 scale:
///
/// ```text
/// %K = 100 × (price − lowest low) / (highest high − lowest low)
/// ```
///
/// A bar range of zero (every high and low equal) reads exactly 50, the
/// same midpoint a flat RSI window reads. The first `length - 1` entries
/// are undefined. No %D smoothing is applied.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Stoch, StochConfig};
///
/// let stoch = Stoch::new(StochConfig::close(3));
/// let series = stoch.compute(&[10.0, 14.0, 12.0]);
///
/// // range 10..14, close 12
/// assert_eq!(series.get(2), Some(50.0));
/// ```
#[derive(Clone, Debug)]
pub struct Stoch {
    config: StochConfig,
}

impl Indicator for Stoch {
    type Config = StochConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &StochConfig {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Series {
        stoch_of(bars, &self.config)
    }
}

impl Stoch {
    #[inline]
    fn percent_k(price: Price, highest: Price, lowest: Price) -> f64 {
        let range = highest - lowest;
        if range == 0.0 {
            50.0
        } else {
            100.0 * (price - lowest) / range
        }
    }
}

impl Display for Stoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STOCH({}, {})", self.config.length, self.config.source)
    }
}

/// Stochastic %K of closing prices over `period` bars.
///
/// Shorthand for `Stoch::new(StochConfig::close(period)).compute(bars)`.
#[must_use]
pub fn stochastic(bars: &[impl Ohlcv], period: usize) -> Series {
    Stoch::new(StochConfig::close(period)).compute(bars)
}

fn stoch_of(bars: &[impl Ohlcv], config: &StochConfig) -> Series {
    let period = config.length;
    if period == 0 || period > bars.len() {
        if !bars.is_empty() {
            debug!(period, bars = bars.len(), "Stochastic period outside input, series undefined");
        }
        return Series::undefined(bars.len());
    }

    let mut highs = PriceWindow::new(period);
    let mut lows = PriceWindow::new(period);

    Series::from_values(bars.iter().map(|bar| {
        highs.push(bar.high());
        lows.push(bar.low());

        let (highest, lowest) = (highs.max()?, lows.min()?);
        Some(Stoch::percent_k(config.source.extract(bar), highest, lowest))
    }))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Candle, assert_defined};

    fn candles(rows: &[(f64, f64, f64)]) -> Vec<Candle> {
        rows.iter()
            .map(|&(high, low, close)| Candle::new(close, high, low, close))
            .collect()
    }

    mod warm_up {
        use super::*;

        #[test]
        fn undefined_until_window_full() {
            let s = stochastic(&[1.0, 2.0, 3.0, 4.0], 3);
            assert_eq!(s.get(0), None);
            assert_eq!(s.get(1), None);
            assert_eq!(s.first_defined(), Some(2));
        }
    }

    mod values {
        use super::*;

        #[test]
        fn uses_highs_and_lows_of_the_window() {
            // highest high 12, lowest low 8, close 11 → 75
            let bars = candles(&[(10.0, 9.0, 9.5), (12.0, 8.0, 10.0), (11.0, 9.0, 11.0)]);
            assert_defined!(stochastic(&bars, 3).get(2), 75.0);
        }

        #[test]
        fn window_slides() {
            // a 2-bar window at bar 3 no longer holds the 8 low: range 9..13,
            // close 13 → 100
            let bars = candles(&[
                (10.0, 9.0, 9.5),
                (12.0, 8.0, 10.0),
                (11.0, 9.0, 11.0),
                (13.0, 10.0, 13.0),
            ]);
            assert_eq!(stochastic(&bars, 2).get(3), Some(100.0));
        }

        #[test]
        fn close_at_lowest_low_is_zero() {
            let bars = candles(&[(10.0, 6.0, 8.0), (9.0, 5.0, 5.0)]);
            assert_eq!(stochastic(&bars, 2).get(1), Some(0.0));
        }

        #[test]
        fn stays_within_bounds_for_closes_inside_bars() {
            let closes: Vec<f64> = (0..50).map(|i| 100.0 + f64::from(i % 7) * 1.5).collect();
            for v in stochastic(&closes, 14).iter().flatten() {
                assert!((0.0..=100.0).contains(&v), "%K out of range: {v}");
            }
        }

        #[test]
        fn custom_source() {
            // range 8..12, HL2 of last bar = 10 → 50
            let bars = candles(&[(12.0, 8.0, 9.0), (11.0, 9.0, 11.0)]);
            let config = StochConfig::builder()
                .length(2)
                .source(PriceSource::HL2)
                .build();
            assert_defined!(Stoch::new(config).compute(&bars).get(1), 50.0);
        }
    }

    mod degenerate {
        use super::*;

        #[test]
        fn zero_range_is_fifty() {
            let s = stochastic(&[7.0, 7.0, 7.0], 3);
            assert_eq!(s.get(2), Some(50.0));
        }

        #[test]
        fn nan_high_undefines_its_windows() {
            let bars = candles(&[
                (10.0, 9.0, 9.5),
                (f64::NAN, 8.0, 10.0),
                (11.0, 9.0, 11.0),
                (12.0, 10.0, 12.0),
            ]);
            let s = stochastic(&bars, 2);
            assert_eq!(s.get(1), None);
            assert_eq!(s.get(2), None);
            assert!(s.get(3).is_some());
        }

        #[test]
        fn empty_zero_and_oversized() {
            let bars: [f64; 0] = [];
            assert!(stochastic(&bars, 14).is_empty());

            for period in [0, 4] {
                let s = stochastic(&[1.0, 2.0, 3.0], period);
                assert_eq!(s.len(), 3);
                assert_eq!(s.defined_count(), 0);
            }
        }
    }

    mod config {
        use super::*;

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = StochConfig::builder().build();
        }

        #[test]
        fn display() {
            assert_eq!(StochConfig::close(14).to_string(), "StochConfig(14, Close)");
            assert_eq!(Stoch::new(StochConfig::close(14)).to_string(), "STOCH(14, Close)");
        }

        #[test]
        fn required_bars() {
            assert_eq!(StochConfig::close(0).required_bars(), None);
            assert_eq!(StochConfig::close(14).required_bars(), Some(14));
        }
    }
}
