use crate::{Ohlcv, PriceSource};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (periods, price source, etc). Configs are value types: cheap to clone,
/// compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source to extract from each bar.
    fn source(&self) -> PriceSource;

    /// Number of bars needed before the first defined output.
    ///
    /// `None` when the configuration can never produce a value, e.g. a zero
    /// period.
    fn required_bars(&self) -> Option<usize>;
}

/// Builder for an [`IndicatorConfig`].
///
/// Period setters differ per indicator and live on the concrete builders.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A batch technical indicator.
///
/// Indicators are stateless: [`compute`](Indicator::compute) takes the whole
/// bar history and returns output aligned index-for-index with it. Entries
/// are undefined (`None`) until enough history exists, and the output never
/// depends on bars after its own index.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Indicator, Sma, SmaConfig};
///
/// let sma = Sma::new(SmaConfig::close(3));
/// let series = sma.compute(&[10.0, 20.0, 30.0, 40.0]);
///
/// assert_eq!(series.get(1), None);
/// assert_eq!(series.get(2), Some(20.0));
/// assert_eq!(series.get(3), Some(30.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. [`Series`](crate::Series) for single-line
    /// indicators, a struct of aligned series for composite ones (MACD,
    /// Bollinger Bands).
    type Output: Clone + Debug + PartialEq;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The configuration this indicator was created with.
    fn config(&self) -> &Self::Config;

    /// Computes the indicator over `bars`, oldest first.
    ///
    /// Never panics: empty input gives empty output, and degenerate
    /// configurations give all-undefined output of the input's length.
    fn compute(&self, bars: &[impl Ohlcv]) -> Self::Output;
}
