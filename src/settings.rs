//! Chart overlay settings.
//!
//! A chart's indicator controls boil down to a list of [`Overlay`]s. The
//! list loads from JSON (or compact keys such as `sma:50,bb:20:2`), can be
//! validated for the controls, and computes every overlay in one call.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    BbSeries, ConfigError, MacdSeries, Ohlcv, Series, StdDev, bollinger_bands, ema, macd, rsi,
    sma, stochastic,
};

fn default_std_dev() -> f64 {
    StdDev::default().value()
}

/// One indicator trace drawn on (or under) a price chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Sma {
        period: usize,
    },
    Ema {
        period: usize,
    },
    Rsi {
        period: usize,
    },
    /// Stochastic %K.
    Stochastic {
        period: usize,
    },
    /// MACD(12, 26, 9).
    Macd,
    Bollinger {
        period: usize,
        #[serde(default = "default_std_dev")]
        std_dev: f64,
    },
}

impl Overlay {
    /// Short indicator name, as used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sma { .. } => "SMA",
            Self::Ema { .. } => "EMA",
            Self::Rsi { .. } => "RSI",
            Self::Stochastic { .. } => "Stochastic",
            Self::Macd => "MACD",
            Self::Bollinger { .. } => "Bollinger Bands",
        }
    }

    /// Legend label, e.g. `SMA (50)` or `Bollinger Bands (20, 2)`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::Rsi { period }
            | Self::Stochastic { period } => {
                format!("{} ({period})", self.name())
            }
            Self::Macd => "MACD (12, 26, 9)".to_owned(),
            Self::Bollinger { period, std_dev } => {
                format!("{} ({period}, {std_dev})", self.name())
            }
        }
    }

    /// Checks the overlay's parameters.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroPeriod`] for a zero period and
    /// [`ConfigError::InvalidStdDev`] for a Bollinger multiplier that is not
    /// positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::Rsi { period }
            | Self::Stochastic { period }
                if period == 0 =>
            {
                Err(ConfigError::ZeroPeriod {
                    indicator: self.name(),
                })
            }
            Self::Bollinger { period: 0, .. } => Err(ConfigError::ZeroPeriod {
                indicator: self.name(),
            }),
            Self::Bollinger { std_dev, .. } => StdDev::try_new(std_dev).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Computes this overlay over `bars`.
    ///
    /// Never fails; an invalid overlay simply yields undefined entries.
    #[must_use]
    pub fn compute(&self, bars: &[impl Ohlcv]) -> OverlayOutput {
        match *self {
            Self::Sma { period } => OverlayOutput::Line(sma(bars, period)),
            Self::Ema { period } => OverlayOutput::Line(ema(bars, period)),
            Self::Rsi { period } => OverlayOutput::Line(rsi(bars, period)),
            Self::Stochastic { period } => OverlayOutput::Line(stochastic(bars, period)),
            Self::Macd => OverlayOutput::Macd(macd(bars)),
            Self::Bollinger { period, std_dev } => {
                OverlayOutput::Bands(bollinger_bands(bars, period, std_dev))
            }
        }
    }
}

impl Display for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma { period } => write!(f, "sma:{period}"),
            Self::Ema { period } => write!(f, "ema:{period}"),
            Self::Rsi { period } => write!(f, "rsi:{period}"),
            Self::Stochastic { period } => write!(f, "stoch:{period}"),
            Self::Macd => write!(f, "macd"),
            Self::Bollinger { period, std_dev } => write!(f, "bb:{period}:{std_dev}"),
        }
    }
}

impl FromStr for Overlay {
    type Err = ConfigError;

    /// Parses compact keys: `sma:50`, `ema:20`, `rsi:14`, `stoch:14`,
    /// `macd`, `bb:20` or `bb:20:2.5` (`bollinger` is accepted for `bb`,
    /// `stochastic` for `stoch`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let params: Vec<&str> = parts.collect();

        let overlay = match name.as_str() {
            "sma" => Self::Sma {
                period: single_period("SMA", &params)?,
            },
            "ema" => Self::Ema {
                period: single_period("EMA", &params)?,
            },
            "rsi" => Self::Rsi {
                period: single_period("RSI", &params)?,
            },
            "stoch" | "stochastic" => Self::Stochastic {
                period: single_period("Stochastic", &params)?,
            },
            "macd" if params.is_empty() => Self::Macd,
            "macd" => return Err(invalid("MACD", &params.join(":"))),
            "bb" | "bollinger" => match params.as_slice() {
                [period] => Self::Bollinger {
                    period: parse_period("Bollinger Bands", period)?,
                    std_dev: default_std_dev(),
                },
                [period, std_dev] => Self::Bollinger {
                    period: parse_period("Bollinger Bands", period)?,
                    std_dev: std_dev
                        .trim()
                        .parse()
                        .map_err(|_| invalid("Bollinger Bands", std_dev))?,
                },
                _ => return Err(invalid("Bollinger Bands", &params.join(":"))),
            },
            _ => return Err(ConfigError::UnknownIndicator(s.trim().to_owned())),
        };

        Ok(overlay)
    }
}

fn invalid(indicator: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        indicator,
        value: value.to_owned(),
    }
}

fn parse_period(indicator: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| invalid(indicator, value))
}

fn single_period(indicator: &'static str, params: &[&str]) -> Result<usize, ConfigError> {
    match params {
        [period] => parse_period(indicator, period),
        _ => Err(invalid(indicator, &params.join(":"))),
    }
}

/// Computed values of one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OverlayOutput {
    /// SMA, EMA, RSI and Stochastic.
    Line(Series),
    Macd(MacdSeries),
    Bands(BbSeries),
}

impl OverlayOutput {
    /// Number of entries; equals the number of input bars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Line(series) => series.len(),
            Self::Macd(lines) => lines.len(),
            Self::Bands(bands) => bands.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An overlay together with its computed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub overlay: Overlay,
    pub output: OverlayOutput,
}

/// The set of overlays a chart shows.
///
/// # Example
///
/// ```
/// use finpulse_ta::{ChartSettings, Overlay};
///
/// let settings: ChartSettings = "sma:3, rsi:2".parse().unwrap();
/// assert_eq!(settings.overlays()[0], Overlay::Sma { period: 3 });
///
/// let computed = settings.compute(&[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(computed.len(), 2);
/// assert_eq!(computed[0].output.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    overlays: Vec<Overlay>,
}

impl Default for ChartSettings {
    /// SMA 20, SMA 50, EMA 20, RSI 14, MACD, Bollinger 20/2.
    fn default() -> Self {
        Self {
            overlays: vec![
                Overlay::Sma { period: 20 },
                Overlay::Sma { period: 50 },
                Overlay::Ema { period: 20 },
                Overlay::Rsi { period: 14 },
                Overlay::Macd,
                Overlay::Bollinger {
                    period: 20,
                    std_dev: default_std_dev(),
                },
            ],
        }
    }
}

impl ChartSettings {
    #[must_use]
    pub fn new(overlays: Vec<Overlay>) -> Self {
        Self { overlays }
    }

    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Checks every overlay, in order.
    ///
    /// # Errors
    ///
    /// The first overlay error found; see [`Overlay::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.overlays.iter().try_for_each(Overlay::validate)
    }

    /// Computes every overlay over `bars`, in configuration order.
    #[must_use]
    pub fn compute(&self, bars: &[impl Ohlcv]) -> Vec<OverlaySeries> {
        trace!(
            overlays = self.overlays.len(),
            bars = bars.len(),
            "computing chart overlays"
        );

        self.overlays
            .iter()
            .map(|overlay| OverlaySeries {
                overlay: *overlay,
                output: overlay.compute(bars),
            })
            .collect()
    }
}

impl FromStr for ChartSettings {
    type Err = ConfigError;

    /// Comma-separated overlay keys; blank entries are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|key| !key.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl Display for ChartSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, overlay) in self.overlays.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{overlay}")?;
        }
        Ok(())
    }
}
