//! Batch technical analysis indicators for price charts.
//!
//! Every indicator takes a slice of any type implementing [`Ohlcv`] and
//! returns a series aligned one-to-one with the input. Entries are `None`
//! until the indicator has seen enough bars, and wherever the arithmetic
//! would not produce a finite number. Computation never fails: bad
//! parameters yield an all-undefined series of the right length.
//!
//! The quickest way in is through the free functions:
//!
//! ```
//! use finpulse_ta::{bollinger_bands, ema, macd, rsi, sma};
//!
//! let closes: Vec<f64> = (1..=40).map(f64::from).collect();
//!
//! assert_eq!(sma(&closes, 20).get(19), Some(10.5));
//! assert!(ema(&closes, 20).get(18).is_none());
//! assert_eq!(rsi(&closes, 14).latest(), Some(100.0));
//! assert!(macd(&closes).latest().is_some());
//! assert_eq!(bollinger_bands(&closes, 20, 2.0).len(), 40);
//! ```
//!
//! Each indicator type ([`Sma`], [`Ema`], [`Rsi`], [`Macd`], [`Bb`],
//! [`Stoch`]) also exposes [`new`](Sma::new) and [`compute`](Sma::compute)
//! as inherent methods, with a config choosing the [`PriceSource`]. Import
//! [`Indicator`] only for generic code.
//!
//! [`ChartSettings`] and [`readings`] sit on top: the former computes a
//! configurable set of overlays, the latter summarizes the last bar.

mod bar;
mod bb;
mod ema;
mod error;
mod indicator;
mod macd;
mod ohlcv;
mod price_source;
mod price_window;
mod rsi;
mod series;
mod settings;
mod sma;
mod stoch;
mod summary;

pub use crate::bar::Bar;
pub use crate::error::ConfigError;
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price};
pub use crate::price_source::PriceSource;
pub use crate::series::Series;

pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbSeries, BbValue, StdDev, bollinger_bands};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, ema};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdSeries, MacdValue, macd};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, sma};
pub use crate::stoch::{Stoch, StochConfig, StochConfigBuilder, stochastic};

pub use crate::settings::{ChartSettings, Overlay, OverlayOutput, OverlaySeries};
pub use crate::summary::{Reading, Signal, readings};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[must_use]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> $output {
                <Self as Indicator>::compute(self, bars)
            }

            /// See [`Indicator::config`].
            #[must_use]
            #[inline]
            pub fn config(&self) -> &$config {
                <Self as Indicator>::config(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Series);
impl_indicator_methods!(Ema, EmaConfig, Series);
impl_indicator_methods!(Rsi, RsiConfig, Series);
impl_indicator_methods!(Macd, MacdConfig, MacdSeries);
impl_indicator_methods!(Bb, BbConfig, BbSeries);
impl_indicator_methods!(Stoch, StochConfig, Series);

#[cfg(test)]
mod test_util;
