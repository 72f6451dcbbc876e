/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own candle type to avoid converting a whole
/// history before charting it. Indicators accept `&[impl Ohlcv]` and read
/// the configured [`PriceSource`](crate::PriceSource) from each bar.
///
/// A bare [`Price`] is an `Ohlcv` too: a flat bar where every field equals
/// the value. That lets a slice of closing prices go straight into the
/// engine.
///
/// # Example
///
/// ```
/// use finpulse_ta::{Ohlcv, Price};
///
/// struct Candle {
///     o: f64, h: f64, l: f64, c: f64,
/// }
///
/// impl Ohlcv for Candle {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
/// }
///
/// let candles: Vec<Candle> = [1.0, 2.0, 3.0]
///     .into_iter()
///     .map(|c| Candle { o: c, h: c + 1.0, l: c - 1.0, c })
///     .collect();
/// assert_eq!(finpulse_ta::sma(&candles, 3).get(2), Some(2.0));
///
/// // Plain closes work as well
/// assert_eq!(finpulse_ta::sma(&[1.0, 2.0, 3.0], 3).get(2), Some(2.0));
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `0.0`.
    ///
    /// None of the price indicators read volume.
    fn volume(&self) -> f64 {
        0.0
    }
}

impl Ohlcv for Price {
    #[inline]
    fn open(&self) -> Price {
        *self
    }

    #[inline]
    fn high(&self) -> Price {
        *self
    }

    #[inline]
    fn low(&self) -> Price {
        *self
    }

    #[inline]
    fn close(&self) -> Price {
        *self
    }
}

impl<T: Ohlcv + ?Sized> Ohlcv for &T {
    #[inline]
    fn open(&self) -> Price {
        (**self).open()
    }

    #[inline]
    fn high(&self) -> Price {
        (**self).high()
    }

    #[inline]
    fn low(&self) -> Price {
        (**self).low()
    }

    #[inline]
    fn close(&self) -> Price {
        (**self).close()
    }

    #[inline]
    fn volume(&self) -> f64 {
        (**self).volume()
    }
}
