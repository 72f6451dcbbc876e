// src/test_util.rs

use crate::{Ohlcv, Price};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Asserts that a series entry is defined and within `1e-10` of `expected`.
macro_rules! assert_defined {
    ($value:expr, $expected:expr) => {{
        let (v, e): (Option<f64>, f64) = ($value, $expected);
        let v = v.unwrap_or_else(|| panic!("expected Some({e}), got None"));
        assert!(
            (v - e).abs() < 1e-10,
            "assert_defined failed: actual={v}, expected={e}"
        );
    }};
}

pub(crate) use assert_defined;

pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }
}

impl Ohlcv for Candle {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
}

/// Candles that only carry a close (OHLC all equal to close).
pub fn closes(values: &[f64]) -> Vec<Candle> {
    values
        .iter()
        .map(|&c| Candle::new(c, c, c, c))
        .collect()
}
