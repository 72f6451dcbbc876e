use crate::Price;
use std::collections::VecDeque;

/// Fixed-size window over the most recent prices of a forward pass.
///
/// Sums are taken over the window contents on demand rather than kept as a
/// running total, so every window's statistic is exact for that window and
/// independent of what was evicted before it.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    size: usize,
    window: VecDeque<Price>,
}

impl PriceWindow {
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "window size must be positive");

        Self {
            size,
            window: VecDeque::with_capacity(size),
        }
    }

    /// Appends `price`, evicting the oldest value once the window is full.
    #[inline]
    pub fn push(&mut self, price: Price) {
        if self.is_ready() {
            self.window.pop_front();
        }
        self.window.push_back(price);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.window.clear();
    }

    /// Sum of the window, oldest first. `None` until the window is full.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then(|| self.window.iter().sum())
    }

    /// Mean of the window. `None` until the window is full.
    #[inline]
    pub fn mean(&self) -> Option<Price> {
        #[allow(clippy::cast_precision_loss)]
        let size = self.size as f64;
        self.sum().map(|sum| sum / size)
    }

    /// Population variance around `mean`: squared deviations divided by
    /// the window size. `None` until the window is full.
    #[inline]
    pub fn variance(&self, mean: Price) -> Option<f64> {
        self.is_ready().then(|| {
            let squared: f64 = self
                .window
                .iter()
                .map(|price| {
                    let diff = price - mean;
                    diff * diff
                })
                .sum();

            #[allow(clippy::cast_precision_loss)]
            let size = self.size as f64;
            squared / size
        })
    }

    /// Highest value in the window. NaN if the window holds a NaN.
    #[inline]
    pub fn max(&self) -> Option<Price> {
        self.extreme(f64::max)
    }

    /// Lowest value in the window. NaN if the window holds a NaN.
    #[inline]
    pub fn min(&self) -> Option<Price> {
        self.extreme(f64::min)
    }

    fn extreme(&self, pick: fn(Price, Price) -> Price) -> Option<Price> {
        if !self.is_ready() {
            return None;
        }

        // f64::max and f64::min skip NaN operands; the window must not.
        self.window.iter().copied().reduce(|acc, price| {
            if acc.is_nan() || price.is_nan() {
                f64::NAN
            } else {
                pick(acc, price)
            }
        })
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}
