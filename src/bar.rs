use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Ohlcv, Price};

/// One daily OHLCV sample from a historical price feed.
///
/// Serializes with the field names used by the market-data layer
/// (`date`, `open`, `high`, `low`, `close`, `volume`); the date is an ISO
/// `YYYY-MM-DD` string on the wire.
///
/// Bars are expected oldest first. Nothing here checks the order: callers
/// own ordering and gap filling.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use finpulse_ta::{Bar, Ohlcv};
///
/// let bar = Bar::new(
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     187.1, 189.4, 186.2, 188.9, 52_436_789.0,
/// );
/// assert_eq!(bar.close(), 188.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl Bar {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for Bar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.volume
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} O:{} H:{} L:{} C:{} V:{}",
            self.date, self.open, self.high, self.low, self.close, self.volume
        )
    }
}
