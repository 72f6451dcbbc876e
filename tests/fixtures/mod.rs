#![allow(dead_code)]

use chrono::NaiveDate;
use finpulse_ta::{Bar, Series};
use serde::{Deserialize, de::DeserializeOwned};

/// Reference value keyed by bar date.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub date: NaiveDate,
    pub expected: f64,
}

/// Reference Bollinger Bands keyed by bar date.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub date: NaiveDate,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference MACD lines keyed by bar date.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub date: NaiveDate,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

const BARS_PATH: &str = "tests/fixtures/data/bars-1d.csv";

/// Load the daily reference bars.
pub fn load_reference_bars() -> Vec<Bar> {
    load_records(BARS_PATH, "invalid bar record")
}

/// Load single-value reference data (SMA, EMA, RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load BB reference data (upper, middle, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Load MACD reference data (macd, signal, histogram).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Index of the bar dated `date`.
pub fn bar_index(bars: &[Bar], date: NaiveDate) -> usize {
    bars.iter()
        .position(|bar| bar.date == date)
        .unwrap_or_else(|| panic!("no bar dated {date}"))
}

/// Checks a series against date-keyed reference values.
///
/// Every reference date must be defined and within `tolerance`. Every
/// other bar must be undefined.
pub fn assert_series_matches(
    name: &str,
    bars: &[Bar],
    series: &Series,
    reference: &[RefValue],
    tolerance: f64,
) {
    assert_eq!(series.len(), bars.len(), "{name}: length mismatch");

    let mut expected = vec![None; bars.len()];
    for value in reference {
        expected[bar_index(bars, value.date)] = Some(value.expected);
    }

    for (i, (actual, expected)) in series.iter().zip(expected).enumerate() {
        match (actual, expected) {
            (Some(a), Some(e)) => {
                assert_near(a, e, tolerance, &format!("{name} at {}", bars[i].date));
            }
            (None, None) => {}
            (a, e) => panic!(
                "{name} definedness mismatch at {}: actual={a:?}, expected={e:?}",
                bars[i].date
            ),
        }
    }
}

/// Asserts two series agree entry by entry, both ways undefined included.
pub fn assert_same_entries(name: &str, prefix: &Series, full: &Series, tolerance: f64) {
    for (i, (p, f)) in prefix.iter().zip(full.iter()).enumerate() {
        match (p, f) {
            (Some(p), Some(f)) => assert_near(p, f, tolerance, &format!("{name} at bar {i}")),
            (None, None) => {}
            (p, f) => panic!("{name} diverged at bar {i}: prefix={p:?}, full={f:?}"),
        }
    }
}

/// Generate reference match + no-lookahead tests for a single-series indicator.
///
/// Usage: `reference_test!(sma_20, |bars| sma(bars, 20), "tests/fixtures/data/sma-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $compute:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            #[allow(unused_imports)]
            use finpulse_ta::*;

            fn compute(bars: &[Bar]) -> Series {
                let f: fn(&[Bar]) -> Series = $compute;
                f(bars)
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_bars();
                let reference = load_ref_values($ref_path);

                assert_series_matches(
                    stringify!($name),
                    &bars,
                    &compute(&bars),
                    &reference,
                    $tolerance,
                );
            }

            #[test]
            fn prefix_matches_full() {
                let bars = load_reference_bars();
                let full = compute(&bars);

                for end in [1, 13, 34, 60, bars.len() / 2, bars.len() - 1] {
                    let prefix = compute(&bars[..end]);
                    assert_eq!(prefix.len(), end);
                    assert_same_entries(stringify!($name), &prefix, &full, $tolerance);
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
