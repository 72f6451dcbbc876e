use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{Price, price_window::PriceWindow};

/// A derived series aligned index-for-index with the input bars.
///
/// Each entry is either a defined value or `None` when the indicator cannot
/// be computed there (warm-up, degenerate period, non-finite arithmetic).
/// Chart layers should leave a gap at `None` rather than plot zero.
///
/// Serializes as a JSON array with `null` for undefined entries. Use
/// [`to_nan_vec`](Series::to_nan_vec) for consumers that expect the NaN
/// sentinel instead.
///
/// # Example
///
/// ```
/// let series = finpulse_ta::sma(&[1.0, 2.0, 3.0, 4.0], 3);
///
/// assert_eq!(series.len(), 4);
/// assert_eq!(series.get(1), None);
/// assert_eq!(series.get(3), Some(3.0));
/// assert_eq!(series.first_defined(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Option<Price>>);

impl Series {
    /// All-undefined series of `len` entries.
    #[must_use]
    pub(crate) fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Wraps raw values, turning non-finite results into undefined entries.
    pub(crate) fn from_values(values: impl IntoIterator<Item = Option<Price>>) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| v.filter(|v| v.is_finite()))
                .collect(),
        )
    }

    /// Number of entries, defined or not.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, or `None` if undefined or out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Price> {
        self.0.get(index).copied().flatten()
    }

    /// Value at the last index, the one a chart shows as "current".
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<Price> {
        self.0.last().copied().flatten()
    }

    /// Index of the first defined entry.
    #[must_use]
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    /// Number of defined entries.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Price>> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<Price>] {
        &self.0
    }

    /// Values with `NaN` standing in for undefined entries.
    #[must_use]
    pub fn to_nan_vec(&self) -> Vec<f64> {
        self.0.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }

    /// Pairwise `self[i] - other[i]`, defined where both sides are.
    #[must_use]
    pub fn minus(&self, other: &Series) -> Series {
        debug_assert_eq!(self.len(), other.len(), "series must be aligned");

        Series::from_values(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| Some((*a)? - (*b)?)),
        )
    }

    /// Simple moving average of this series over `period` entries.
    ///
    /// A window is defined only when every entry in it is defined, so the
    /// result starts `period - 1` entries after this series does.
    #[must_use]
    pub fn rolling_mean(&self, period: usize) -> Series {
        if period == 0 || period > self.len() {
            return Series::undefined(self.len());
        }

        let mut window = PriceWindow::new(period);

        Series::from_values(self.0.iter().map(|value| match value {
            Some(v) => {
                window.push(*v);
                window.mean()
            }
            None => {
                window.clear();
                None
            }
        }))
    }
}

impl Index<usize> for Series {
    type Output = Option<Price>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Option<Price>>> for Series {
    fn from(values: Vec<Option<Price>>) -> Self {
        Self::from_values(values)
    }
}

impl FromIterator<Option<Price>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<Price>>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl IntoIterator for Series {
    type Item = Option<Price>;
    type IntoIter = std::vec::IntoIter<Option<Price>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = Option<Price>;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Option<Price>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_defined;

    fn series(values: &[Option<f64>]) -> Series {
        Series::from(values.to_vec())
    }

    mod accessors {
        use super::*;

        #[test]
        fn get_out_of_range_is_none() {
            let s = series(&[Some(1.0)]);
            assert_eq!(s.get(5), None);
        }

        #[test]
        fn latest_reads_last_index_only() {
            let s = series(&[Some(1.0), None]);
            assert_eq!(s.latest(), None);
            let s = series(&[None, Some(2.0)]);
            assert_eq!(s.latest(), Some(2.0));
        }

        #[test]
        fn first_defined_and_count() {
            let s = series(&[None, None, Some(3.0), Some(4.0)]);
            assert_eq!(s.first_defined(), Some(2));
            assert_eq!(s.defined_count(), 2);
        }

        #[test]
        fn index_returns_raw_entry() {
            let s = series(&[None, Some(3.0)]);
            assert_eq!(s[0], None);
            assert_eq!(s[1], Some(3.0));
        }
    }

    mod sentinel {
        use super::*;

        #[test]
        fn non_finite_values_become_undefined() {
            let s = series(&[Some(f64::NAN), Some(f64::INFINITY), Some(1.0)]);
            assert_eq!(s.as_slice(), &[None, None, Some(1.0)]);
        }

        #[test]
        fn nan_vec_marks_gaps() {
            let v = series(&[None, Some(2.0)]).to_nan_vec();
            assert!(v[0].is_nan());
            assert!((v[1] - 2.0).abs() < f64::EPSILON);
        }

        #[test]
        fn serializes_undefined_as_null() {
            let s = series(&[None, Some(1.5)]);
            assert_eq!(serde_json::to_string(&s).unwrap(), "[null,1.5]");
        }
    }

    mod minus {
        use super::*;

        #[test]
        fn defined_where_both_defined() {
            let a = series(&[None, Some(5.0), Some(7.0)]);
            let b = series(&[Some(1.0), None, Some(2.0)]);
            assert_eq!(a.minus(&b).as_slice(), &[None, None, Some(5.0)]);
        }
    }

    mod rolling_mean {
        use super::*;

        #[test]
        fn starts_after_first_full_window() {
            let s = series(&[None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
            let mean = s.rolling_mean(2);
            assert_eq!(mean.get(0), None);
            assert_eq!(mean.get(1), None);
            assert_defined!(mean.get(2), 1.5);
            assert_defined!(mean.get(3), 2.5);
            assert_defined!(mean.get(4), 3.5);
        }

        #[test]
        fn gap_restarts_window() {
            let s = series(&[Some(1.0), Some(2.0), None, Some(4.0), Some(6.0)]);
            let mean = s.rolling_mean(2);
            assert_defined!(mean.get(1), 1.5);
            assert_eq!(mean.get(2), None);
            assert_eq!(mean.get(3), None);
            assert_defined!(mean.get(4), 5.0);
        }

        #[test]
        fn degenerate_period_is_all_undefined() {
            let s = series(&[Some(1.0), Some(2.0)]);
            assert_eq!(s.rolling_mean(0).defined_count(), 0);
            assert_eq!(s.rolling_mean(3).defined_count(), 0);
            assert_eq!(s.rolling_mean(3).len(), 2);
        }
    }
}
