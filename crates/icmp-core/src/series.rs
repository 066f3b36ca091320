//! Timestamp-indexed series
//!
//! A [`TimeSeries`] is the uniform abstraction every algorithm consumes: a
//! named value column indexed by strictly increasing timestamps. Sampling may
//! be irregular; nothing assumes a fixed interval.

use crate::{Error, Result};
use chrono::NaiveDateTime;
use num_traits::ToPrimitive;
use std::fmt;

/// Values that can act as an episode indicator.
///
/// Numeric values follow truthiness: anything non-zero is hot, which makes NaN
/// hot as well. Missing values (`None`) are never hot.
pub trait Indicator {
    fn is_hot(&self) -> bool;
}

impl Indicator for bool {
    fn is_hot(&self) -> bool {
        *self
    }
}

macro_rules! float_indicator {
    ($($t:ty),*) => {
        $(impl Indicator for $t {
            fn is_hot(&self) -> bool {
                *self != 0.0
            }
        })*
    };
}

macro_rules! int_indicator {
    ($($t:ty),*) => {
        $(impl Indicator for $t {
            fn is_hot(&self) -> bool {
                *self != 0
            }
        })*
    };
}

float_indicator!(f32, f64);
int_indicator!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl<T: Indicator> Indicator for Option<T> {
    fn is_hot(&self) -> bool {
        self.as_ref().is_some_and(Indicator::is_hot)
    }
}

/// Fail unless every timestamp is strictly greater than the one before it
pub fn ensure_strictly_increasing<I>(context: &str, timestamps: I) -> Result<()>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut previous: Option<NaiveDateTime> = None;
    for current in timestamps {
        if let Some(prev) = previous {
            if current <= prev {
                return Err(Error::unsorted(context, prev, current));
            }
        }
        previous = Some(current);
    }
    Ok(())
}

/// Named, strictly increasing timestamp-indexed series
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<V> {
    name: String,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<V>,
}

impl<V> TimeSeries<V> {
    /// Create a series from parallel columns.
    ///
    /// Fails with `InvalidInput` if the columns differ in length or the
    /// timestamps are not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        timestamps: Vec<NaiveDateTime>,
        values: Vec<V>,
    ) -> Result<Self> {
        let name = name.into();
        if timestamps.len() != values.len() {
            return Err(Error::InvalidInput(format!(
                "series {name:?} has {} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        ensure_strictly_increasing(&name, timestamps.iter().copied())?;
        Ok(Self {
            name,
            timestamps,
            values,
        })
    }

    /// Create a series from already ordered `(timestamp, value)` pairs
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDateTime, V)>,
    {
        let (timestamps, values) = pairs.into_iter().unzip();
        Self::new(name, timestamps, values)
    }

    /// Create a series from pairs in any order.
    ///
    /// Pairs are sorted by timestamp; duplicate timestamps are still rejected
    /// because there is no sound way to pick between them.
    pub fn from_unsorted<I>(name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDateTime, V)>,
    {
        let mut pairs: Vec<(NaiveDateTime, V)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(timestamp, _)| *timestamp);
        Self::from_pairs(name, pairs)
    }

    /// Empty series
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same data under a different name
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Iterate `(timestamp, value)` pairs in time order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, &V)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter())
    }

    /// Exact-match lookup; no interpolation between samples
    pub fn get(&self, timestamp: NaiveDateTime) -> Option<&V> {
        self.timestamps
            .binary_search(&timestamp)
            .ok()
            .map(|index| &self.values[index])
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    /// Derive a new series over the same index
    pub fn map<U, F>(&self, f: F) -> TimeSeries<U>
    where
        F: FnMut(&V) -> U,
    {
        TimeSeries {
            name: self.name.clone(),
            timestamps: self.timestamps.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Consume the series into its columns
    pub fn into_parts(self) -> (String, Vec<NaiveDateTime>, Vec<V>) {
        (self.name, self.timestamps, self.values)
    }
}

impl<V: Indicator> TimeSeries<V> {
    /// Timestamps where the indicator holds, in order
    pub fn hot_timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.iter()
            .filter(|(_, value)| value.is_hot())
            .map(|(timestamp, _)| timestamp)
    }
}

impl<V: ToPrimitive> TimeSeries<V> {
    /// Boolean mask `value > threshold`; missing or NaN values are never above
    pub fn above(&self, threshold: f64) -> TimeSeries<bool> {
        self.map(|value| value.to_f64().is_some_and(|v| v > threshold))
    }

    /// Boolean mask `value < threshold`; missing or NaN values are never below
    pub fn below(&self, threshold: f64) -> TimeSeries<bool> {
        self.map(|value| value.to_f64().is_some_and(|v| v < threshold))
    }
}

impl<V: fmt::Display> fmt::Display for TimeSeries<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TimeSeries {:?} ({} samples)", self.name, self.len())?;
        for (timestamp, value) in self.iter().take(10) {
            writeln!(f, "  {timestamp}  {value}")?;
        }
        if self.len() > 10 {
            writeln!(f, "  ...")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use proptest::prelude::*;

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_new_validates_order() {
        assert!(TimeSeries::new("icp", vec![t(0), t(1), t(2)], vec![1.0, 2.0, 3.0]).is_ok());

        let err = TimeSeries::new("icp", vec![t(0), t(2), t(1)], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = TimeSeries::new("icp", vec![t(0), t(0)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_new_validates_lengths() {
        let err = TimeSeries::new("icp", vec![t(0), t(1)], vec![1.0]).unwrap_err();
        assert!(err.to_string().contains("2 timestamps but 1 values"));
    }

    #[test]
    fn test_from_unsorted_sorts_but_rejects_duplicates() {
        let series =
            TimeSeries::from_unsorted("cpp", vec![(t(2), 3), (t(0), 1), (t(1), 2)]).unwrap();
        assert_eq!(series.timestamps(), &[t(0), t(1), t(2)]);
        assert_eq!(series.values(), &[1, 2, 3]);

        assert!(TimeSeries::from_unsorted("cpp", vec![(t(1), 1), (t(1), 2)]).is_err());
    }

    #[test]
    fn test_exact_lookup() {
        let series = TimeSeries::new("icp", vec![t(0), t(5)], vec![10.0, 20.0]).unwrap();
        assert_eq!(series.get(t(5)), Some(&20.0));
        assert_eq!(series.get(t(3)), None);
    }

    #[test]
    fn test_threshold_masks() {
        let series =
            TimeSeries::new("icp", vec![t(0), t(1), t(2), t(3)], vec![19.0, 20.0, 21.0, f64::NAN])
                .unwrap();
        assert_eq!(series.above(20.0).values(), &[false, false, true, false]);
        assert_eq!(series.below(20.0).values(), &[true, false, false, false]);
        assert_eq!(series.above(20.0).name(), "icp");
    }

    #[test]
    fn test_indicator_coercion() {
        assert!(1.5_f64.is_hot());
        assert!(f64::NAN.is_hot());
        assert!(!0.0_f64.is_hot());
        assert!(!0_i32.is_hot());
        assert!(Some(true).is_hot());
        assert!(!None::<bool>.is_hot());

        let series = TimeSeries::new("flag", vec![t(0), t(1), t(2)], vec![0, 3, 0]).unwrap();
        assert_eq!(series.hot_timestamps().collect::<Vec<_>>(), vec![t(1)]);
    }

    #[test]
    fn test_empty_series() {
        let series: TimeSeries<f64> = TimeSeries::empty("icp");
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);
        assert_eq!(series.renamed("cpp").name(), "cpp");
    }

    proptest! {
        #[test]
        fn prop_from_unsorted_orders_distinct_timestamps(
            offsets in proptest::collection::hash_set(0i64..10_000, 0..64)
        ) {
            let pairs: Vec<(NaiveDateTime, i64)> = offsets.iter().map(|m| (t(*m), *m)).collect();
            let series = TimeSeries::from_unsorted("icp", pairs).unwrap();

            prop_assert_eq!(series.len(), offsets.len());
            prop_assert!(series.timestamps().windows(2).all(|w| w[0] < w[1]));
            for (timestamp, value) in series.iter() {
                prop_assert_eq!(timestamp, t(*value));
            }
        }
    }
}
