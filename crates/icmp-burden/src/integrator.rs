//! Trapezoidal burden over irregularly sampled trends
//!
//! Each consecutive pair `(t1, v1), (t2, v2)` contributes
//! `(v1 + v2) * hours(t2 - t1) / 2`, attributed to `t1`. Pairs spanning a
//! disconnection, or with a missing endpoint, contribute nothing.

use crate::parameters::BurdenParameters;
use chrono::NaiveDateTime;
use icmp_core::duration::hours;
use icmp_core::{Result, TimeSeries};
use num_traits::ToPrimitive;
use std::fmt;
use tracing::{debug, instrument};

/// Burden values attributed to the first sample of each pair
#[derive(Debug, Clone, PartialEq)]
pub struct BurdenSeries {
    series: TimeSeries<Option<f64>>,
}

impl BurdenSeries {
    /// Series named `<source>_burden` over the source index minus its last point
    pub fn series(&self) -> &TimeSeries<Option<f64>> {
        &self.series
    }

    pub fn name(&self) -> &str {
        self.series.name()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, timestamp: NaiveDateTime) -> Option<f64> {
        self.series.get(timestamp).copied().flatten()
    }

    /// Sum of all computed values; pairs without a value add nothing
    pub fn total(&self) -> f64 {
        self.series.values().iter().flatten().sum()
    }

    /// Number of pairs that produced a value
    pub fn valid_count(&self) -> usize {
        self.series.values().iter().flatten().count()
    }

    pub fn into_series(self) -> TimeSeries<Option<f64>> {
        self.series
    }
}

impl fmt::Display for BurdenSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: total {:.4} over {} of {} intervals",
            self.name(),
            self.total(),
            self.valid_count(),
            self.len()
        )
    }
}

/// Trapezoidal burden integrator
#[derive(Debug, Clone, Default)]
pub struct BurdenIntegrator {
    params: BurdenParameters,
}

impl BurdenIntegrator {
    pub fn new(params: BurdenParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &BurdenParameters {
        &self.params
    }

    /// Integrate a numeric series.
    ///
    /// A series with fewer than two samples yields an empty result.
    #[instrument(level = "debug", skip_all, fields(series = series.name(), samples = series.len()))]
    pub fn integrate<V: ToPrimitive>(&self, series: &TimeSeries<V>) -> Result<BurdenSeries> {
        let curve: Vec<Option<f64>> = series
            .values()
            .iter()
            .map(|value| value.to_f64().and_then(|v| self.params.curve(v)))
            .collect();

        let timestamps = series.timestamps();
        let mut disconnections = 0usize;
        let values: Vec<Option<f64>> = timestamps
            .windows(2)
            .zip(curve.windows(2))
            .map(|(times, values)| {
                let dt = times[1] - times[0];
                if dt >= self.params.continuity_limit {
                    disconnections += 1;
                    return None;
                }
                match (values[0], values[1]) {
                    (Some(v1), Some(v2)) => Some((v1 + v2) * hours(dt) / 2.0),
                    _ => None,
                }
            })
            .collect();

        let index = timestamps[..timestamps.len().saturating_sub(1)].to_vec();
        let series = TimeSeries::new(format!("{}_burden", series.name()), index, values)?;
        let burden = BurdenSeries { series };
        debug!(
            valid = burden.valid_count(),
            disconnections,
            total = burden.total(),
            "integrated burden"
        );
        Ok(burden)
    }
}

/// Integrate burden directly on a series
pub trait BurdenExt {
    fn burden(&self, params: BurdenParameters) -> Result<BurdenSeries>;
}

impl<V: ToPrimitive> BurdenExt for TimeSeries<V> {
    fn burden(&self, params: BurdenParameters) -> Result<BurdenSeries> {
        BurdenIntegrator::new(params)?.integrate(self)
    }
}
