//! Core traits for episode detection
//!
//! Detectors turn an indicator series into an [`EpisodeTable`]; their
//! parameters are swappable through [`ConfigurableDetector`].

use crate::types::EpisodeTable;
use icmp_core::{Indicator, Result, TimeSeries};
use num_traits::ToPrimitive;

/// Properties of a detector that don't depend on the input
pub trait EpisodeDetectorProperties {
    /// Get the name of the detection algorithm
    fn algorithm_name(&self) -> &'static str;
}

/// Detect episodes in an indicator series
pub trait EpisodeDetector<V: Indicator>: EpisodeDetectorProperties {
    /// Segment the timestamps where the indicator holds into episodes
    fn detect(&self, series: &TimeSeries<V>) -> Result<EpisodeTable>;
}

/// Detect episodes in a numeric series relative to a threshold
pub trait ThresholdDetector<V: ToPrimitive>: EpisodeDetectorProperties {
    /// Episodes where the value is strictly above `threshold`
    fn detect_above(&self, series: &TimeSeries<V>, threshold: f64) -> Result<EpisodeTable>;

    /// Episodes where the value is strictly below `threshold`
    fn detect_below(&self, series: &TimeSeries<V>, threshold: f64) -> Result<EpisodeTable>;
}

/// Parameter access for detectors
pub trait ConfigurableDetector {
    type Parameters;

    fn with_parameters(params: Self::Parameters) -> Result<Self>
    where
        Self: Sized;
    fn parameters(&self) -> &Self::Parameters;
    fn set_parameters(&mut self, params: Self::Parameters) -> Result<()>;
}
