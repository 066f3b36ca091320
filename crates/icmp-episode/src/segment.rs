//! Gap-tolerant episode segmentation
//!
//! Hot timestamps closer together than `max_gap` are merged into one
//! episode; a gap of `max_gap` or more starts a new one. Episodes that do not
//! last strictly longer than `min_duration` are dropped afterwards.

use crate::traits::{
    ConfigurableDetector, EpisodeDetector, EpisodeDetectorProperties, ThresholdDetector,
};
use crate::types::{Episode, EpisodeTable};
use chrono::{NaiveDateTime, TimeDelta};
use icmp_core::duration::parse_duration;
use icmp_core::{AnalysisConfig, Error, Indicator, Result, TimeSeries};
use num_traits::ToPrimitive;
use tracing::{debug, instrument};

/// Segmentation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterParameters {
    /// Consecutive hot samples at least this far apart split an episode
    pub max_gap: TimeDelta,
    /// Episodes must last strictly longer than this; `None` or zero keeps all
    pub min_duration: Option<TimeDelta>,
}

impl Default for SegmenterParameters {
    fn default() -> Self {
        Self {
            max_gap: TimeDelta::minutes(5),
            min_duration: Some(TimeDelta::minutes(5)),
        }
    }
}

impl SegmenterParameters {
    /// Keep every episode regardless of length
    pub fn unfiltered(max_gap: TimeDelta) -> Self {
        Self {
            max_gap,
            min_duration: None,
        }
    }

    /// Parse duration strings such as `"5min"`
    pub fn parse(max_gap: &str, min_duration: Option<&str>) -> Result<Self> {
        let params = Self {
            max_gap: parse_duration(max_gap)?,
            min_duration: min_duration.map(parse_duration).transpose()?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_gap: config.max_gap,
            min_duration: config.min_duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_gap <= TimeDelta::zero() {
            return Err(Error::InvalidParameter(format!(
                "max_gap must be positive, got {}",
                self.max_gap
            )));
        }
        if let Some(min) = self.min_duration {
            if min < TimeDelta::zero() {
                return Err(Error::InvalidParameter(format!(
                    "min_duration must not be negative, got {min}"
                )));
            }
        }
        Ok(())
    }
}

/// Gap-tolerant segmenter over hot timestamps
#[derive(Debug, Clone)]
pub struct EpisodeSegmenter {
    params: SegmenterParameters,
}

impl Default for EpisodeSegmenter {
    fn default() -> Self {
        Self {
            params: SegmenterParameters::default(),
        }
    }
}

impl EpisodeSegmenter {
    /// Create a segmenter; fails on a non-positive `max_gap` or negative `min_duration`
    pub fn new(params: SegmenterParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Segment an ordered sequence of hot timestamps.
    ///
    /// An empty sequence yields an empty table. Timestamps that fail to
    /// strictly increase are rejected with `InvalidInput`.
    #[instrument(level = "debug", skip_all, fields(max_gap = %self.params.max_gap))]
    pub fn segment_timestamps<I>(&self, hot: I) -> Result<EpisodeTable>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut hot = hot.into_iter();
        let Some(first) = hot.next() else {
            debug!("no hot samples");
            return Ok(EpisodeTable::default());
        };

        let mut episodes = Vec::new();
        let mut start = first;
        let mut last = first;
        let mut samples = 1usize;

        for current in hot {
            if current <= last {
                return Err(Error::unsorted("hot", last, current));
            }
            if current - last >= self.params.max_gap {
                episodes.push(Episode::spanning(start, last));
                start = current;
            }
            last = current;
            samples += 1;
        }
        // the last hot sample always closes the open episode
        episodes.push(Episode::spanning(start, last));

        let raw = episodes.len();
        if let Some(min) = self.params.min_duration.filter(|min| *min > TimeDelta::zero()) {
            episodes.retain(|episode| episode.duration() > min);
        }
        debug!(
            samples,
            raw,
            kept = episodes.len(),
            "segmented hot samples into episodes"
        );

        Ok(EpisodeTable::from_ordered(episodes))
    }

    /// Segment an indicator series
    pub fn segment<V: Indicator>(&self, series: &TimeSeries<V>) -> Result<EpisodeTable> {
        self.segment_timestamps(series.hot_timestamps())
    }
}

impl EpisodeDetectorProperties for EpisodeSegmenter {
    fn algorithm_name(&self) -> &'static str {
        "GapTolerantSegmenter"
    }
}

impl<V: Indicator> EpisodeDetector<V> for EpisodeSegmenter {
    fn detect(&self, series: &TimeSeries<V>) -> Result<EpisodeTable> {
        self.segment(series)
    }
}

impl<V: ToPrimitive> ThresholdDetector<V> for EpisodeSegmenter {
    fn detect_above(&self, series: &TimeSeries<V>, threshold: f64) -> Result<EpisodeTable> {
        self.segment(&series.above(threshold))
    }

    fn detect_below(&self, series: &TimeSeries<V>, threshold: f64) -> Result<EpisodeTable> {
        self.segment(&series.below(threshold))
    }
}

impl ConfigurableDetector for EpisodeSegmenter {
    type Parameters = SegmenterParameters;

    fn with_parameters(params: Self::Parameters) -> Result<Self> {
        Self::new(params)
    }

    fn parameters(&self) -> &Self::Parameters {
        &self.params
    }

    fn set_parameters(&mut self, params: Self::Parameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}
