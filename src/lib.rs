//! ICM+ neuro-ICU monitoring analysis
//!
//! Facade over the workspace crates:
//!
//! - [`core`]: time series, events, durations, configuration and errors
//! - [`episode`]: gap-tolerant segmentation, event attachment and protocol deviations
//! - [`burden`]: trapezoidal area under a monitoring trend
//! - [`artefact`]: annotated intervals of unreliable signal
//! - `polars` (feature `polars`): the same operations on Polars DataFrames
//!
//! # Example
//!
//! ```rust
//! use icmp_analysis::prelude::*;
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let config = AnalysisConfig::from_json(r#"{ "max_gap": "2min", "min_duration": "0s", "threshold": 22.0 }"#).unwrap();
//! let t0 = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let icp = TimeSeries::new(
//!     "ICP",
//!     (0..10).map(|m| t0 + TimeDelta::minutes(m)).collect(),
//!     vec![20.0, 24.0, 25.0, 26.0, 21.0, 20.0, 19.0, 23.0, 24.0, 18.0],
//! ).unwrap();
//!
//! let segmenter = EpisodeSegmenter::new(SegmenterParameters::from_config(&config)).unwrap();
//! let episodes = segmenter.detect_above(&icp, 22.0).unwrap();
//! assert_eq!(episodes.len(), 2);
//!
//! let burden = icp.burden(BurdenParameters::from_config(&config)).unwrap();
//! assert!(burden.total() > 0.0);
//! ```

pub use icmp_artefact as artefact;
pub use icmp_burden as burden;
pub use icmp_core as core;
pub use icmp_episode as episode;
#[cfg(feature = "polars")]
pub use icmp_polars as polars;

pub use icmp_core::{Error, Result};

/// Commonly used types and traits
pub mod prelude {
    pub use icmp_artefact::{Artefact, ArtefactTable, GroupingParameters, SignalLabel};
    pub use icmp_burden::{BurdenExt, BurdenIntegrator, BurdenParameters, BurdenSeries};
    pub use icmp_core::{AnalysisConfig, DataField, Event, EventLog, TimeSeries, Timestamped};
    pub use icmp_episode::{
        AttachedEpisodes, ConfigurableDetector, DeviationDetector, DeviationKind,
        DeviationParameters, DeviationTable, Episode, EpisodeDetector, EpisodeSegmenter,
        EpisodeTable, SegmenterParameters, ThresholdDetector,
    };
    #[cfg(feature = "polars")]
    pub use icmp_polars::{EpisodeFrameExt, EventFrameExt, FromFrame, ToFrame, TrendFrameExt};
}
