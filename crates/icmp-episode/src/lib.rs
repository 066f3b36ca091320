//! Episode detection and interval reconciliation for ICM+ monitoring data
//!
//! This crate turns an indicator series into contiguous episodes and
//! reconciles those episodes against an independent event stream.
//!
//! # Pipeline
//!
//! - **Segmentation**: hot timestamps closer than `max_gap` merge into one
//!   episode; episodes not lasting strictly longer than `min_duration` are dropped
//! - **Attachment**: a single forward sweep assigns each event to the episode
//!   containing it
//! - **Deviations**: stretches inside an episode longer than `allowed_gap`
//!   without a logged event, classified by position
//!
//! ## Usage
//!
//! ```rust
//! use icmp_episode::{DeviationKind, EpisodeSegmenter, SegmenterParameters, ThresholdDetector};
//! use icmp_core::TimeSeries;
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let t0 = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let minutes = |m: i64| t0 + TimeDelta::minutes(m);
//!
//! let icp = TimeSeries::new(
//!     "ICP",
//!     (0..=60).map(minutes).collect(),
//!     (0..=60).map(|m| if m < 30 { 25.0 } else { 15.0 }).collect(),
//! ).unwrap();
//!
//! let segmenter = EpisodeSegmenter::new(SegmenterParameters::parse("5min", Some("5min")).unwrap()).unwrap();
//! let episodes = segmenter.detect_above(&icp, 22.0).unwrap();
//! assert_eq!(episodes.len(), 1);
//!
//! let attached = episodes.attach(vec![(minutes(25), "Sedation")], "Interventions").unwrap();
//! let deviations = attached.deviations(TimeDelta::minutes(20)).unwrap();
//! assert_eq!(deviations.rows()[0].kind, DeviationKind::LeadingGap);
//! ```

pub mod attach;
pub mod deviation;
pub mod segment;
pub mod traits;
pub mod types;

pub use attach::attach_events;
pub use deviation::{
    DeviationDetector, DeviationEvent, DeviationKind, DeviationParameters, DeviationTable,
};
pub use segment::{EpisodeSegmenter, SegmenterParameters};
pub use traits::{
    ConfigurableDetector, EpisodeDetector, EpisodeDetectorProperties, ThresholdDetector,
};
pub use types::{AttachedEpisode, AttachedEpisodes, Episode, EpisodeTable};
