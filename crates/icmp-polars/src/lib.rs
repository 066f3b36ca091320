//! Polars integration for ICM+ episode analysis
//!
//! Trend exports arrive as a `DateTime` column plus one column per signal.
//! The extension traits here run segmentation, burden and deviation
//! detection directly on such frames, and the conversion traits move
//! episodes, deviations, events and artefacts between their typed models and
//! DataFrames.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use icmp_polars::{TrendFrameExt, EpisodeFrameExt};
//! use icmp_episode::SegmenterParameters;
//!
//! let trend = trend.strip_unit_brackets()?;
//! let episodes = trend.detect_episodes("ICP", Some(20.0), false, &SegmenterParameters::default())?;
//! let episodes = episodes.attach_event_frame(&events, "IntervsDict")?;
//! let deviations = episodes.deviations("IntervsDict", chrono::TimeDelta::minutes(30))?;
//! ```

pub mod config;
mod error;
mod methods;
mod traits;


pub use config::{TimeEncoding, DATETIME, TIME_UNIT};
pub use error::{Error, Result};
pub use methods::{artefact_text_frame, attached_from_frame, attached_timestamps_from_frame};
pub use traits::*;

// Re-export the typed models the frames convert to
pub use icmp_artefact::ArtefactTable;
pub use icmp_core::EventLog;
pub use icmp_episode::{AttachedEpisodes, DeviationTable, EpisodeTable};
