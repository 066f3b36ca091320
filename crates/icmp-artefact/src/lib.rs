//! Artefact intervals for ICM+ recordings
//!
//! An artefact marks a stretch of a recording where one signal (or, for a
//! `Global` artefact, every signal) is unreliable. Tables can be built from
//! flagged timestamps, from detected episodes, or one interval at a time.

pub mod format;
pub mod table;
pub mod types;

pub use format::{format_artf_time, format_modified_date, parse_artf_time};
pub use table::{group_timestamps, ArtefactTable, GroupingParameters, DEFAULT_MODIFIED_BY};
pub use types::{Artefact, SignalLabel, GLOBAL_LABEL};
