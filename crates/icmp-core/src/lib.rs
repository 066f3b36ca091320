//! Core types for ICM+ neuro-ICU monitoring analysis
//!
//! This crate provides the foundation the analysis crates share:
//!
//! - [`TimeSeries`]: a named value column indexed by strictly increasing timestamps
//! - [`Event`] and [`EventLog`]: discrete clinical occurrences with optional attributes
//! - [`duration`]: offset-style duration strings (`"5min"`, `"0day 01:00:00"`)
//! - [`time`]: serial-date and day-first timestamp conversions
//! - [`AnalysisConfig`]: serde-backed run configuration
//! - [`Error`]: the error taxonomy used across the workspace
//!
//! # Example
//!
//! ```rust
//! use icmp_core::{TimeSeries, duration::parse_duration};
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let t0 = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let icp = TimeSeries::new(
//!     "ICP",
//!     vec![t0, t0 + TimeDelta::minutes(1), t0 + TimeDelta::minutes(2)],
//!     vec![18.0, 23.5, 24.0],
//! ).unwrap();
//!
//! let raised = icp.above(22.0);
//! assert_eq!(raised.values(), &[false, true, true]);
//! assert_eq!(parse_duration("5min").unwrap(), TimeDelta::minutes(5));
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod event;
pub mod series;
pub mod time;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use event::{DataField, Event, EventLog, Timestamped};
pub use series::{ensure_strictly_increasing, Indicator, TimeSeries};

pub use chrono::{NaiveDateTime, TimeDelta};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
