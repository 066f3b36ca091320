//! Burden (area under curve) for ICM+ monitoring trends
//!
//! The burden of a physiological variable is its trapezoidal integral in
//! value-hours, optionally restricted to excursions beyond a clinical
//! threshold (ICP above 22 mmHg, CPP below 60 mmHg). Trends are minute
//! resolution; consecutive samples 62 s or more apart are a disconnection
//! and contribute nothing.
//!
//! # Example
//!
//! ```rust
//! use icmp_burden::{BurdenExt, BurdenParameters};
//! use icmp_core::TimeSeries;
//! use chrono::{NaiveDate, TimeDelta};
//!
//! let t0 = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let icp = TimeSeries::new(
//!     "ICP",
//!     (0..3).map(|m| t0 + TimeDelta::minutes(m)).collect(),
//!     vec![24.0, 26.0, 30.0],
//! ).unwrap();
//!
//! let burden = icp.burden(BurdenParameters::above(22.0)).unwrap();
//! assert_eq!(burden.name(), "ICP_burden");
//! assert_eq!(burden.len(), 2);
//! assert!((burden.total() - (6.0 + 12.0) / 120.0).abs() < 1e-12);
//! ```

pub mod integrator;
pub mod parameters;

pub use integrator::{BurdenExt, BurdenIntegrator, BurdenSeries};
pub use parameters::{BurdenParameters, DEFAULT_CONTINUITY_LIMIT_SECS};
