//! Analysis configuration
//!
//! Durations are written as strings (`"5min"`, `"0day 00:30:00"`) so that a
//! config document reads the way clinicians specify protocols.

use crate::duration::{serde_str, serde_str_opt};
use crate::{Error, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Settings for one episode/burden/deviation analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Hot samples closer than this belong to the same episode
    #[serde(with = "serde_str")]
    pub max_gap: TimeDelta,

    /// Episodes must last strictly longer than this; `null` keeps everything
    #[serde(with = "serde_str_opt")]
    pub min_duration: Option<TimeDelta>,

    /// Longest stretch inside an episode without a logged event
    #[serde(with = "serde_str")]
    pub allowed_gap: TimeDelta,

    /// Episodes longer than this are reported as prolonged
    #[serde(with = "serde_str")]
    pub prolonged: TimeDelta,

    /// Threshold defining the indicator and the burden excursion
    pub threshold: Option<f64>,

    /// Integrate `threshold - value` (deficit) instead of `value - threshold`
    pub invert: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_gap: TimeDelta::minutes(5),
            min_duration: Some(TimeDelta::minutes(5)),
            allowed_gap: TimeDelta::minutes(30),
            prolonged: TimeDelta::minutes(30),
            threshold: None,
            invert: false,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::Configuration(format!("invalid analysis config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("cannot serialise analysis config: {e}")))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_gap <= TimeDelta::zero() {
            return Err(Error::InvalidParameter("max_gap must be positive".to_string()));
        }
        if self.min_duration.is_some_and(|d| d < TimeDelta::zero()) {
            return Err(Error::InvalidParameter(
                "min_duration must not be negative".to_string(),
            ));
        }
        if self.allowed_gap < TimeDelta::zero() {
            return Err(Error::InvalidParameter(
                "allowed_gap must not be negative".to_string(),
            ));
        }
        if self.threshold.is_some_and(|t| !t.is_finite()) {
            return Err(Error::InvalidParameter("threshold must be finite".to_string()));
        }
        Ok(())
    }
}
