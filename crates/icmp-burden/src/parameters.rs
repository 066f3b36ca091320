//! Parameters for burden integration

use chrono::TimeDelta;
use icmp_core::{AnalysisConfig, Error, Result};

/// Pairs of samples at least this many seconds apart are treated as a disconnection
pub const DEFAULT_CONTINUITY_LIMIT_SECS: i64 = 62;

/// Burden integration parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurdenParameters {
    /// Integrate only the excursion beyond this value
    pub threshold: Option<f64>,
    /// Integrate `threshold - value` instead of `value - threshold`
    pub invert: bool,
    /// A pair whose spacing reaches this limit gets no value
    pub continuity_limit: TimeDelta,
}

impl Default for BurdenParameters {
    fn default() -> Self {
        Self {
            threshold: None,
            invert: false,
            continuity_limit: TimeDelta::seconds(DEFAULT_CONTINUITY_LIMIT_SECS),
        }
    }
}

impl BurdenParameters {
    /// Burden of the excursion above `threshold`, e.g. ICP above 22 mmHg
    pub fn above(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    /// Burden of the deficit below `threshold`, e.g. CPP below 60 mmHg
    pub fn below(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
            invert: true,
            ..Self::default()
        }
    }

    /// Admit coarser trends whose samples are further apart than a minute
    pub fn with_continuity_limit(self, continuity_limit: TimeDelta) -> Self {
        Self {
            continuity_limit,
            ..self
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.threshold,
            invert: config.invert,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.continuity_limit <= TimeDelta::zero() {
            return Err(Error::InvalidParameter(format!(
                "continuity_limit must be positive, got {}",
                self.continuity_limit
            )));
        }
        if let Some(threshold) = self.threshold {
            if !threshold.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "threshold must be finite, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Value integrated for a single sample; `None` when there is nothing to integrate
    pub fn curve(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        match self.threshold {
            None => Some(value),
            Some(threshold) => {
                let excursion = if self.invert {
                    threshold - value
                } else {
                    value - threshold
                };
                (excursion > 0.0).then_some(excursion)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve() {
        let plain = BurdenParameters::default();
        assert_eq!(plain.curve(-3.0), Some(-3.0));
        assert_eq!(plain.curve(f64::NAN), None);

        let above = BurdenParameters::above(20.0);
        assert_eq!(above.curve(25.0), Some(5.0));
        assert_eq!(above.curve(20.0), None);
        assert_eq!(above.curve(12.0), None);

        let below = BurdenParameters::below(60.0);
        assert_eq!(below.curve(50.0), Some(10.0));
        assert_eq!(below.curve(70.0), None);
    }

    #[test]
    fn test_validation() {
        assert!(BurdenParameters::default().validate().is_ok());
        assert!(BurdenParameters::above(f64::INFINITY).validate().is_err());
        assert!(BurdenParameters::default()
            .with_continuity_limit(TimeDelta::zero())
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_config() {
        let config = AnalysisConfig {
            threshold: Some(60.0),
            invert: true,
            ..AnalysisConfig::default()
        };
        assert_eq!(BurdenParameters::from_config(&config), BurdenParameters::below(60.0));
    }
}
