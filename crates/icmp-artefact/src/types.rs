//! Artefact records

use crate::format::{format_artf_time, format_modified_date};
use chrono::NaiveDateTime;
use icmp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label ICM+ uses for artefacts that apply to every signal
pub const GLOBAL_LABEL: &str = "Global";

/// Which signal an artefact applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalLabel {
    #[default]
    Global,
    Named(String),
}

impl SignalLabel {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == GLOBAL_LABEL {
            SignalLabel::Global
        } else {
            SignalLabel::Named(name)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignalLabel::Global => GLOBAL_LABEL,
            SignalLabel::Named(name) => name,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, SignalLabel::Global)
    }
}

impl From<String> for SignalLabel {
    fn from(label: String) -> Self {
        SignalLabel::named(label)
    }
}

impl From<&str> for SignalLabel {
    fn from(label: &str) -> Self {
        SignalLabel::named(label)
    }
}

impl From<SignalLabel> for String {
    fn from(label: SignalLabel) -> Self {
        match label {
            SignalLabel::Global => GLOBAL_LABEL.to_string(),
            SignalLabel::Named(name) => name,
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interval during which a signal (or every signal) is unreliable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artefact {
    pub signal: SignalLabel,
    pub modified_by: String,
    pub modified_date: NaiveDateTime,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Artefact {
    pub fn new(
        signal: impl Into<SignalLabel>,
        modified_by: impl Into<String>,
        modified_date: NaiveDateTime,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "artefact ends at {end} before it starts at {start}"
            )));
        }
        Ok(Self {
            signal: signal.into(),
            modified_by: modified_by.into(),
            modified_date,
            start,
            end,
        })
    }

    /// Start time in artefact-file form, `dd/mm/YYYY HH:MM:SS.mmm`
    pub fn start_text(&self) -> String {
        format_artf_time(self.start)
    }

    pub fn end_text(&self) -> String {
        format_artf_time(self.end)
    }

    /// Modification date in artefact-file form, without milliseconds
    pub fn modified_date_text(&self) -> String {
        format_modified_date(self.modified_date)
    }

    pub fn overlaps(&self, other: &Artefact) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Artefact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {} (by {} on {})",
            self.signal,
            self.start_text(),
            self.end_text(),
            self.modified_by,
            self.modified_date_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_signal_label() {
        assert_eq!(SignalLabel::from("Global"), SignalLabel::Global);
        assert_eq!(SignalLabel::from("ICP"), SignalLabel::Named("ICP".into()));
        assert_eq!(String::from(SignalLabel::Global), "Global");
        assert!(SignalLabel::default().is_global());
    }

    #[test]
    fn test_artefact_bounds() {
        assert!(Artefact::new("ICP", "nurse", at(12, 0, 0), at(9, 0, 5), at(9, 0, 0)).is_err());

        let artefact = Artefact::new("ICP", "nurse", at(12, 0, 0), at(9, 0, 0), at(9, 0, 10)).unwrap();
        assert_eq!(artefact.start_text(), "01/03/2021 09:00:00.000");
        assert_eq!(artefact.modified_date_text(), "01/03/2021 12:00:00");
    }

    #[test]
    fn test_overlap() {
        let a = Artefact::new("Global", "x", at(0, 0, 0), at(9, 0, 0), at(9, 1, 0)).unwrap();
        let b = Artefact::new("Global", "x", at(0, 0, 0), at(9, 1, 0), at(9, 2, 0)).unwrap();
        let c = Artefact::new("Global", "x", at(0, 0, 0), at(9, 3, 0), at(9, 4, 0)).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_serde_label_as_string() {
        let artefact = Artefact::new("ABP", "x", at(0, 0, 0), at(9, 0, 0), at(9, 1, 0)).unwrap();
        let json = serde_json::to_value(&artefact).unwrap();
        assert_eq!(json["signal"], "ABP");
        let back: Artefact = serde_json::from_value(json).unwrap();
        assert_eq!(back, artefact);
    }
}
