//! Timestamp conversions shared by the tabular adapters
//!
//! ICM+ exports timestamps three ways: spreadsheet serial days, day-first
//! strings and (inside HDF5) unix microseconds.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Day-first layouts seen in ICM+ CSV/XLSX exports, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H.%M.%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S%.f",
];

/// Days from the spreadsheet epoch (30 December 1899, not the 31st) to 1970-01-01
const SERIAL_EPOCH_OFFSET_DAYS: i64 = 25_569;

fn serial_epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc() - TimeDelta::days(SERIAL_EPOCH_OFFSET_DAYS)
}

/// Convert a serial date (fractional days since the spreadsheet epoch) to a timestamp.
///
/// Precision is one microsecond.
pub fn from_serial(serial: f64) -> Result<NaiveDateTime> {
    let micros = serial * MICROS_PER_DAY;
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(Error::InvalidInput(format!(
            "serial date {serial} is out of range"
        )));
    }
    serial_epoch()
        .checked_add_signed(TimeDelta::microseconds(micros.round() as i64))
        .ok_or_else(|| Error::InvalidInput(format!("serial date {serial} is out of range")))
}

/// Convert a timestamp to a serial date
pub fn to_serial(timestamp: NaiveDateTime) -> f64 {
    let delta = timestamp - serial_epoch();
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_DAY,
        None => delta.num_seconds() as f64 / 86_400.0,
    }
}

/// Parse a day-first timestamp string
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| Error::InvalidInput(format!("unrecognised timestamp {text:?}")))
}

/// Timestamp from unix microseconds
pub fn from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Unix microseconds of a timestamp
pub fn to_micros(timestamp: NaiveDateTime) -> i64 {
    timestamp.and_utc().timestamp_micros()
}
