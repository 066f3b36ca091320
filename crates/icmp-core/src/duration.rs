//! Duration parsing and formatting
//!
//! Durations arrive from configuration as offset-style strings (`"5min"`,
//! `"1h30min"`, `"0day 01:00:00"`). Parsing happens once at the boundary so
//! that every sweep works on [`TimeDelta`] values.

use crate::{Error, Result};
use chrono::TimeDelta;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Parse a duration string.
///
/// Accepted forms:
/// - unit sequences: `"5min"`, `"30 min"`, `"1h30min"`, `"1.5h"`, `"250ms"`, `"2 days"`
/// - clock form: `"01:00:00"`, `"00:01:02.5"`, optionally after a day count
///   (`"0day 01:00:00"`, `"1 days 02:30:00"`)
/// - a leading `-` negates the whole duration
///
/// Bare numbers are rejected because the unit would be a guess.
///
/// # Example
///
/// ```rust
/// use icmp_core::duration::parse_duration;
/// use chrono::TimeDelta;
///
/// assert_eq!(parse_duration("5min").unwrap(), TimeDelta::minutes(5));
/// assert_eq!(parse_duration("0day 01:00:00").unwrap(), TimeDelta::hours(1));
/// ```
pub fn parse_duration(text: &str) -> Result<TimeDelta> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_duration(text, "empty string"));
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let nanos = if body.contains(':') {
        parse_clock(text, body)?
    } else {
        parse_units(text, body)?
    };

    let delta = TimeDelta::nanoseconds(nanos);
    Ok(if negative { -delta } else { delta })
}

fn unit_nanos(unit: &str) -> Option<i64> {
    let scale = match unit.to_lowercase().as_str() {
        "d" | "day" | "days" => NANOS_PER_DAY,
        "h" | "hr" | "hrs" | "hour" | "hours" => NANOS_PER_HOUR,
        "m" | "min" | "mins" | "minute" | "minutes" => NANOS_PER_MINUTE,
        "s" | "sec" | "secs" | "second" | "seconds" => NANOS_PER_SECOND,
        "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => NANOS_PER_MILLI,
        "us" | "µs" | "micro" | "micros" | "microsecond" | "microseconds" => NANOS_PER_MICRO,
        "ns" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => 1,
        _ => return None,
    };
    Some(scale)
}

fn parse_units(text: &str, body: &str) -> Result<i64> {
    let mut total = 0.0_f64;
    let mut rest = body;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(Error::invalid_duration(
                text,
                &format!("expected a number at {rest:?}"),
            ));
        }
        let number = &rest[..number_len];
        let value: f64 = number
            .parse()
            .map_err(|_| Error::invalid_duration(text, &format!("bad number {number:?}")))?;

        rest = rest[number_len..].trim_start();
        let unit_len = rest
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(Error::invalid_duration(
                text,
                &format!("missing unit after {number:?}"),
            ));
        }
        let unit = &rest[..unit_len];
        let scale = unit_nanos(unit)
            .ok_or_else(|| Error::invalid_duration(text, &format!("unknown unit {unit:?}")))?;

        total += value * scale as f64;
        rest = rest[unit_len..].trim_start();
    }

    to_nanos(text, total)
}

fn parse_clock(text: &str, body: &str) -> Result<i64> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let (clock, prefix) = match tokens.split_last() {
        Some(split) => split,
        None => return Err(Error::invalid_duration(text, "empty clock")),
    };

    let mut total = if prefix.is_empty() {
        0.0
    } else {
        parse_units(text, &prefix.concat())? as f64
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(Error::invalid_duration(text, "clock must be HH:MM or HH:MM:SS"));
    }

    let field = |part: &str, name: &str| -> Result<f64> {
        part.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| Error::invalid_duration(text, &format!("bad {name} field {part:?}")))
    };

    let hours = field(parts[0], "hour")?;
    let minutes = field(parts[1], "minute")?;
    let seconds = match parts.get(2) {
        Some(part) => field(part, "second")?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(Error::invalid_duration(text, "minutes and seconds must be below 60"));
    }

    total += hours * NANOS_PER_HOUR as f64
        + minutes * NANOS_PER_MINUTE as f64
        + seconds * NANOS_PER_SECOND as f64;
    to_nanos(text, total)
}

fn to_nanos(text: &str, total: f64) -> Result<i64> {
    if !total.is_finite() || total.abs() >= i64::MAX as f64 {
        return Err(Error::invalid_duration(text, "out of range"));
    }
    Ok(total.round() as i64)
}

/// Format a duration compactly (`"1h30min"`, `"62s"` → `"1min2s"`).
///
/// The output is accepted by [`parse_duration`].
pub fn format_duration(delta: TimeDelta) -> String {
    let mut nanos = match delta.num_nanoseconds() {
        Some(n) => n,
        // beyond ~292 years; second precision is plenty
        None => delta.num_seconds().saturating_mul(NANOS_PER_SECOND),
    };
    if nanos == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
        nanos = nanos.saturating_neg();
    }

    for (scale, unit) in [
        (NANOS_PER_DAY, "d"),
        (NANOS_PER_HOUR, "h"),
        (NANOS_PER_MINUTE, "min"),
        (NANOS_PER_SECOND, "s"),
        (NANOS_PER_MILLI, "ms"),
        (NANOS_PER_MICRO, "us"),
        (1, "ns"),
    ] {
        let count = nanos / scale;
        if count > 0 {
            out.push_str(&format!("{count}{unit}"));
            nanos -= count * scale;
        }
    }
    out
}

/// Exact fractional hours of a duration
pub fn hours(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_HOUR as f64,
        None => delta.num_seconds() as f64 / 3600.0,
    }
}

/// Serde adapter storing a [`TimeDelta`] as a duration string
pub mod serde_str {
    use super::{format_duration, parse_duration};
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        delta: &TimeDelta,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*delta))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<TimeDelta, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for an optional [`TimeDelta`] stored as a duration string
pub mod serde_str_opt {
    use super::{format_duration, parse_duration};
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        delta: &Option<TimeDelta>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match delta {
            Some(delta) => serializer.serialize_some(&format_duration(*delta)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<TimeDelta>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_duration(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_unit_strings() {
        assert_eq!(parse_duration("5min").unwrap(), TimeDelta::minutes(5));
        assert_eq!(parse_duration("30 min").unwrap(), TimeDelta::minutes(30));
        assert_eq!(parse_duration("1h30min").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration("1.5h").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration("90s").unwrap(), TimeDelta::seconds(90));
        assert_eq!(parse_duration("250ms").unwrap(), TimeDelta::milliseconds(250));
        assert_eq!(parse_duration("2 days").unwrap(), TimeDelta::days(2));
        assert_eq!(parse_duration(" 10 Seconds ").unwrap(), TimeDelta::seconds(10));
        assert_eq!(parse_duration("-5min").unwrap(), TimeDelta::minutes(-5));
    }

    #[test]
    fn test_parse_clock_strings() {
        assert_eq!(parse_duration("01:00:00").unwrap(), TimeDelta::hours(1));
        assert_eq!(parse_duration("0day 01:00:00").unwrap(), TimeDelta::hours(1));
        assert_eq!(parse_duration("0day 00:01:02").unwrap(), TimeDelta::seconds(62));
        assert_eq!(
            parse_duration("1 days 02:30:00").unwrap(),
            TimeDelta::days(1) + TimeDelta::minutes(150)
        );
        assert_eq!(
            parse_duration("00:00:01.5").unwrap(),
            TimeDelta::milliseconds(1500)
        );
        assert_eq!(parse_duration("00:05").unwrap(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "   ", "5", "min", "5 parsecs", "1:2:3:4", "00:75:00", "abc:de"] {
            let err = parse_duration(text).unwrap_err();
            assert!(
                matches!(err, Error::Configuration(_)),
                "{text:?} should be a configuration error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::minutes(5)), "5min");
        assert_eq!(format_duration(TimeDelta::seconds(62)), "1min2s");
        assert_eq!(format_duration(TimeDelta::minutes(90)), "1h30min");
        assert_eq!(format_duration(TimeDelta::milliseconds(-1500)), "-1s500ms");
        assert_eq!(format_duration(TimeDelta::days(1) + TimeDelta::microseconds(3)), "1d3us");
    }

    #[test]
    fn test_format_is_parseable() {
        let delta = TimeDelta::days(3) + TimeDelta::seconds(7) + TimeDelta::nanoseconds(11);
        assert_eq!(parse_duration(&format_duration(delta)).unwrap(), delta);
    }

    #[test]
    fn test_hours() {
        assert_relative_eq!(hours(TimeDelta::minutes(30)), 0.5);
        assert_relative_eq!(hours(TimeDelta::seconds(60)), 1.0 / 60.0);
        assert_relative_eq!(hours(TimeDelta::zero()), 0.0);
    }
}
