//! Timestamp text as written in ICM+ artefact files

use chrono::NaiveDateTime;
use icmp_core::time::parse_timestamp;
use icmp_core::Result;

const ARTF_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S%.3f";
const MODIFIED_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// `dd/mm/YYYY HH:MM:SS.mmm`, truncated to milliseconds
pub fn format_artf_time(timestamp: NaiveDateTime) -> String {
    timestamp.format(ARTF_TIME_FORMAT).to_string()
}

/// `dd/mm/YYYY HH:MM:SS`
pub fn format_modified_date(timestamp: NaiveDateTime) -> String {
    timestamp.format(MODIFIED_DATE_FORMAT).to_string()
}

/// Parse either form back (day-first)
pub fn parse_artf_time(text: &str) -> Result<NaiveDateTime> {
    parse_timestamp(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    #[test]
    fn test_millisecond_truncation() {
        let ts = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_micro_opt(9, 5, 7, 123_987)
            .unwrap();
        assert_eq!(format_artf_time(ts), "04/03/2021 09:05:07.123");
        assert_eq!(format_modified_date(ts), "04/03/2021 09:05:07");

        let parsed = parse_artf_time(&format_artf_time(ts)).unwrap();
        assert_eq!(parsed, ts - TimeDelta::microseconds(987));
    }

    #[test]
    fn test_day_first() {
        let parsed = parse_artf_time("04/03/2021 09:05:07").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
    }
}
