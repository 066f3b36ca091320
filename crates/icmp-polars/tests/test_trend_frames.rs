//! Tests for trend frame operations

mod common;

use approx::assert_relative_eq;
use chrono::TimeDelta;
use common::{at_seconds, t0, text, trend_frame};
use icmp_burden::BurdenParameters;
use icmp_episode::{EpisodeTable, SegmenterParameters};
use icmp_polars::{Error, FromFrame, TrendFrameExt};
use polars::prelude::*;

#[test]
fn test_strip_unit_brackets() {
    let df = df![
        "DateTime" => ["01/03/2021 09:00:00"],
        "ICP[mmHg]" => [12.0],
        "CPP [mmHg]" => [70.0],
    ]
    .unwrap();

    let stripped = df.strip_unit_brackets().unwrap();
    let names: Vec<&str> = stripped
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, vec!["DateTime", "ICP", "CPP"]);
}

#[test]
fn test_trend_series_sorts_and_keeps_nulls_as_nan() {
    let df = trend_frame("ICP", &[(30, None), (0, Some(12.0))]);
    let series = df.trend_series("ICP").unwrap();

    assert_eq!(series.timestamps(), &[t0(), at_seconds(30)]);
    assert_eq!(series.values()[0], 12.0);
    assert!(series.values()[1].is_nan());
}

#[test]
fn test_detect_episodes_above_threshold() {
    let df = trend_frame(
        "ICP",
        &[
            (0, Some(25.0)),
            (30, Some(26.0)),
            (60, Some(15.0)),
            (90, Some(14.0)),
            (120, Some(30.0)),
            (150, Some(24.0)),
        ],
    );
    let params = SegmenterParameters::parse("1min", Some("0s")).unwrap();
    let frame = df.detect_episodes("ICP", Some(20.0), false, &params).unwrap();

    assert_eq!(frame.height(), 2);
    let episodes = EpisodeTable::from_frame(&frame).unwrap();
    let bounds: Vec<_> = episodes.iter().map(|e| (e.start(), e.end())).collect();
    assert_eq!(
        bounds,
        vec![(t0(), at_seconds(30)), (at_seconds(120), at_seconds(150))]
    );
}

#[test]
fn test_detect_episodes_below_threshold() {
    let df = trend_frame("CPP", &[(0, Some(70.0)), (30, Some(55.0)), (60, Some(50.0))]);
    let params = SegmenterParameters::unfiltered(TimeDelta::minutes(1));
    let frame = df.detect_episodes("CPP", Some(60.0), true, &params).unwrap();

    let episodes = EpisodeTable::from_frame(&frame).unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes.episodes()[0].start(), at_seconds(30));
    assert_eq!(episodes.episodes()[0].duration(), TimeDelta::seconds(30));
}

#[test]
fn test_detect_episodes_from_indicator_column() {
    let stamps: Vec<String> = [0, 30, 60].iter().map(|s| text(at_seconds(*s))).collect();
    let df = df![
        "DateTime" => stamps,
        "flag" => [Some(true), None, Some(true)],
    ]
    .unwrap();

    let params = SegmenterParameters::unfiltered(TimeDelta::seconds(45));
    let frame = df.detect_episodes("flag", None, false, &params).unwrap();
    assert_eq!(frame.height(), 2);
}

#[test]
fn test_serial_datetime_column() {
    // 2021-03-01 09:00 and 09:00:30 as spreadsheet serial days
    let df = df![
        "DateTime" => [44256.375, 44256.375 + 30.0 / 86_400.0],
        "ICP" => [25.0, 25.0],
    ]
    .unwrap();

    let series = df.trend_series("ICP").unwrap();
    assert_eq!(series.first_timestamp(), Some(t0()));
    assert_eq!(series.last_timestamp(), Some(at_seconds(30)));
}

#[test]
fn test_burden_with_continuity_override() {
    let df = trend_frame("ICP", &[(0, Some(10.0)), (1800, Some(20.0))]);
    let params = BurdenParameters::default().with_continuity_limit(TimeDelta::hours(1));
    let frame = df.burden("ICP", &params).unwrap();

    assert_eq!(frame.height(), 1);
    let value = frame.column("ICP_burden").unwrap().f64().unwrap().get(0).unwrap();
    assert_relative_eq!(value, 7.5, epsilon = 1e-12);
}

#[test]
fn test_burden_default_limit_leaves_null() {
    let df = trend_frame("ICP", &[(0, Some(10.0)), (1800, Some(20.0))]);
    let frame = df.burden("ICP", &BurdenParameters::default()).unwrap();

    assert_eq!(frame.height(), 1);
    assert_eq!(frame.column("ICP_burden").unwrap().null_count(), 1);
}

#[test]
fn test_missing_signal_column() {
    let df = trend_frame("ICP", &[(0, Some(10.0))]);
    let result = df.trend_series("ABP");
    assert!(matches!(result, Err(Error::MissingColumn(name)) if name == "ABP"));
}
