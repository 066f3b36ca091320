//! Common test utilities for icmp-polars tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn at_seconds(seconds: i64) -> NaiveDateTime {
    t0() + TimeDelta::seconds(seconds)
}

pub fn at_minutes(minutes: i64) -> NaiveDateTime {
    t0() + TimeDelta::minutes(minutes)
}

/// Day-first text as found in CSV exports
pub fn text(timestamp: NaiveDateTime) -> String {
    timestamp.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Trend frame with a text `DateTime` column and one signal column
pub fn trend_frame(signal: &str, samples: &[(i64, Option<f64>)]) -> DataFrame {
    let stamps: Vec<String> = samples.iter().map(|(s, _)| text(at_seconds(*s))).collect();
    let values: Vec<Option<f64>> = samples.iter().map(|(_, v)| *v).collect();
    DataFrame::new(vec![
        Series::new("DateTime".into(), stamps).into(),
        Series::new(signal.into(), values).into(),
    ])
    .unwrap()
}

/// Event frame with text start times
pub fn event_frame(events: &[(i64, &str)]) -> DataFrame {
    let starts: Vec<String> = events.iter().map(|(m, _)| text(at_minutes(*m))).collect();
    let names: Vec<&str> = events.iter().map(|(_, name)| *name).collect();
    DataFrame::new(vec![
        Series::new("EventName".into(), names).into(),
        Series::new("StartTime".into(), starts).into(),
    ])
    .unwrap()
}

pub fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
