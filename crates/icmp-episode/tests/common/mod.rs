//! Common test utilities for icmp-episode tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use icmp_core::TimeSeries;
use icmp_episode::EpisodeTable;

/// Reference time used by all scenarios
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

/// Indicator series from `(seconds offset, flag)` pairs
pub fn flags(samples: &[(i64, bool)]) -> TimeSeries<bool> {
    TimeSeries::from_pairs(
        "flag",
        samples
            .iter()
            .map(|&(seconds, flag)| (at_seconds(seconds), flag)),
    )
    .unwrap()
}

/// Episode bounds as seconds offsets from `t0`
pub fn bounds_in_seconds(table: &EpisodeTable) -> Vec<(i64, i64)> {
    table
        .iter()
        .map(|episode| {
            (
                (episode.start() - t0()).num_seconds(),
                (episode.end() - t0()).num_seconds(),
            )
        })
        .collect()
}
