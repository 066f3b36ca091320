//! Episode, attached-episode and deviation frames

use super::columns::{
    datetime_column, datetime_series, duration_column, has_column, list_column, read_list,
    read_required_timestamps, read_strings, require,
};
use crate::config::episode::{
    counts_column, values_column, DEVIATION_TYPE, DURATION, END, START,
};
use crate::{EpisodeFrameExt, Error, FromFrame, Result, ToFrame};
use chrono::{NaiveDateTime, TimeDelta};
use icmp_core::EventLog;
use icmp_episode::{
    AttachedEpisode, AttachedEpisodes, DeviationDetector, DeviationEvent, DeviationKind,
    DeviationParameters, DeviationTable, Episode, EpisodeTable,
};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

fn episode_columns<'a>(episodes: impl Iterator<Item = &'a Episode> + Clone) -> Result<Vec<Column>> {
    Ok(vec![
        datetime_column(START, episodes.clone().map(Episode::start))?,
        duration_column(DURATION, episodes.clone().map(Episode::duration))?,
        datetime_column(END, episodes.map(Episode::end))?,
    ])
}

fn read_episodes(df: &DataFrame) -> Result<Vec<Episode>> {
    let starts = read_required_timestamps(require(df, START)?)?;
    let ends = read_required_timestamps(require(df, END)?)?;
    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| Episode::new(start, end).map_err(Error::from))
        .collect()
}

impl ToFrame for EpisodeTable {
    fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(episode_columns(self.iter())?)?)
    }
}

impl FromFrame for EpisodeTable {
    fn from_frame(df: &DataFrame) -> Result<Self> {
        Ok(EpisodeTable::new(read_episodes(df)?)?)
    }
}

impl<E: fmt::Display> ToFrame for AttachedEpisodes<E> {
    fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = episode_columns(self.iter().map(|row| &row.episode))?;

        let mut timestamps = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());
        for row in self.iter() {
            match &row.events {
                Some(events) => {
                    timestamps.push(Some(datetime_series("", events.keys().copied().map(Some))?));
                    let texts: Vec<String> = events.values().map(ToString::to_string).collect();
                    values.push(Some(Series::new("".into(), texts)));
                }
                None => {
                    timestamps.push(None);
                    values.push(None);
                }
            }
        }
        columns.push(list_column(self.column(), timestamps));
        columns.push(list_column(&values_column(self.column()), values));
        Ok(DataFrame::new(columns)?)
    }
}

/// Rows of the attached-events list column, as timestamps
fn read_attached_timestamps(df: &DataFrame, column: &str) -> Result<Vec<Option<Vec<NaiveDateTime>>>> {
    read_list(require(df, column)?)?
        .into_iter()
        .map(|row| row.map(|inner| read_required_timestamps(&inner)).transpose())
        .collect()
}

/// Attached episodes keeping only event timestamps
pub fn attached_timestamps_from_frame(df: &DataFrame, column: &str) -> Result<AttachedEpisodes<()>> {
    let episodes = read_episodes(df)?;
    let events = read_attached_timestamps(df, column)?;
    let rows = episodes
        .into_iter()
        .zip(events)
        .map(|(episode, timestamps)| AttachedEpisode {
            episode,
            events: timestamps.map(|ts| ts.into_iter().map(|t| (t, ())).collect()),
        })
        .collect();
    Ok(AttachedEpisodes::from_rows(column, rows)?)
}

/// Attached episodes with their values, from the `{column}` and `{column}_values` list columns
pub fn attached_from_frame(df: &DataFrame, column: &str) -> Result<AttachedEpisodes<String>> {
    let episodes = read_episodes(df)?;
    let events = read_attached_timestamps(df, column)?;
    let values = read_list(require(df, &values_column(column))?)?;

    let mut rows = Vec::with_capacity(episodes.len());
    for ((episode, timestamps), texts) in episodes.into_iter().zip(events).zip(values) {
        let events = match (timestamps, texts) {
            (Some(timestamps), Some(texts)) => {
                let texts = read_strings(&texts)?;
                if texts.len() != timestamps.len() {
                    return Err(Error::InvalidInput(format!(
                        "{episode} has {} attached timestamps but {} values",
                        timestamps.len(),
                        texts.len()
                    )));
                }
                let mapping: BTreeMap<NaiveDateTime, String> = timestamps
                    .into_iter()
                    .zip(texts.into_iter().map(Option::unwrap_or_default))
                    .collect();
                Some(mapping)
            }
            (None, None) => None,
            _ => {
                return Err(Error::InvalidInput(format!(
                    "{episode} has timestamps without values or values without timestamps"
                )))
            }
        };
        rows.push(AttachedEpisode { episode, events });
    }
    Ok(AttachedEpisodes::from_rows(column, rows)?)
}

impl ToFrame for DeviationTable {
    fn to_frame(&self) -> Result<DataFrame> {
        let kinds: Vec<&str> = self.iter().map(|row| row.kind.description()).collect();
        Ok(DataFrame::new(vec![
            datetime_column(START, self.iter().map(|row| row.start))?,
            duration_column(DURATION, self.iter().map(|row| row.duration))?,
            datetime_column(END, self.iter().map(|row| row.end))?,
            Series::new(DEVIATION_TYPE.into(), kinds).into(),
        ])?)
    }
}

impl FromFrame for DeviationTable {
    fn from_frame(df: &DataFrame) -> Result<Self> {
        let starts = read_required_timestamps(require(df, START)?)?;
        let ends = read_required_timestamps(require(df, END)?)?;
        let kinds = read_strings(require(df, DEVIATION_TYPE)?)?;

        let rows = starts
            .into_iter()
            .zip(ends)
            .zip(kinds)
            .map(|((start, end), kind)| {
                let text = kind.unwrap_or_default();
                let kind = DeviationKind::from_description(&text).ok_or_else(|| {
                    Error::InvalidInput(format!("unknown deviation type {text:?}"))
                })?;
                Ok(DeviationEvent::new(start, end, kind)?)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DeviationTable::from_rows(rows))
    }
}

/// One `(timestamp, names)` entry per distinct timestamp of a sorted log;
/// events charted at the same instant are joined as `"Sedation|Mannitol"`
fn names_by_timestamp(log: &EventLog) -> Vec<(NaiveDateTime, String)> {
    let mut grouped: Vec<(NaiveDateTime, String)> = Vec::with_capacity(log.len());
    for event in log {
        if let Some((_, names)) = grouped
            .last_mut()
            .filter(|(timestamp, _)| *timestamp == event.timestamp)
        {
            names.push('|');
            names.push_str(&event.name);
            continue;
        }
        grouped.push((event.timestamp, event.name.clone()));
    }
    grouped
}

impl EpisodeFrameExt for DataFrame {
    fn attach_event_frame(&self, events: &DataFrame, column: &str) -> Result<DataFrame> {
        let episodes = EpisodeTable::from_frame(self)?;
        let log = EventLog::from_frame(events)?.sorted();
        let attached = episodes
            .attach(names_by_timestamp(&log), column)?
            .map_events(|(_, names)| names);
        debug!(
            column,
            unattached = attached.unattached().len(),
            "attached event frame to episodes"
        );

        let attached_frame = attached.to_frame()?;
        let mut out = self.clone();
        out.with_column(attached_frame.column(column)?.clone())?;
        out.with_column(attached_frame.column(&values_column(column))?.clone())?;
        Ok(out)
    }

    fn deviations(&self, column: &str, allowed_gap: TimeDelta) -> Result<DataFrame> {
        if !has_column(self, column) {
            warn!(column, "attached-events column not found; attach events first");
            return Ok(self.clone());
        }
        let attached = attached_timestamps_from_frame(self, column)?;
        let detector = DeviationDetector::new(DeviationParameters { allowed_gap })?;
        detector.detect(&attached).to_frame()
    }

    fn with_event_counts(&self, column: &str) -> Result<DataFrame> {
        if !has_column(self, column) {
            warn!(column, "attached-events column not found; attach events first");
            return Ok(self.clone());
        }
        let counts: Vec<u32> = read_list(require(self, column)?)?
            .iter()
            .map(|row| row.as_ref().map_or(0, |inner| inner.len() as u32))
            .collect();
        let mut out = self.clone();
        out.with_column(Series::new(counts_column(column).into(), counts))?;
        Ok(out)
    }

    fn prolonged(&self, min_duration: TimeDelta) -> Result<DataFrame> {
        let mask: BooleanChunked = read_episodes(self)?
            .iter()
            .map(|episode| episode.duration() > min_duration)
            .collect();
        Ok(self.filter(&mask)?)
    }
}
