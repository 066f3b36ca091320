//! Types used for episode detection and reconciliation

use chrono::{NaiveDateTime, TimeDelta};
use icmp_core::duration::{format_duration, serde_str};
use icmp_core::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A contiguous interval during which an indicator held
///
/// `end == start + duration` always holds; the fields are private so the
/// triple cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Episode {
    start: NaiveDateTime,
    #[serde(with = "serde_str")]
    duration: TimeDelta,
    end: NaiveDateTime,
}

impl Episode {
    /// Create an episode from its bounds
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "episode ends at {end} before it starts at {start}"
            )));
        }
        Ok(Self::spanning(start, end))
    }

    /// Create an episode from its start and duration
    pub fn from_start(start: NaiveDateTime, duration: TimeDelta) -> Result<Self> {
        if duration < TimeDelta::zero() {
            return Err(Error::InvalidInput(format!(
                "episode duration {duration} is negative"
            )));
        }
        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| Error::InvalidInput(format!("episode end overflows from {start}")))?;
        Ok(Self::spanning(start, end))
    }

    // callers guarantee start <= end
    pub(crate) fn spanning(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            duration: end - start,
            end,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    /// Whether `timestamp` lies in `[start, end]`
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {{ {} -> {}, {} }}",
            self.start,
            self.end,
            format_duration(self.duration)
        )
    }
}

/// Ordered, non-overlapping collection of episodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeTable {
    episodes: Vec<Episode>,
}

impl EpisodeTable {
    /// Create a table, checking that episodes are ordered and disjoint
    pub fn new(episodes: Vec<Episode>) -> Result<Self> {
        for pair in episodes.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(Error::InvalidInput(format!(
                    "episodes must be ordered and non-overlapping: {} starts before {} ends",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(Self { episodes })
    }

    // segmenter output is ordered and disjoint by construction
    pub(crate) fn from_ordered(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Episode> {
        self.episodes.iter()
    }

    /// Episodes lasting strictly longer than `min_duration`
    pub fn prolonged(&self, min_duration: TimeDelta) -> Self {
        Self {
            episodes: self
                .episodes
                .iter()
                .filter(|episode| episode.duration > min_duration)
                .copied()
                .collect(),
        }
    }

    /// Sum of all episode durations
    pub fn total_duration(&self) -> TimeDelta {
        self.episodes
            .iter()
            .fold(TimeDelta::zero(), |total, episode| total + episode.duration)
    }

    /// Episode containing `timestamp`, if any
    pub fn find(&self, timestamp: NaiveDateTime) -> Option<&Episode> {
        let index = self
            .episodes
            .partition_point(|episode| episode.end < timestamp);
        self.episodes
            .get(index)
            .filter(|episode| episode.contains(timestamp))
    }

    pub fn into_inner(self) -> Vec<Episode> {
        self.episodes
    }
}

impl<'a> IntoIterator for &'a EpisodeTable {
    type Item = &'a Episode;
    type IntoIter = std::slice::Iter<'a, Episode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}

impl fmt::Display for EpisodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Episodes: {}", self.len())?;
        for episode in &self.episodes {
            writeln!(f, "  {episode}")?;
        }
        Ok(())
    }
}

/// An episode with the events that fell inside it
///
/// `events` is `None` when nothing was attached; an empty map never occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedEpisode<E> {
    pub episode: Episode,
    pub events: Option<BTreeMap<NaiveDateTime, E>>,
}

impl<E> AttachedEpisode<E> {
    pub fn event_count(&self) -> usize {
        self.events.as_ref().map_or(0, BTreeMap::len)
    }

    /// Attached timestamps in order
    pub fn event_timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.events.iter().flat_map(|events| events.keys().copied())
    }
}

/// Episodes with an attached-events column
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedEpisodes<E> {
    column: String,
    rows: Vec<AttachedEpisode<E>>,
    unattached: Vec<NaiveDateTime>,
}

impl<E> AttachedEpisodes<E> {
    pub(crate) fn new(
        column: String,
        rows: Vec<AttachedEpisode<E>>,
        unattached: Vec<NaiveDateTime>,
    ) -> Self {
        Self {
            column,
            rows,
            unattached,
        }
    }

    /// Rebuild from rows, checking episode order
    pub fn from_rows(column: impl Into<String>, rows: Vec<AttachedEpisode<E>>) -> Result<Self> {
        EpisodeTable::new(rows.iter().map(|row| row.episode).collect())?;
        for row in &rows {
            if let Some(events) = &row.events {
                if events.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "{} has an empty event mapping; use None instead",
                        row.episode
                    )));
                }
                if let Some(outside) = events.keys().find(|ts| !row.episode.contains(**ts)) {
                    return Err(Error::InvalidInput(format!(
                        "event at {outside} lies outside {}",
                        row.episode
                    )));
                }
            }
        }
        Ok(Self::new(column.into(), rows, Vec::new()))
    }

    /// Name of the attached-events column
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn rows(&self) -> &[AttachedEpisode<E>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttachedEpisode<E>> {
        self.rows.iter()
    }

    /// Timestamps of events that fell outside every episode
    pub fn unattached(&self) -> &[NaiveDateTime] {
        &self.unattached
    }

    /// The episodes without their events
    pub fn episodes(&self) -> EpisodeTable {
        EpisodeTable::from_ordered(self.rows.iter().map(|row| row.episode).collect())
    }

    /// Episodes with nothing attached
    pub fn without_events(&self) -> EpisodeTable {
        EpisodeTable::from_ordered(
            self.rows
                .iter()
                .filter(|row| row.events.is_none())
                .map(|row| row.episode)
                .collect(),
        )
    }

    /// Number of attached events per episode (0 when absent)
    pub fn event_counts(&self) -> Vec<usize> {
        self.rows.iter().map(AttachedEpisode::event_count).collect()
    }

    /// Keep only rows whose episode lasts strictly longer than `min_duration`
    pub fn prolonged(self, min_duration: TimeDelta) -> Self {
        Self {
            rows: self
                .rows
                .into_iter()
                .filter(|row| row.episode.duration() > min_duration)
                .collect(),
            ..self
        }
    }

    /// Transform attached values, e.g. to keep only event names
    pub fn map_events<U, F>(self, mut f: F) -> AttachedEpisodes<U>
    where
        F: FnMut(E) -> U,
    {
        AttachedEpisodes {
            column: self.column,
            rows: self
                .rows
                .into_iter()
                .map(|row| AttachedEpisode {
                    episode: row.episode,
                    events: row.events.map(|events| {
                        events
                            .into_iter()
                            .map(|(timestamp, event)| (timestamp, f(event)))
                            .collect()
                    }),
                })
                .collect(),
            unattached: self.unattached,
        }
    }
}
