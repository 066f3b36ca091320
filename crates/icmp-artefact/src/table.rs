//! Collections of artefacts and the ways to build them

use crate::types::{Artefact, SignalLabel};
use chrono::{Local, NaiveDateTime, TimeDelta};
use icmp_core::duration::parse_duration;
use icmp_core::{Error, Result};
use icmp_episode::EpisodeTable;
use std::fmt;
use tracing::debug;

/// Author recorded on artefacts when none is given
pub const DEFAULT_MODIFIED_BY: &str = "icmp-artefact";

/// How flagged timestamps are grouped into artefact intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingParameters {
    /// Consecutive timestamps no further apart than this share an interval
    pub interval: TimeDelta,
    /// Widen each interval this much before its first timestamp
    pub window_before: TimeDelta,
    /// Widen each interval this much after its last timestamp
    pub window_after: TimeDelta,
}

impl Default for GroupingParameters {
    fn default() -> Self {
        Self {
            interval: TimeDelta::seconds(10),
            window_before: TimeDelta::seconds(5),
            window_after: TimeDelta::seconds(5),
        }
    }
}

impl GroupingParameters {
    pub fn parse(interval: &str, window_before: &str, window_after: &str) -> Result<Self> {
        let params = Self {
            interval: parse_duration(interval)?,
            window_before: parse_duration(window_before)?,
            window_after: parse_duration(window_after)?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Intervals exactly as flagged, without widening
    pub fn exact(interval: TimeDelta) -> Self {
        Self {
            interval,
            window_before: TimeDelta::zero(),
            window_after: TimeDelta::zero(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("interval", self.interval),
            ("window_before", self.window_before),
            ("window_after", self.window_after),
        ] {
            if value < TimeDelta::zero() {
                return Err(Error::InvalidParameter(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn shifted(timestamp: NaiveDateTime, delta: TimeDelta) -> Result<NaiveDateTime> {
    timestamp.checked_add_signed(delta).ok_or_else(|| {
        Error::InvalidInput(format!("{timestamp} shifted by {delta} is out of range"))
    })
}

/// Group timestamps (any order) into widened `(start, end)` intervals.
///
/// A timestamp more than `interval` after its predecessor opens a new group.
/// Fails with `InvalidInput` when widening leaves the representable range.
pub fn group_timestamps(
    timestamps: impl IntoIterator<Item = NaiveDateTime>,
    params: &GroupingParameters,
) -> Result<Vec<(NaiveDateTime, NaiveDateTime)>> {
    let mut sorted: Vec<NaiveDateTime> = timestamps.into_iter().collect();
    sorted.sort_unstable();

    let widen = |start: NaiveDateTime, end: NaiveDateTime| -> Result<(NaiveDateTime, NaiveDateTime)> {
        Ok((shifted(start, -params.window_before)?, shifted(end, params.window_after)?))
    };

    let mut groups = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Ok(groups);
    };
    let (mut start, mut current) = (first, first);
    for next in iter {
        // an unrepresentable limit never splits
        let splits = current
            .checked_add_signed(params.interval)
            .is_some_and(|limit| next > limit);
        if splits {
            groups.push(widen(start, current)?);
            start = next;
        }
        current = next;
    }
    groups.push(widen(start, current)?);
    Ok(groups)
}

/// Artefact annotations for one recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactTable {
    modified_by: String,
    rows: Vec<Artefact>,
}

impl Default for ArtefactTable {
    fn default() -> Self {
        Self::new(DEFAULT_MODIFIED_BY)
    }
}

impl ArtefactTable {
    /// Empty table whose new entries are attributed to `modified_by`
    pub fn new(modified_by: impl Into<String>) -> Self {
        Self {
            modified_by: modified_by.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(modified_by: impl Into<String>, rows: Vec<Artefact>) -> Self {
        Self {
            modified_by: modified_by.into(),
            rows,
        }
    }

    /// Intervals grouped from flagged timestamps
    pub fn from_timestamps(
        signal: impl Into<SignalLabel>,
        timestamps: impl IntoIterator<Item = NaiveDateTime>,
        params: &GroupingParameters,
        modified_by: impl Into<String>,
        modified_date: NaiveDateTime,
    ) -> Result<Self> {
        let mut table = Self::new(modified_by);
        table.extend_from_timestamps(signal, timestamps, params, modified_date)?;
        Ok(table)
    }

    /// One artefact per episode
    pub fn from_episodes(
        signal: impl Into<SignalLabel>,
        episodes: &EpisodeTable,
        modified_by: impl Into<String>,
        modified_date: NaiveDateTime,
    ) -> Result<Self> {
        let signal = signal.into();
        let mut table = Self::new(modified_by);
        for episode in episodes {
            table.push_interval(signal.clone(), episode.start(), episode.end(), modified_date)?;
        }
        Ok(table)
    }

    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    pub fn rows(&self) -> &[Artefact] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artefact> {
        self.rows.iter()
    }

    pub fn push(&mut self, artefact: Artefact) {
        self.rows.push(artefact);
    }

    /// Append a single interval attributed to this table's author
    pub fn push_interval(
        &mut self,
        signal: impl Into<SignalLabel>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        modified_date: NaiveDateTime,
    ) -> Result<()> {
        let artefact = Artefact::new(signal, self.modified_by.clone(), modified_date, start, end)?;
        self.rows.push(artefact);
        Ok(())
    }

    /// Append a single interval stamped with the current local time
    pub fn push_interval_now(
        &mut self,
        signal: impl Into<SignalLabel>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()> {
        self.push_interval(signal, start, end, Local::now().naive_local())
    }

    /// Append intervals grouped from flagged timestamps
    pub fn extend_from_timestamps(
        &mut self,
        signal: impl Into<SignalLabel>,
        timestamps: impl IntoIterator<Item = NaiveDateTime>,
        params: &GroupingParameters,
        modified_date: NaiveDateTime,
    ) -> Result<()> {
        params.validate()?;
        let signal = signal.into();
        let groups = group_timestamps(timestamps, params)?;
        debug!(signal = %signal, intervals = groups.len(), "grouped artefact timestamps");
        for (start, end) in groups {
            self.push_interval(signal.clone(), start, end, modified_date)?;
        }
        Ok(())
    }

    /// Distinct signal labels in order of first appearance
    pub fn signals(&self) -> Vec<&SignalLabel> {
        let mut seen: Vec<&SignalLabel> = Vec::new();
        for artefact in &self.rows {
            if !seen.contains(&&artefact.signal) {
                seen.push(&artefact.signal);
            }
        }
        seen
    }

    pub fn for_signal<'a>(&'a self, signal: &'a SignalLabel) -> impl Iterator<Item = &'a Artefact> + 'a {
        self.rows.iter().filter(move |artefact| &artefact.signal == signal)
    }

    /// Whether `timestamp` falls inside an artefact for `signal` or a global one
    pub fn covers(&self, signal: &SignalLabel, timestamp: NaiveDateTime) -> bool {
        self.rows.iter().any(|artefact| {
            (artefact.signal.is_global() || &artefact.signal == signal)
                && artefact.start <= timestamp
                && timestamp <= artefact.end
        })
    }

    pub fn into_inner(self) -> Vec<Artefact> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ArtefactTable {
    type Item = &'a Artefact;
    type IntoIter = std::slice::Iter<'a, Artefact>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for ArtefactTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Artefacts: {}", self.len())?;
        for artefact in &self.rows {
            writeln!(f, "  {artefact}")?;
        }
        Ok(())
    }
}
