//! Protocol-deviation detection
//!
//! Inside each episode the points `[start, event timestamps..., end]` are
//! walked pairwise. Every pair further apart than `allowed_gap` is a period in
//! which no corrective action was logged.

use crate::traits::ConfigurableDetector;
use crate::types::{AttachedEpisode, AttachedEpisodes, Episode};
use chrono::{NaiveDateTime, TimeDelta};
use icmp_core::duration::{format_duration, parse_duration, serde_str};
use icmp_core::time::to_micros;
use icmp_core::{AnalysisConfig, Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// Where in its episode a deviation lies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DeviationKind {
    /// No event was logged during the whole episode
    EmptyEpisode,
    /// From the episode start to the first event
    LeadingGap,
    /// From the last event to the episode end
    TrailingGap,
    /// Between two events
    InteriorGap,
}

impl DeviationKind {
    pub const ALL: [DeviationKind; 4] = [
        DeviationKind::EmptyEpisode,
        DeviationKind::LeadingGap,
        DeviationKind::TrailingGap,
        DeviationKind::InteriorGap,
    ];

    /// Human-readable label used in reports and tables
    pub fn description(&self) -> &'static str {
        match self {
            DeviationKind::EmptyEpisode => "Empty Episode",
            DeviationKind::LeadingGap => "From start of episode to first intervention logged",
            DeviationKind::TrailingGap => "From last intervention logged to end of episode",
            DeviationKind::InteriorGap => "Between interventions",
        }
    }

    /// Inverse of [`description`](Self::description)
    pub fn from_description(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.description() == text.trim())
    }

    /// Classify a gap by exact microsecond equality against the episode bounds
    pub fn classify(episode: &Episode, gap_start: NaiveDateTime, gap_end: NaiveDateTime) -> Self {
        let at_start = to_micros(gap_start) == to_micros(episode.start());
        let at_end = to_micros(gap_end) == to_micros(episode.end());
        match (at_start, at_end) {
            (true, true) => DeviationKind::EmptyEpisode,
            (true, false) => DeviationKind::LeadingGap,
            (false, true) => DeviationKind::TrailingGap,
            (false, false) => DeviationKind::InteriorGap,
        }
    }
}

impl fmt::Display for DeviationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A stretch of an episode without any logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviationEvent {
    /// Last valid event time, or the episode start
    pub start: NaiveDateTime,
    #[serde(with = "serde_str")]
    pub duration: TimeDelta,
    /// Time at which the deviation is recognised
    pub end: NaiveDateTime,
    pub kind: DeviationKind,
}

impl DeviationEvent {
    /// Build a deviation, checking that the triple is consistent
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, kind: DeviationKind) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "deviation ends at {end} before it starts at {start}"
            )));
        }
        Ok(Self {
            start,
            duration: end - start,
            end,
            kind,
        })
    }
}

impl fmt::Display for DeviationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}): {}",
            self.start,
            self.end,
            format_duration(self.duration),
            self.kind
        )
    }
}

/// Deviation detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviationParameters {
    /// Longest tolerated stretch without a logged event
    pub allowed_gap: TimeDelta,
}

impl Default for DeviationParameters {
    fn default() -> Self {
        Self {
            allowed_gap: TimeDelta::minutes(30),
        }
    }
}

impl DeviationParameters {
    /// Hourly-observation protocols: flag any stretch longer than 15 minutes
    pub fn strict() -> Self {
        Self {
            allowed_gap: TimeDelta::minutes(15),
        }
    }

    /// Tolerate up to an hour between logged interventions
    pub fn relaxed() -> Self {
        Self {
            allowed_gap: TimeDelta::hours(1),
        }
    }

    pub fn parse(allowed_gap: &str) -> Result<Self> {
        let params = Self {
            allowed_gap: parse_duration(allowed_gap)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            allowed_gap: config.allowed_gap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.allowed_gap < TimeDelta::zero() {
            return Err(Error::InvalidParameter(format!(
                "allowed_gap must not be negative, got {}",
                self.allowed_gap
            )));
        }
        Ok(())
    }
}

/// Finds gaps longer than the allowed duration inside attached episodes
#[derive(Debug, Clone, Default)]
pub struct DeviationDetector {
    params: DeviationParameters,
}

impl DeviationDetector {
    pub fn new(params: DeviationParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Deviations of a single episode, in time order
    pub fn detect_episode<E>(&self, row: &AttachedEpisode<E>) -> Vec<DeviationEvent> {
        let episode = &row.episode;
        let Some(events) = row.events.as_ref().filter(|events| !events.is_empty()) else {
            return vec![DeviationEvent {
                start: episode.start(),
                duration: episode.duration(),
                end: episode.end(),
                kind: DeviationKind::EmptyEpisode,
            }];
        };

        let points: Vec<NaiveDateTime> = std::iter::once(episode.start())
            .chain(events.keys().copied())
            .chain(std::iter::once(episode.end()))
            .collect();

        points
            .windows(2)
            .filter(|pair| pair[1] - pair[0] > self.params.allowed_gap)
            .map(|pair| DeviationEvent {
                start: pair[0],
                duration: pair[1] - pair[0],
                end: pair[1],
                kind: DeviationKind::classify(episode, pair[0], pair[1]),
            })
            .collect()
    }

    /// Deviations across all episodes, sorted by gap start
    #[instrument(level = "debug", skip_all, fields(column = attached.column(), episodes = attached.len()))]
    pub fn detect<E>(&self, attached: &AttachedEpisodes<E>) -> DeviationTable {
        let rows: Vec<DeviationEvent> = attached
            .iter()
            .flat_map(|row| self.detect_episode(row))
            .collect();
        let table = DeviationTable::from_rows(rows);
        debug!(
            deviations = table.len(),
            empty = table.of_kind(DeviationKind::EmptyEpisode).count(),
            "detected protocol deviations"
        );
        table
    }
}

impl ConfigurableDetector for DeviationDetector {
    type Parameters = DeviationParameters;

    fn with_parameters(params: Self::Parameters) -> Result<Self> {
        Self::new(params)
    }

    fn parameters(&self) -> &Self::Parameters {
        &self.params
    }

    fn set_parameters(&mut self, params: Self::Parameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

impl<E> AttachedEpisodes<E> {
    /// Run deviation detection with the given allowed gap
    pub fn deviations(&self, allowed_gap: TimeDelta) -> Result<DeviationTable> {
        Ok(DeviationDetector::new(DeviationParameters { allowed_gap })?.detect(self))
    }
}

/// Deviations ordered by start time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviationTable {
    rows: Vec<DeviationEvent>,
}

impl DeviationTable {
    /// Sort rows by start; rows with equal starts keep their order
    pub fn from_rows(mut rows: Vec<DeviationEvent>) -> Self {
        rows.sort_by_key(|row| row.start);
        Self { rows }
    }

    pub fn rows(&self) -> &[DeviationEvent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviationEvent> {
        self.rows.iter()
    }

    pub fn of_kind(&self, kind: DeviationKind) -> impl Iterator<Item = &DeviationEvent> + '_ {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    pub fn total_duration(&self) -> TimeDelta {
        self.rows
            .iter()
            .fold(TimeDelta::zero(), |total, row| total + row.duration)
    }

    pub fn into_inner(self) -> Vec<DeviationEvent> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a DeviationTable {
    type Item = &'a DeviationEvent;
    type IntoIter = std::slice::Iter<'a, DeviationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for DeviationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deviations: {}", self.len())?;
        for row in &self.rows {
            writeln!(f, "  {row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EpisodeTable;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + TimeDelta::minutes(minutes)
    }

    fn row(start: i64, end: i64, events: &[i64]) -> AttachedEpisode<()> {
        AttachedEpisode {
            episode: Episode::new(t(start), t(end)).unwrap(),
            events: (!events.is_empty())
                .then(|| events.iter().map(|&m| (t(m), ())).collect::<BTreeMap<_, _>>()),
        }
    }

    fn detector(minutes: i64) -> DeviationDetector {
        DeviationDetector::new(DeviationParameters {
            allowed_gap: TimeDelta::minutes(minutes),
        })
        .unwrap()
    }

    #[test]
    fn test_leading_gap() {
        let deviations = detector(30).detect_episode(&row(0, 60, &[50]));
        assert_eq!(
            deviations,
            vec![DeviationEvent {
                start: t(0),
                duration: TimeDelta::minutes(50),
                end: t(50),
                kind: DeviationKind::LeadingGap,
            }]
        );
    }

    #[test]
    fn test_empty_episode_spans_whole_episode() {
        let deviations = detector(30).detect_episode(&row(0, 10, &[]));
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0].kind, DeviationKind::EmptyEpisode);
        assert_eq!(deviations[0].duration, TimeDelta::minutes(10));
    }

    #[test]
    fn test_trailing_and_interior_gaps() {
        let deviations = detector(30).detect_episode(&row(0, 200, &[10, 60, 80]));
        let kinds: Vec<_> = deviations.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DeviationKind::InteriorGap, DeviationKind::TrailingGap]);
        assert_eq!(deviations[0].start, t(10));
        assert_eq!(deviations[0].end, t(60));
        assert_eq!(deviations[1].duration, TimeDelta::minutes(120));
    }

    #[test]
    fn test_gap_equal_to_allowed_is_tolerated() {
        assert!(detector(30).detect_episode(&row(0, 60, &[30])).is_empty());
    }

    #[test]
    fn test_event_on_episode_start() {
        let deviations = detector(0).detect_episode(&row(0, 10, &[0]));
        // (start, start) is never longer than the allowance; the remaining
        // pair touches both bounds, so it classifies as an empty episode
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0].kind, DeviationKind::EmptyEpisode);

        let deviations = detector(0).detect_episode(&row(0, 10, &[0, 4]));
        let kinds: Vec<_> = deviations.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DeviationKind::LeadingGap, DeviationKind::TrailingGap]);
    }

    #[test]
    fn test_table_sorted_across_episodes() {
        let episodes = EpisodeTable::new(vec![
            Episode::new(t(0), t(60)).unwrap(),
            Episode::new(t(100), t(110)).unwrap(),
        ])
        .unwrap();
        let attached = episodes
            .attach(vec![(t(5), ()), (t(50), ())], "Interventions")
            .unwrap();
        let table = attached.deviations(TimeDelta::minutes(30)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].kind, DeviationKind::InteriorGap);
        assert_eq!(table.rows()[1].kind, DeviationKind::EmptyEpisode);
        assert_eq!(table.total_duration(), TimeDelta::minutes(55));
    }

    #[test]
    fn test_descriptions_round_trip() {
        for kind in DeviationKind::ALL {
            assert_eq!(DeviationKind::from_description(kind.description()), Some(kind));
        }
        assert_eq!(DeviationKind::from_description("nope"), None);
        assert_eq!(DeviationKind::EmptyEpisode.to_string(), "Empty Episode");
    }

    #[test]
    fn test_negative_allowed_gap_rejected() {
        assert!(DeviationParameters::parse("-5min").is_err());
        assert_eq!(
            DeviationParameters::parse("0day 00:30:00").unwrap(),
            DeviationParameters::default()
        );
    }

    #[test]
    fn test_presets_bracket_default() {
        let default = DeviationParameters::default().allowed_gap;
        assert!(DeviationParameters::strict().allowed_gap < default);
        assert!(DeviationParameters::relaxed().allowed_gap > default);
        assert!(DeviationParameters::strict().validate().is_ok());
    }
}
