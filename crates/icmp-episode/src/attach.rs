//! Attach an event stream to the episodes containing each event
//!
//! Both inputs are sorted, so one forward sweep suffices: the event cursor is
//! shared across episodes and never rewinds.

use crate::types::{AttachedEpisode, AttachedEpisodes, EpisodeTable};
use chrono::NaiveDateTime;
use icmp_core::{Error, Result, Timestamped};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Attach events to the episodes whose `[start, end]` contains them.
///
/// Events must have strictly increasing timestamps; anything else fails with
/// `InvalidInput`. Episodes that receive no event get `None`, never an empty
/// mapping. Events outside every episode are reported by
/// [`AttachedEpisodes::unattached`].
#[instrument(level = "debug", skip_all, fields(episodes = episodes.len()))]
pub fn attach_events<E, I>(
    episodes: &EpisodeTable,
    events: I,
    column: impl Into<String>,
) -> Result<AttachedEpisodes<E>>
where
    I: IntoIterator<Item = E>,
    E: Timestamped,
{
    let column = column.into();
    let mut cursor = events.into_iter().peekable();
    let mut previous: Option<NaiveDateTime> = None;
    let mut unattached = Vec::new();
    let mut rows = Vec::with_capacity(episodes.len());
    let mut attached_total = 0usize;

    let mut check_order = |timestamp: NaiveDateTime| -> Result<()> {
        if let Some(prev) = previous {
            if timestamp <= prev {
                return Err(Error::unsorted("event", prev, timestamp));
            }
        }
        previous = Some(timestamp);
        Ok(())
    };

    for episode in episodes {
        let mut attached = BTreeMap::new();
        while let Some(event) = cursor.next_if(|event| event.timestamp() <= episode.end()) {
            let timestamp = event.timestamp();
            check_order(timestamp)?;
            if timestamp < episode.start() {
                unattached.push(timestamp);
            } else {
                attached.insert(timestamp, event);
            }
        }
        attached_total += attached.len();
        rows.push(AttachedEpisode {
            episode: *episode,
            events: (!attached.is_empty()).then_some(attached),
        });
    }

    for event in cursor {
        let timestamp = event.timestamp();
        check_order(timestamp)?;
        unattached.push(timestamp);
    }

    debug!(
        column = %column,
        attached = attached_total,
        unattached = unattached.len(),
        "attached events to episodes"
    );
    Ok(AttachedEpisodes::new(column, rows, unattached))
}

impl EpisodeTable {
    /// Attach an ordered event stream; see [`attach_events`]
    pub fn attach<E, I>(&self, events: I, column: impl Into<String>) -> Result<AttachedEpisodes<E>>
    where
        I: IntoIterator<Item = E>,
        E: Timestamped,
    {
        attach_events(self, events, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Episode;
    use chrono::{NaiveDate, TimeDelta};
    use icmp_core::Event;

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + TimeDelta::minutes(minutes)
    }

    fn table(bounds: &[(i64, i64)]) -> EpisodeTable {
        EpisodeTable::new(
            bounds
                .iter()
                .map(|&(start, end)| Episode::new(t(start), t(end)).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_events_land_in_containing_episode() {
        let episodes = table(&[(0, 10), (20, 30)]);
        let events = vec![(t(-5), "a"), (t(0), "b"), (t(10), "c"), (t(15), "d"), (t(25), "e"), (t(40), "f")];

        let attached = episodes.attach(events, "Interventions").unwrap();
        assert_eq!(attached.column(), "Interventions");

        let first = attached.rows()[0].events.as_ref().unwrap();
        assert_eq!(first.keys().copied().collect::<Vec<_>>(), vec![t(0), t(10)]);
        let second = attached.rows()[1].events.as_ref().unwrap();
        assert_eq!(second.values().map(|(_, v)| *v).collect::<Vec<_>>(), vec!["e"]);

        assert_eq!(attached.unattached(), &[t(-5), t(15), t(40)]);
        assert_eq!(attached.event_counts(), vec![2, 1]);
    }

    #[test]
    fn test_empty_episode_gets_none() {
        let episodes = table(&[(0, 10), (20, 30), (40, 50)]);
        let attached = episodes
            .attach(vec![(t(5), 1), (t(45), 2)], "Interventions")
            .unwrap();
        assert!(attached.rows()[1].events.is_none());
        assert_eq!(attached.without_events().len(), 1);
        assert_eq!(attached.without_events().episodes()[0].start(), t(20));
    }

    #[test]
    fn test_no_events() {
        let episodes = table(&[(0, 10)]);
        let attached = episodes.attach(Vec::<(NaiveDateTime, ())>::new(), "x").unwrap();
        assert!(attached.rows()[0].events.is_none());
        assert!(attached.unattached().is_empty());
    }

    #[test]
    fn test_unsorted_events_rejected() {
        let episodes = table(&[(0, 10), (20, 30)]);
        let err = episodes
            .attach(vec![(t(5), 1), (t(2), 2)], "x")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // order is checked for trailing events as well
        let err = episodes
            .attach(vec![(t(5), 1), (t(45), 2), (t(45), 3)], "x")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_attach_full_events_and_map_to_names() {
        let episodes = table(&[(0, 60)]);
        let log = vec![
            Event::new(t(10), "Sedation").with_category("Tier 1"),
            Event::new(t(50), "Hypertonic saline").with_category("Tier 2"),
        ];
        let attached = episodes.attach(log, "Interventions").unwrap();
        let names = attached.map_events(|event| event.name);
        let row = names.rows()[0].events.as_ref().unwrap();
        assert_eq!(row.get(&t(50)).map(String::as_str), Some("Hypertonic saline"));
    }
}
