//! Discrete clinical events
//!
//! Events come from ICM+ event logs (CSV/XML/HDF5 adapters). Every attribute
//! other than the timestamp and name is optional and stays `None` when the
//! source omits it.

use crate::series::TimeSeries;
use crate::{Error, Result};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything positioned at a single instant
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
}

impl<V> Timestamped for (NaiveDateTime, V) {
    fn timestamp(&self) -> NaiveDateTime {
        self.0
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> NaiveDateTime {
        (**self).timestamp()
    }
}

/// One `Name:Value` entry of an event's structured field list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    pub value: String,
}

impl DataField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the ICM+ field list form `"[Dose:10|Drug:Mannitol]"`.
    ///
    /// An empty list (`""` or `"[]"`) yields no fields.
    pub fn parse_list(text: &str) -> Result<Vec<DataField>> {
        let inner = text.trim().trim_start_matches('[').trim_end_matches(']').trim();
        if inner.is_empty() {
            return Ok(Vec::new());
        }
        inner
            .split('|')
            .map(|item| {
                item.split_once(':')
                    .map(|(name, value)| DataField::new(name.trim(), value.trim()))
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("data field {item:?} has no ':' separator"))
                    })
            })
            .collect()
    }

    /// Render fields back to the bracketed form; `None` when there are none
    pub fn format_list(fields: &[DataField]) -> Option<String> {
        if fields.is_empty() {
            return None;
        }
        let body: Vec<String> = fields
            .iter()
            .map(|field| format!("{}:{}", field.name, field.value))
            .collect();
        Some(format!("[{}]", body.join("|")))
    }
}

/// A timestamped clinical occurrence (intervention, observation, note)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub group: Option<String>,
    pub category: Option<String>,
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub fields: Vec<DataField>,
    pub comment: Option<String>,
    /// Recording the event was read from
    pub source: Option<String>,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, name: impl Into<String>) -> Self {
        Self {
            timestamp,
            name: name.into(),
            group: None,
            category: None,
            end_time: None,
            fields: Vec::new(),
            comment: None,
            source: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_fields(mut self, fields: Vec<DataField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Value of a structured field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Span of an event with an end time
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end_time.map(|end| end - self.timestamp)
    }
}

impl Timestamped for Event {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// An event log in whatever order the source produced it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Stable sort by timestamp
    pub fn sorted(mut self) -> Self {
        self.events.sort_by_key(|event| event.timestamp);
        self
    }

    /// Whether timestamps are strictly increasing, as reconciliation requires
    pub fn is_strictly_increasing(&self) -> bool {
        self.events
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp)
    }

    /// Keep events matching a predicate
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Event) -> bool,
    {
        Self::new(
            self.events
                .iter()
                .filter(|event| predicate(event))
                .cloned()
                .collect(),
        )
    }

    /// Keep events whose name is one of `names` (e.g. a tier of interventions)
    pub fn with_names(&self, names: &[&str]) -> Self {
        self.filter(|event| names.contains(&event.name.as_str()))
    }

    /// Project the log onto a timestamp-indexed stream.
    ///
    /// Fails with `InvalidInput` when two events share a timestamp or the
    /// log is unsorted.
    pub fn stream<V, F>(&self, name: impl Into<String>, project: F) -> Result<TimeSeries<V>>
    where
        F: FnMut(&Event) -> V,
    {
        let timestamps = self.events.iter().map(|event| event.timestamp).collect();
        let values = self.events.iter().map(project).collect();
        TimeSeries::new(name, timestamps, values)
    }

    /// Field names in order of first appearance
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for field in self.events.iter().flat_map(|event| &event.fields) {
            if !names.contains(&field.name) {
                names.push(field.name.clone());
            }
        }
        names
    }

    /// Wide table of structured fields: one column per field name, one row
    /// per event, `None` where an event lacks the field
    pub fn field_table(&self) -> (Vec<String>, Vec<Vec<Option<String>>>) {
        let names = self.field_names();
        let position: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        let mut columns: Vec<Vec<Option<String>>> = vec![vec![None; self.events.len()]; names.len()];
        for (row, event) in self.events.iter().enumerate() {
            for field in &event.fields {
                if let Some(&column) = position.get(field.name.as_str()) {
                    columns[column][row] = Some(field.value.clone());
                }
            }
        }
        (names, columns)
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for EventLog {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
