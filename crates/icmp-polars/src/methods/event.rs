//! Event log frames

use super::columns::{
    datetime_column, datetime_series, has_column, read_required_timestamps, read_strings,
    read_timestamps, require,
};
use crate::config::event::{CATEGORY, COMMENTS, END, FIELDS, GROUP, NAME, SOURCE, START};
use crate::{Error, EventFrameExt, FromFrame, Result, ToFrame};
use icmp_core::{DataField, Event, EventLog};
use polars::prelude::*;
use tracing::debug;

fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

/// Values of an optional string column, all `None` when it is absent
fn optional_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if has_column(df, name) {
        read_strings(require(df, name)?)
    } else {
        Ok(vec![None; df.height()])
    }
}

impl ToFrame for EventLog {
    fn to_frame(&self) -> Result<DataFrame> {
        let strings = |project: fn(&Event) -> Option<String>| -> Vec<Option<String>> {
            self.iter().map(project).collect()
        };

        Ok(DataFrame::new(vec![
            string_column(SOURCE, strings(|e| e.source.clone())),
            string_column(GROUP, strings(|e| e.group.clone())),
            string_column(NAME, strings(|e| Some(e.name.clone()))),
            string_column(CATEGORY, strings(|e| e.category.clone())),
            datetime_column(START, self.iter().map(|e| e.timestamp))?,
            datetime_series(END, self.iter().map(|e| e.end_time))?.into(),
            string_column(FIELDS, strings(|e| DataField::format_list(&e.fields))),
            string_column(COMMENTS, strings(|e| e.comment.clone())),
        ])?)
    }
}

impl FromFrame for EventLog {
    /// Only `StartTime` and `EventName` are required; other columns may be absent
    fn from_frame(df: &DataFrame) -> Result<Self> {
        let starts = read_required_timestamps(require(df, START)?)?;
        let names = read_strings(require(df, NAME)?)?;
        let ends = if has_column(df, END) {
            read_timestamps(require(df, END)?)?
        } else {
            vec![None; df.height()]
        };
        let sources = optional_strings(df, SOURCE)?;
        let groups = optional_strings(df, GROUP)?;
        let categories = optional_strings(df, CATEGORY)?;
        let fields = optional_strings(df, FIELDS)?;
        let comments = optional_strings(df, COMMENTS)?;

        let mut events = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let name = names[row].clone().ok_or_else(|| {
                Error::InvalidInput(format!("{NAME}: null event name in row {row}"))
            })?;
            let fields = match &fields[row] {
                Some(text) => DataField::parse_list(text)?,
                None => Vec::new(),
            };
            events.push(Event {
                timestamp: starts[row],
                name,
                group: groups[row].clone(),
                category: categories[row].clone(),
                end_time: ends[row],
                fields,
                comment: comments[row].clone(),
                source: sources[row].clone(),
            });
        }
        Ok(EventLog::new(events))
    }
}

impl EventFrameExt for DataFrame {
    fn with_event_names(&self, names: &[&str]) -> Result<DataFrame> {
        let mask: BooleanChunked = read_strings(require(self, NAME)?)?
            .iter()
            .map(|name| name.as_deref().is_some_and(|name| names.contains(&name)))
            .collect();
        Ok(self.filter(&mask)?)
    }

    fn data_field_table(&self) -> Result<DataFrame> {
        let log = EventLog::from_frame(self)?;
        let (names, values) = log.field_table();
        debug!(events = log.len(), fields = names.len(), "expanded event data fields");

        let mut columns = Vec::with_capacity(names.len() + 1);
        columns.push(datetime_column(START, log.iter().map(|e| e.timestamp))?);
        for (name, column) in names.iter().zip(values) {
            columns.push(string_column(name, column));
        }
        Ok(DataFrame::new(columns)?)
    }
}
