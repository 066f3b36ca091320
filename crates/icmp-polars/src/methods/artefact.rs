//! Artefact frames

use super::columns::{datetime_column, has_column, read_required_timestamps, read_strings, require};
use crate::config::artefact::{END, ESSENTIAL, MODIFIED_BY, MODIFIED_DATE, SIGNAL, START};
use crate::{Error, FromFrame, Result, ToFrame};
use icmp_artefact::{Artefact, ArtefactTable, DEFAULT_MODIFIED_BY};
use polars::prelude::*;

fn signal_columns(table: &ArtefactTable) -> [Column; 2] {
    let signals: Vec<&str> = table.iter().map(|a| a.signal.as_str()).collect();
    let authors: Vec<&str> = table.iter().map(|a| a.modified_by.as_str()).collect();
    [
        Series::new(SIGNAL.into(), signals).into(),
        Series::new(MODIFIED_BY.into(), authors).into(),
    ]
}

impl ToFrame for ArtefactTable {
    fn to_frame(&self) -> Result<DataFrame> {
        let [signals, authors] = signal_columns(self);
        Ok(DataFrame::new(vec![
            signals,
            authors,
            datetime_column(MODIFIED_DATE, self.iter().map(|a| a.modified_date))?,
            datetime_column(START, self.iter().map(|a| a.start))?,
            datetime_column(END, self.iter().map(|a| a.end))?,
        ])?)
    }
}

impl FromFrame for ArtefactTable {
    /// Reads datetime or day-first text timestamps.
    ///
    /// Fails with `MissingColumn` naming the first essential column absent.
    fn from_frame(df: &DataFrame) -> Result<Self> {
        if let Some(missing) = ESSENTIAL.iter().find(|name| !has_column(df, name)) {
            return Err(Error::MissingColumn(missing.to_string()));
        }

        let signals = read_strings(require(df, SIGNAL)?)?;
        let authors = read_strings(require(df, MODIFIED_BY)?)?;
        let modified = read_required_timestamps(require(df, MODIFIED_DATE)?)?;
        let starts = read_required_timestamps(require(df, START)?)?;
        let ends = read_required_timestamps(require(df, END)?)?;

        let mut rows = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let signal = signals[row].clone().ok_or_else(|| {
                Error::InvalidInput(format!("{SIGNAL}: null signal label in row {row}"))
            })?;
            let author = authors[row].clone().unwrap_or_default();
            rows.push(Artefact::new(signal, author, modified[row], starts[row], ends[row])?);
        }

        let modified_by = rows
            .first()
            .map_or(DEFAULT_MODIFIED_BY, |a| a.modified_by.as_str())
            .to_string();
        Ok(ArtefactTable::from_rows(modified_by, rows))
    }
}

/// Artefact frame with timestamps rendered as artefact-file text
/// (`dd/mm/YYYY HH:MM:SS.mmm`, modification date without milliseconds)
pub fn artefact_text_frame(table: &ArtefactTable) -> Result<DataFrame> {
    let [signals, authors] = signal_columns(table);
    let text = |name: &str, render: fn(&Artefact) -> String| -> Column {
        let values: Vec<String> = table.iter().map(render).collect();
        Series::new(name.into(), values).into()
    };
    Ok(DataFrame::new(vec![
        signals,
        authors,
        text(MODIFIED_DATE, Artefact::modified_date_text),
        text(START, Artefact::start_text),
        text(END, Artefact::end_text),
    ])?)
}
