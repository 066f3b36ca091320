//! Reading and writing typed columns

use crate::config::{TimeEncoding, TIME_UNIT};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use icmp_core::time::{from_micros, from_serial, parse_timestamp, to_micros};
use polars::prelude::*;

pub(crate) fn require<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| Error::MissingColumn(name.to_string()))
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

fn from_physical(raw: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(raw).naive_utc()),
        TimeUnit::Microseconds => from_micros(raw),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw).map(|dt| dt.naive_utc()),
    }
}

/// Timestamps of a datetime, day-first text or serial-date column; nulls stay `None`
pub(crate) fn read_timestamps(series: &Series) -> Result<Vec<Option<NaiveDateTime>>> {
    let name = series.name().to_string();
    let encoding = TimeEncoding::detect(series.dtype())
        .ok_or_else(|| Error::type_mismatch(&name, "datetime, string or serial date", series.dtype()))?;

    match encoding {
        TimeEncoding::Datetime(unit) => {
            let physical = series.cast(&DataType::Int64)?;
            physical
                .i64()?
                .into_iter()
                .map(|raw| {
                    raw.map(|raw| {
                        from_physical(raw, unit).ok_or_else(|| {
                            Error::InvalidInput(format!("{name}: timestamp {raw} out of range"))
                        })
                    })
                    .transpose()
                })
                .collect()
        }
        TimeEncoding::Text => series
            .str()?
            .into_iter()
            .map(|text| text.map(parse_timestamp).transpose().map_err(Error::from))
            .collect(),
        TimeEncoding::Serial => {
            let serial = series.cast(&DataType::Float64)?;
            serial
                .f64()?
                .into_iter()
                .map(|value| value.map(from_serial).transpose().map_err(Error::from))
                .collect()
        }
    }
}

/// Timestamps of a column that must not contain nulls
pub(crate) fn read_required_timestamps(series: &Series) -> Result<Vec<NaiveDateTime>> {
    read_timestamps(series)?
        .into_iter()
        .enumerate()
        .map(|(row, timestamp)| {
            timestamp.ok_or_else(|| {
                Error::InvalidInput(format!("{}: null timestamp in row {row}", series.name()))
            })
        })
        .collect()
}

/// Values of a numeric or boolean column as `f64`; nulls stay `None`
pub(crate) fn read_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let numeric = matches!(
        series.dtype(),
        DataType::Boolean
            | DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    );
    if !numeric {
        return Err(Error::type_mismatch(series.name(), "numeric or boolean", series.dtype()));
    }
    let values = series.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

pub(crate) fn read_strings(series: &Series) -> Result<Vec<Option<String>>> {
    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect()),
        DataType::Null => Ok(vec![None; series.len()]),
        dtype => Err(Error::type_mismatch(series.name(), "string", dtype)),
    }
}

pub(crate) fn datetime_series(
    name: &str,
    values: impl IntoIterator<Item = Option<NaiveDateTime>>,
) -> Result<Series> {
    let micros: Vec<Option<i64>> = values.into_iter().map(|v| v.map(to_micros)).collect();
    Ok(Series::new(name.into(), micros).cast(&DataType::Datetime(TIME_UNIT, None))?)
}

pub(crate) fn datetime_column(
    name: &str,
    values: impl IntoIterator<Item = NaiveDateTime>,
) -> Result<Column> {
    Ok(datetime_series(name, values.into_iter().map(Some))?.into())
}

pub(crate) fn duration_column(
    name: &str,
    values: impl IntoIterator<Item = TimeDelta>,
) -> Result<Column> {
    let micros = values
        .into_iter()
        .map(|delta| {
            delta
                .num_microseconds()
                .ok_or_else(|| Error::InvalidInput(format!("{name}: duration {delta} overflows")))
        })
        .collect::<Result<Vec<i64>>>()?;
    Ok(Series::new(name.into(), micros)
        .cast(&DataType::Duration(TIME_UNIT))?
        .into())
}

/// List column; `None` rows become nulls
pub(crate) fn list_column(name: &str, rows: Vec<Option<Series>>) -> Column {
    let list: ListChunked = rows.into_iter().collect();
    list.with_name(name.into()).into_series().into()
}

/// Rows of a list column; nulls and empty lists both come back as `None`
pub(crate) fn read_list(series: &Series) -> Result<Vec<Option<Series>>> {
    match series.dtype() {
        DataType::List(_) => Ok(series
            .list()?
            .into_iter()
            .map(|row| row.filter(|inner| !inner.is_empty()))
            .collect()),
        DataType::Null => Ok(vec![None; series.len()]),
        dtype => Err(Error::type_mismatch(series.name(), "list", dtype)),
    }
}
