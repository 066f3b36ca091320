//! Column layouts of the ICM+ tabular models

use polars::prelude::{DataType, TimeUnit};

/// Index column of trend exports
pub const DATETIME: &str = "DateTime";

/// Episode and deviation frames
pub mod episode {
    pub const START: &str = "StartDatetime";
    pub const DURATION: &str = "DurationTimedelta";
    pub const END: &str = "EndDatetime";
    /// Human-readable deviation classification
    pub const DEVIATION_TYPE: &str = "DeviationType";
    /// Default name of the attached-events column
    pub const EVENTS: &str = "IntervsDict";

    /// Column holding the attached values next to the timestamp list
    pub fn values_column(events: &str) -> String {
        format!("{events}_values")
    }

    /// Column holding per-episode attached counts
    pub fn counts_column(events: &str) -> String {
        format!("{events}_counts")
    }
}

/// Event frames
pub mod event {
    pub const SOURCE: &str = "DataSource";
    pub const GROUP: &str = "EventGroup";
    pub const NAME: &str = "EventName";
    pub const CATEGORY: &str = "Category";
    pub const START: &str = "StartTime";
    pub const END: &str = "EndTime";
    pub const FIELDS: &str = "DataFields";
    pub const COMMENTS: &str = "Comments";

    pub const ALL: [&str; 8] = [SOURCE, GROUP, NAME, CATEGORY, START, END, FIELDS, COMMENTS];
}

/// Artefact frames
pub mod artefact {
    pub const SIGNAL: &str = "signal_label";
    pub const MODIFIED_BY: &str = "ModifiedBy";
    pub const MODIFIED_DATE: &str = "ModifiedDate";
    pub const START: &str = "StartTime";
    pub const END: &str = "EndTime";

    /// Columns an artefact frame cannot do without
    pub const ESSENTIAL: [&str; 5] = [SIGNAL, MODIFIED_BY, MODIFIED_DATE, START, END];
}

/// How a timestamp column encodes time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Native datetime with the given unit
    Datetime(TimeUnit),
    /// Day-first text such as `01/03/2021 09:00:00`
    Text,
    /// Spreadsheet serial days
    Serial,
}

impl TimeEncoding {
    /// Detect the encoding from a column type
    pub fn detect(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::Datetime(unit, _) => Some(Self::Datetime(*unit)),
            DataType::String => Some(Self::Text),
            DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32 => Some(Self::Serial),
            _ => None,
        }
    }
}

/// Unit used for every datetime and duration column this crate writes
pub const TIME_UNIT: TimeUnit = TimeUnit::Microseconds;
