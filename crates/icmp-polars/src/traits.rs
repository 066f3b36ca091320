//! Core traits for ICM+ analysis on Polars DataFrames

use crate::Result;
use icmp_burden::BurdenParameters;
use icmp_core::TimeSeries;
use icmp_episode::SegmenterParameters;
use polars::prelude::*;

/// Conversion of a typed model into its DataFrame layout
pub trait ToFrame {
    fn to_frame(&self) -> Result<DataFrame>;
}

/// Conversion of a DataFrame layout back into a typed model
pub trait FromFrame: Sized {
    fn from_frame(df: &DataFrame) -> Result<Self>;
}

/// Extension trait for trend DataFrames (a `DateTime` column plus one column per signal)
pub trait TrendFrameExt {
    /// Rename `"ICP[mmHg]"` to `"ICP"`, keeping everything before the first `[`
    fn strip_unit_brackets(&self) -> Result<DataFrame>;

    /// Read a signal as a series indexed by the `DateTime` column.
    ///
    /// Rows with a null value are kept as NaN.
    fn trend_series(&self, column: &str) -> Result<TimeSeries<f64>>;

    /// Detect episodes of a signal.
    ///
    /// With a threshold, a sample is hot when its value lies strictly above
    /// it (strictly below when `invert` is set). Without one the column is
    /// used as an indicator: non-zero is hot and nulls are cold.
    ///
    /// # Returns
    /// DataFrame with columns `StartDatetime`, `DurationTimedelta`, `EndDatetime`
    fn detect_episodes(
        &self,
        column: &str,
        threshold: Option<f64>,
        invert: bool,
        params: &SegmenterParameters,
    ) -> Result<DataFrame>;

    /// Trapezoidal burden of a signal
    ///
    /// # Returns
    /// DataFrame with columns `DateTime` and `{column}_burden` (null where no value)
    fn burden(&self, column: &str, params: &BurdenParameters) -> Result<DataFrame>;
}

/// Extension trait for episode DataFrames
pub trait EpisodeFrameExt {
    /// Attach events from an event frame, keyed by `StartTime`, keeping the event names.
    ///
    /// Events are sorted first; events sharing a timestamp become one entry
    /// whose value joins their names with `|`. Adds the list columns
    /// `{column}` (timestamps) and `{column}_values` (event names); episodes
    /// without events get nulls.
    fn attach_event_frame(&self, events: &DataFrame, column: &str) -> Result<DataFrame>;

    /// Protocol deviations of an episode frame with an attached-events column.
    ///
    /// When the column is absent a warning is logged and the input is
    /// returned unchanged.
    fn deviations(&self, column: &str, allowed_gap: chrono::TimeDelta) -> Result<DataFrame>;

    /// Add `{column}_counts` with the number of attached events per episode (0 when absent)
    fn with_event_counts(&self, column: &str) -> Result<DataFrame>;

    /// Keep episodes lasting strictly longer than `min_duration`
    fn prolonged(&self, min_duration: chrono::TimeDelta) -> Result<DataFrame>;
}

/// Extension trait for event DataFrames
pub trait EventFrameExt {
    /// Rows whose `EventName` is one of `names`
    fn with_event_names(&self, names: &[&str]) -> Result<DataFrame>;

    /// Wide table of the parsed `DataFields` column: one column per field name
    fn data_field_table(&self) -> Result<DataFrame>;
}
