//! Trend frame operations: unit stripping, series extraction, episodes and burden

use super::columns::{datetime_column, read_required_timestamps, read_values, require};
use crate::config::DATETIME;
use crate::{Result, ToFrame, TrendFrameExt};
use icmp_burden::{BurdenIntegrator, BurdenParameters, BurdenSeries};
use icmp_core::TimeSeries;
use icmp_episode::{EpisodeSegmenter, SegmenterParameters, ThresholdDetector};
use polars::prelude::*;
use tracing::debug;

fn strip_unit(name: &str) -> &str {
    name.split('[').next().unwrap_or_default().trim_end()
}

/// Signal values with nulls kept as `None`, sorted by the `DateTime` column
fn optional_series(df: &DataFrame, column: &str) -> Result<TimeSeries<Option<f64>>> {
    let timestamps = read_required_timestamps(require(df, DATETIME)?)?;
    let values = read_values(require(df, column)?)?;
    Ok(TimeSeries::from_unsorted(
        column,
        timestamps.into_iter().zip(values),
    )?)
}

impl TrendFrameExt for DataFrame {
    fn strip_unit_brackets(&self) -> Result<DataFrame> {
        let names: Vec<String> = self
            .get_column_names()
            .iter()
            .map(|name| strip_unit(name.as_str()).to_string())
            .collect();
        let mut stripped = self.clone();
        stripped.set_column_names(names)?;
        Ok(stripped)
    }

    fn trend_series(&self, column: &str) -> Result<TimeSeries<f64>> {
        let series = optional_series(self, column)?;
        Ok(series.map(|value| value.unwrap_or(f64::NAN)))
    }

    fn detect_episodes(
        &self,
        column: &str,
        threshold: Option<f64>,
        invert: bool,
        params: &SegmenterParameters,
    ) -> Result<DataFrame> {
        let segmenter = EpisodeSegmenter::new(*params)?;
        let episodes = match threshold {
            Some(threshold) => {
                let series = self.trend_series(column)?;
                if invert {
                    segmenter.detect_below(&series, threshold)?
                } else {
                    segmenter.detect_above(&series, threshold)?
                }
            }
            None => segmenter.segment(&optional_series(self, column)?)?,
        };
        debug!(column, episodes = episodes.len(), "detected episodes on trend frame");
        episodes.to_frame()
    }

    fn burden(&self, column: &str, params: &BurdenParameters) -> Result<DataFrame> {
        let series = self.trend_series(column)?;
        BurdenIntegrator::new(*params)?.integrate(&series)?.to_frame()
    }
}

impl ToFrame for BurdenSeries {
    fn to_frame(&self) -> Result<DataFrame> {
        let series = self.series();
        let values = Series::new(self.name().into(), series.values().to_vec());
        Ok(DataFrame::new(vec![
            datetime_column(DATETIME, series.timestamps().iter().copied())?,
            values.into(),
        ])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_unit() {
        assert_eq!(strip_unit("ICP[mmHg]"), "ICP");
        assert_eq!(strip_unit("CPP [mmHg]"), "CPP");
        assert_eq!(strip_unit("DateTime"), "DateTime");
    }
}
