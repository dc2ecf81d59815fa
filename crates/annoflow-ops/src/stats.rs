use std::collections::HashMap;

use polars::prelude::*;
use serde_json::Value;
use tracing::debug;

use annoflow_core::{Operation, PipelineError, Result, Timeseries};

use crate::float_values;

/// Writes `mean`, `min`, `max` and `std_dev` attributes over the raw values.
/// Null samples are skipped; a series with no non-null sample is an error.
pub struct SummaryStats;

impl Operation for SummaryStats {
    fn name(&self) -> &str {
        "summary_stats"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        let values = float_values(timeseries.series())?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(PipelineError::Processing(
                "summary_stats requires at least one non-null sample".to_string(),
            ));
        }

        let count = present.len() as f64;
        let mean = present.iter().sum::<f64>() / count;
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Population variance: the series is the whole population here, not a sample.
        let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let std_dev = variance.sqrt();

        debug!(mean, min, max, std_dev, "computed summary statistics");
        timeseries.add_attributes(HashMap::from([
            ("mean".to_string(), Value::from(mean)),
            ("min".to_string(), Value::from(min)),
            ("max".to_string(), Value::from(max)),
            ("std_dev".to_string(), Value::from(std_dev)),
        ]));
        Ok(())
    }
}

/// Flags values falling inside a closed range.
///
/// Writes a nullable boolean `in_range` annotation (null where the sample is
/// null) and an `out_of_range_count` attribute.
pub struct RangeFlag {
    min: f64,
    max: f64,
}

impl RangeFlag {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Operation for RangeFlag {
    fn name(&self) -> &str {
        "range_flag"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        if self.min > self.max {
            return Err(PipelineError::Validation(format!(
                "range_flag bounds are inverted: {} > {}",
                self.min, self.max
            )));
        }

        let values = float_values(timeseries.series())?;
        let mut out_of_range = 0u64;
        let in_range: Vec<Option<bool>> = values
            .iter()
            .map(|value| {
                value.map(|v| {
                    let inside = v >= self.min && v <= self.max;
                    if !inside {
                        out_of_range += 1;
                    }
                    inside
                })
            })
            .collect();

        debug!(out_of_range, "flagged out-of-range samples");
        timeseries.add_annotation(Series::new("in_range".into(), in_range))?;
        timeseries.add_attributes(HashMap::from([(
            "out_of_range_count".to_string(),
            Value::from(out_of_range),
        )]));
        Ok(())
    }
}
