use std::collections::HashMap;

use polars::prelude::*;
use serde_json::Value;
use tracing::debug;

use annoflow_core::{Operation, PipelineError, Result, Timeseries};

/// Annotation column written by [`PeakDetect`].
pub const IS_PEAK_COLUMN: &str = "is_peak";

/// Flags strict local maxima of a previously written annotation column.
///
/// Reads whatever the configured source operation produced (typically the
/// smoothed column), so it must run after that producer in the pipeline.
/// Writes a boolean `is_peak` annotation and a `peak_count` attribute.
pub struct PeakDetect {
    source: String,
}

impl PeakDetect {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Operation for PeakDetect {
    fn name(&self) -> &str {
        "peak_detect"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        let values: Vec<Option<f64>> = {
            let column = timeseries.annotations().column(&self.source).map_err(|_| {
                PipelineError::Validation(format!(
                    "peak_detect requires annotation '{}'; run the producing operation first",
                    self.source
                ))
            })?;
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?.into_iter().collect()
        };

        let mut is_peak = vec![false; values.len()];
        let mut peak_count = 0u64;
        for idx in 1..values.len().saturating_sub(1) {
            let (Some(prev), Some(curr), Some(next)) =
                (values[idx - 1], values[idx], values[idx + 1])
            else {
                continue;
            };
            if curr > prev && curr > next {
                is_peak[idx] = true;
                peak_count += 1;
            }
        }

        debug!(source = self.source.as_str(), peak_count, "detected peaks");
        timeseries.add_annotation(Series::new(IS_PEAK_COLUMN.into(), is_peak))?;
        timeseries.add_attributes(HashMap::from([(
            "peak_count".to_string(),
            Value::from(peak_count),
        )]));
        Ok(())
    }
}
