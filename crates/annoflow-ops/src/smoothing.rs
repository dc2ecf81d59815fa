use polars::prelude::*;
use tracing::debug;

use annoflow_core::{Operation, PipelineError, Result, Timeseries};

use crate::float_values;

/// Annotation column written by [`RollingMean`].
pub const SMOOTHED_COLUMN: &str = "smoothed";

/// Trailing-window moving average over the raw values.
///
/// Positions where the window has not yet filled, or where the window
/// contains a null sample, are null rather than averaged over fewer points.
pub struct RollingMean {
    window: usize,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Operation for RollingMean {
    fn name(&self) -> &str {
        "rolling_mean"
    }

    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        if self.window == 0 {
            return Err(PipelineError::Validation(
                "rolling_mean window must be at least 1".to_string(),
            ));
        }

        let values = float_values(timeseries.series())?;
        let mut smoothed: Vec<Option<f64>> = Vec::with_capacity(values.len());

        for idx in 0..values.len() {
            if idx + 1 < self.window {
                smoothed.push(None);
                continue;
            }

            let window = &values[idx + 1 - self.window..=idx];
            let mut sum = 0.0;
            let mut complete = true;
            for value in window {
                match value {
                    Some(v) => sum += v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            smoothed.push(complete.then(|| sum / self.window as f64));
        }

        debug!(window = self.window, "computed rolling mean");
        timeseries.add_annotation(Series::new(SMOOTHED_COLUMN.into(), smoothed))
    }
}
