//! Concrete operations for annoflow pipelines: smoothing, peak detection,
//! summary statistics and range flagging. The core crate stays free of
//! concrete variants; everything here talks to it through the
//! [`Operation`](annoflow_core::Operation) trait.

use polars::prelude::*;

use annoflow_core::Result;

mod peaks;
mod smoothing;
mod stats;

pub use peaks::{PeakDetect, IS_PEAK_COLUMN};
pub use smoothing::{RollingMean, SMOOTHED_COLUMN};
pub use stats::{RangeFlag, SummaryStats};

/// Raw samples as nullable floats. Integer series are cast on the fly;
/// non-numeric series surface the underlying polars error.
pub(crate) fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}
