use annoflow_core::CompositeOperation;
use annoflow_ops::{PeakDetect, RangeFlag, RollingMean, SummaryStats, SMOOTHED_COLUMN};

/// The pipelines the menu offers, assembled fresh on every call so each run
/// gets its own operation instances.
pub fn builtin_pipelines() -> Vec<CompositeOperation> {
    vec![
        CompositeOperation::with_operations(
            "smooth_and_detect",
            vec![
                Box::new(RollingMean::new(3)),
                Box::new(PeakDetect::new(SMOOTHED_COLUMN)),
            ],
        ),
        CompositeOperation::with_operations(
            "percent_range_check",
            vec![
                Box::new(RangeFlag::new(0.0, 100.0)),
                Box::new(SummaryStats),
            ],
        ),
        CompositeOperation::with_operations("summarize", vec![Box::new(SummaryStats)]),
    ]
}
