pub mod error;
pub mod operation;
pub mod timeseries;

pub use error::{PipelineError, Result};
pub use operation::{apply, CompositeOperation, Operation};
pub use timeseries::Timeseries;
