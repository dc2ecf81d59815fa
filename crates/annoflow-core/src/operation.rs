use tracing::debug;

use crate::error::Result;
use crate::timeseries::Timeseries;

/// A unit of computation over a [`Timeseries`].
///
/// Implementations read the value series and anything previously derived,
/// then write results back through the container's own mutators. `process`
/// carries no data in its return value; every effect is observable only on
/// the mutated timeseries. The `&mut` borrow also bounds the reference:
/// an operation cannot retain the timeseries beyond its `process` call.
pub trait Operation {
    /// Identifier used for listing steps and for removal from a composite.
    fn name(&self) -> &str;

    fn process(&self, timeseries: &mut Timeseries) -> Result<()>;
}

/// An ordered collection of operations that itself behaves as one operation.
///
/// Children run in insertion order against the same timeseries, so a later
/// child observes annotations and attributes written by earlier ones. A
/// composite is a valid child of another composite, so pipelines nest.
pub struct CompositeOperation {
    name: String,
    operations: Vec<Box<dyn Operation>>,
}

impl CompositeOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_operations(name, Vec::new())
    }

    pub fn with_operations(name: impl Into<String>, operations: Vec<Box<dyn Operation>>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    /// Appends an operation to the end of the pipeline.
    pub fn add_operation(&mut self, operation: Box<dyn Operation>) {
        self.operations.push(operation);
    }

    /// Removes every child whose name matches; a name with no match is a
    /// no-op. Callers that rely on removing exactly one step must keep names
    /// unique within the composite.
    pub fn remove_operation(&mut self, name: &str) {
        self.operations.retain(|operation| operation.name() != name);
    }

    pub fn operations(&self) -> &[Box<dyn Operation>] {
        &self.operations
    }
}

impl Operation for CompositeOperation {
    fn name(&self) -> &str {
        &self.name
    }

    /// Runs the children in order. The first failing child's error propagates
    /// unchanged, and anything earlier children wrote stays on the timeseries:
    /// there is no rollback, partial mutation on failure is the contract.
    fn process(&self, timeseries: &mut Timeseries) -> Result<()> {
        for operation in &self.operations {
            debug!(
                pipeline = self.name.as_str(),
                operation = operation.name(),
                "running pipeline step"
            );
            operation.process(timeseries)?;
        }
        Ok(())
    }
}

/// Value-returning convenience for callers that prefer owning the result:
/// consumes the timeseries, processes it, hands it back. On failure the
/// partially mutated container is dropped and only the error survives.
pub fn apply(operation: &dyn Operation, mut timeseries: Timeseries) -> Result<Timeseries> {
    operation.process(&mut timeseries)?;
    Ok(timeseries)
}
