use std::collections::HashMap;

use polars::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// A single timeseries plus everything derived from it so far.
///
/// The raw samples are fixed at construction; the time axis is the series'
/// positional index. Operations grow the annotations table (named,
/// index-aligned derived columns) and the attribute map (named scalar or
/// free-form facts) as they run.
#[derive(Debug, Clone)]
pub struct Timeseries {
    id: Uuid,
    series: Series,
    annotations: DataFrame,
    attributes: HashMap<String, Value>,
}

impl Timeseries {
    pub fn new(id: Uuid, series: Series) -> Self {
        Self {
            id,
            series,
            annotations: DataFrame::empty(),
            attributes: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The raw value series. Read-only: derived columns go through
    /// [`add_annotation`](Self::add_annotation).
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Adds a named annotation column, replacing any existing column with the
    /// same name. The series must carry a non-empty name and match the value
    /// series' length; on failure the annotations table is left untouched.
    pub fn add_annotation(&mut self, annotation: Series) -> Result<()> {
        if annotation.name().is_empty() {
            return Err(PipelineError::Validation(
                "annotation series must carry a name".to_string(),
            ));
        }
        if annotation.len() != self.series.len() {
            return Err(PipelineError::Validation(format!(
                "annotation '{}' has {} rows, expected {}",
                annotation.name(),
                annotation.len(),
                self.series.len()
            )));
        }

        if self.annotations.width() == 0 {
            self.annotations = DataFrame::new(vec![annotation.into()])?;
        } else {
            self.annotations.with_column(annotation)?;
        }
        Ok(())
    }

    /// Merges attributes into the attribute map, overwriting existing values
    /// on key collision.
    pub fn add_attributes(&mut self, attributes: HashMap<String, Value>) {
        self.attributes.extend(attributes);
    }

    /// All annotation columns accumulated so far.
    pub fn annotations(&self) -> &DataFrame {
        &self.annotations
    }

    /// A single attribute, or `None` if the key was never set.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }
}
