use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use annoflow_core::Operation;

use crate::commands::{select_index, series_table, EMPTY_STORE_MESSAGE};
use crate::menu::{Command, MenuFlow, Session};
use crate::pipelines::builtin_pipelines;

/// Picks a stored series and a builtin pipeline, then runs the pipeline
/// against the series in place. A failing pipeline aborts the menu loop with
/// its error; whatever earlier steps wrote stays on the series.
pub struct PerformOperationCommand;

impl Command for PerformOperationCommand {
    fn name(&self) -> &str {
        "perform operation"
    }

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
        if session.store.is_empty() {
            writeln!(session.output, "{EMPTY_STORE_MESSAGE}")?;
            return Ok(MenuFlow::Continue);
        }

        writeln!(session.output, "{}", series_table(session.store))?;
        let Some(series_index) = select_index(session, "Select a series: ", session.store.len())?
        else {
            return Ok(MenuFlow::Continue);
        };

        let pipelines = builtin_pipelines();
        writeln!(session.output, "Available pipelines:")?;
        for (index, pipeline) in pipelines.iter().enumerate() {
            writeln!(session.output, "{}: {}", index + 1, pipeline.name())?;
        }
        let Some(pipeline_index) = select_index(session, "Select a pipeline: ", pipelines.len())?
        else {
            return Ok(MenuFlow::Continue);
        };
        let pipeline = &pipelines[pipeline_index];

        let timeseries = session
            .store
            .entry_mut(series_index)
            .expect("selection was bounds-checked");
        pipeline
            .process(timeseries)
            .with_context(|| format!("pipeline '{}' failed", pipeline.name()))?;

        info!(
            pipeline = pipeline.name(),
            id = %timeseries.id(),
            "Applied pipeline"
        );
        writeln!(
            session.output,
            "Applied pipeline '{}' to series {}.",
            pipeline.name(),
            timeseries.id()
        )?;
        Ok(MenuFlow::Continue)
    }
}
