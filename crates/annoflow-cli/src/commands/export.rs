use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

use crate::commands::{select_index, series_table, EMPTY_STORE_MESSAGE};
use crate::menu::{Command, MenuFlow, Session};

/// Writes one series to disk: values plus annotations as CSV, attributes as
/// pretty-printed JSON next to it.
pub struct ExportCommand;

impl Command for ExportCommand {
    fn name(&self) -> &str {
        "export series"
    }

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
        if session.store.is_empty() {
            writeln!(session.output, "{EMPTY_STORE_MESSAGE}")?;
            return Ok(MenuFlow::Continue);
        }

        writeln!(session.output, "{}", series_table(session.store))?;
        let Some(index) = select_index(session, "Select a series: ", session.store.len())? else {
            return Ok(MenuFlow::Continue);
        };

        let Some(stem) = session
            .prompt("Output path stem (writes <stem>.csv and <stem>_attributes.json): ")?
        else {
            return Ok(MenuFlow::Continue);
        };
        if stem.is_empty() {
            writeln!(session.output, "No path given, nothing exported.")?;
            return Ok(MenuFlow::Continue);
        }

        let timeseries = session
            .store
            .entry(index)
            .expect("selection was bounds-checked");

        let csv_path = format!("{stem}.csv");
        let json_path = format!("{stem}_attributes.json");

        let values = DataFrame::new(vec![timeseries
            .series()
            .clone()
            .with_name("values".into())
            .into()])?;
        let mut combined = values.hstack(timeseries.annotations().get_columns())?;

        let mut file =
            File::create(&csv_path).with_context(|| format!("failed to create {csv_path}"))?;
        CsvWriter::new(&mut file).finish(&mut combined)?;

        let attributes = serde_json::to_string_pretty(timeseries.attributes())?;
        std::fs::write(&json_path, attributes)
            .with_context(|| format!("failed to write {json_path}"))?;

        info!(id = %timeseries.id(), csv = csv_path.as_str(), "Exported series");
        writeln!(session.output, "Wrote {csv_path} and {json_path}.")?;
        Ok(MenuFlow::Continue)
    }
}
