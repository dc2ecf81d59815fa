use std::io::Write;

use anyhow::Result;
use polars::prelude::*;
use tracing::info;
use uuid::Uuid;

use annoflow_core::Timeseries;

use crate::commands::{select_index, series_table, EMPTY_STORE_MESSAGE};
use crate::menu::{Command, MenuFlow, Session};

/// Reads comma-separated values from the user and stores them as a fresh
/// series under a new id.
pub struct AddSeriesCommand;

impl Command for AddSeriesCommand {
    fn name(&self) -> &str {
        "add series"
    }

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
        let Some(line) = session.prompt("Enter comma-separated numeric values: ")? else {
            return Ok(MenuFlow::Continue);
        };

        let mut values = Vec::new();
        for token in line.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    writeln!(session.output, "Could not parse '{token}' as a number.")?;
                    return Ok(MenuFlow::Continue);
                }
            }
        }

        if values.is_empty() {
            writeln!(session.output, "No values given, nothing stored.")?;
            return Ok(MenuFlow::Continue);
        }

        let timeseries = Timeseries::new(Uuid::new_v4(), Series::new("values".into(), values));
        info!(id = %timeseries.id(), samples = timeseries.len(), "Stored new series");
        writeln!(
            session.output,
            "Added series {} with {} samples.",
            timeseries.id(),
            timeseries.len()
        )?;
        session.store.insert(timeseries);
        Ok(MenuFlow::Continue)
    }
}

pub struct ListSeriesCommand;

impl Command for ListSeriesCommand {
    fn name(&self) -> &str {
        "list series"
    }

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
        if session.store.is_empty() {
            writeln!(session.output, "{EMPTY_STORE_MESSAGE}")?;
        } else {
            writeln!(session.output, "{}", series_table(session.store))?;
        }
        Ok(MenuFlow::Continue)
    }
}

/// Prints one series in full: raw values, annotations table, attributes.
pub struct ShowSeriesCommand;

impl Command for ShowSeriesCommand {
    fn name(&self) -> &str {
        "show series"
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

        let timeseries = session
            .store
            .entry(index)
            .expect("selection was bounds-checked");
        writeln!(session.output, "{}", timeseries.series())?;

        if timeseries.annotations().width() == 0 {
            writeln!(session.output, "(no annotations)")?;
        } else {
            writeln!(session.output, "{}", timeseries.annotations())?;
        }

        if timeseries.attributes().is_empty() {
            writeln!(session.output, "(no attributes)")?;
        } else {
            let mut attributes: Vec<_> = timeseries.attributes().iter().collect();
            attributes.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in attributes {
                writeln!(session.output, "  {key} = {value}")?;
            }
        }
        Ok(MenuFlow::Continue)
    }
}
