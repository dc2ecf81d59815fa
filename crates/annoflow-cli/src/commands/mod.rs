use std::io::Write;

use anyhow::Result;
use comfy_table::Table;

use crate::menu::{Command, MenuFlow, Session, INVALID_SELECTION_MESSAGE};
use crate::store::SeriesStore;

pub mod export;
pub mod operate;
pub mod series;

pub const EMPTY_STORE_MESSAGE: &str = "No series in the store yet.";

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn execute(&self, session: &mut Session<'_>) -> Result<MenuFlow> {
        writeln!(session.output, "Exiting the menu.")?;
        Ok(MenuFlow::Exit)
    }
}

/// Numbered listing of everything in the store, shared by the commands that
/// ask the user to pick a series.
pub(crate) fn series_table(store: &SeriesStore) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "id", "samples", "annotations", "attributes"]);
    for (index, timeseries) in store.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            timeseries.id().to_string(),
            timeseries.len().to_string(),
            timeseries.annotations().width().to_string(),
            timeseries.attributes().len().to_string(),
        ]);
    }
    table
}

/// Prompts for a 1-based selection out of `count` entries and returns it
/// zero-based. `None` means EOF or an invalid selection; the invalid case has
/// already printed its notice, callers just return to the menu.
pub(crate) fn select_index(
    session: &mut Session<'_>,
    message: &str,
    count: usize,
) -> Result<Option<usize>> {
    let Some(line) = session.prompt(message)? else {
        return Ok(None);
    };

    let selection = line
        .parse::<usize>()
        .ok()
        .filter(|number| (1..=count).contains(number))
        .map(|number| number - 1);

    if selection.is_none() {
        writeln!(session.output, "{INVALID_SELECTION_MESSAGE}")?;
    }
    Ok(selection)
}
