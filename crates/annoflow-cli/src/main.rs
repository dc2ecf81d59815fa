// crates/annoflow-cli/src/main.rs

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use annoflow_core::Timeseries;

mod commands;
mod menu;
mod pipelines;
mod store;

use commands::export::ExportCommand;
use commands::operate::PerformOperationCommand;
use commands::series::{AddSeriesCommand, ListSeriesCommand, ShowSeriesCommand};
use commands::ExitCommand;
use menu::{Menu, Session};
use store::SeriesStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive driver for annoflow timeseries pipelines", long_about = None)]
struct Cli {
    /// Seed the session store from a numeric CSV file (first column is used)
    #[arg(long)]
    load: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut store = SeriesStore::new();
    if let Some(path) = &cli.load {
        let timeseries = load_csv_series(path)
            .with_context(|| format!("failed to load series from {}", path.display()))?;
        info!(id = %timeseries.id(), samples = timeseries.len(), "Loaded series from CSV");
        store.insert(timeseries);
    }

    let menu = build_menu();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let mut session = Session {
        store: &mut store,
        input: &mut input,
        output: &mut output,
    };
    menu.run(&mut session)
}

fn build_menu() -> Menu {
    let mut menu = Menu::new();
    menu.add_command(Box::new(AddSeriesCommand));
    menu.add_command(Box::new(ListSeriesCommand));
    menu.add_command(Box::new(ShowSeriesCommand));
    menu.add_command(Box::new(PerformOperationCommand));
    menu.add_command(Box::new(ExportCommand));
    menu.add_command(Box::new(ExitCommand));
    menu
}

fn load_csv_series(path: &Path) -> Result<Timeseries> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let column = df
        .get_columns()
        .first()
        .context("CSV file has no columns")?;
    let series = column
        .as_materialized_series()
        .clone()
        .cast(&DataType::Float64)?
        .with_name("values".into());

    Ok(Timeseries::new(Uuid::new_v4(), series))
}
