mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use eframe::egui;

use cli::Args;
use data::aggregate::{run_pipeline, Dashboard, NO_DATA_MESSAGE};
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report {
        return print_report(&args);
    }

    let mut state = AppState::new(args.filter_spec());
    if let Some(path) = &args.data {
        match data::loader::load_file(path) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spotify Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}

/// Headless mode: run the pipeline once and print it as JSON.
fn print_report(args: &Args) -> Result<()> {
    let path = args.data.as_deref().context("--report needs a data file")?;
    let table = data::loader::load_file(path)?;

    let mut spec = args.filter_spec();
    if let Some(bounds) = table.year_bounds() {
        spec.clamp_years(bounds);
    }

    let dashboard = run_pipeline(&table, &spec);
    if dashboard == Dashboard::NoData {
        eprintln!("{NO_DATA_MESSAGE}");
    }
    let json = serde_json::to_string_pretty(&dashboard).context("serialising report")?;
    println!("{json}");
    Ok(())
}
