//! Table Chart - Interactive chart viewer for tabular data
//!
//! Opens a window by default; `--export` renders a PNG without one.

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use log::info;
use std::path::PathBuf;
use table_chart::charts::{ChartFrame, ChartOptions, StaticChartRenderer};
use table_chart::data::DataLoader;
use table_chart::gui::{ChartApp, Startup};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot a data table as line/point series")]
struct Cli {
    /// CSV file or JSON table document
    data: Option<PathBuf>,

    /// Chart options JSON file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Chart title (overrides the options file)
    #[arg(long)]
    title: Option<String>,

    /// Draw the first column on the y axis
    #[arg(long)]
    inverted: bool,

    /// Treat the first column as categories
    #[arg(long)]
    categorical_x: bool,

    /// Render to this PNG file and exit
    #[arg(long, value_name = "OUT.png")]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = match &cli.options {
        Some(path) => ChartOptions::load(path)
            .with_context(|| format!("reading options {}", path.display()))?,
        None => ChartOptions::default(),
    };
    if cli.title.is_some() {
        options.title = cli.title.clone();
    }
    options.inverted |= cli.inverted;

    let table = match &cli.data {
        Some(path) => Some(
            DataLoader::read_table(path)
                .with_context(|| format!("loading {}", path.display()))?,
        ),
        None => None,
    };

    if let Some(output) = &cli.export {
        let table = table.ok_or_else(|| anyhow!("--export needs a data file"))?;
        if cli.categorical_x {
            options.categorize_axis_column(&table);
        }
        let frame = ChartFrame::prepare(&table, &options)?;
        StaticChartRenderer::render_png(&frame, &options, output)?;
        info!("exported {} series", frame.series.len());
        return Ok(());
    }

    let startup = Startup {
        table,
        data_path: cli.data,
        options,
        options_path: cli.options,
        categorical_axis: cli.categorical_x,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Table Chart"),
        ..Default::default()
    };

    eframe::run_native(
        "Table Chart",
        native_options,
        Box::new(move |cc| Ok(Box::new(ChartApp::new(cc, startup)))),
    )
    .map_err(|e| anyhow!(e.to_string()))
}
