//! Table Chart Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartFrame, ChartOptions, StaticChartRenderer};
use crate::data::{DataLoader, Table};
use crate::gui::control_panel::UserSettings;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::warn;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Table loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { table: Table, path: PathBuf },
    Error(String),
}

impl LoadResult {
    fn is_final(&self) -> bool {
        !matches!(self, LoadResult::Progress(_))
    }
}

/// Everything the loader has sent so far. A loader that hung up without a
/// final result yields an `Error` in its place.
fn drain_load_results(rx: &Receiver<LoadResult>) -> Vec<LoadResult> {
    let mut results = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(result) => results.push(result),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                if !results.iter().any(LoadResult::is_final) {
                    results.push(LoadResult::Error(
                        "loader stopped without a result".to_string(),
                    ));
                }
                break;
            }
        }
    }
    results
}

/// State handed over from the command line.
#[derive(Default)]
pub struct Startup {
    pub table: Option<Table>,
    pub data_path: Option<PathBuf>,
    pub options: ChartOptions,
    pub options_path: Option<PathBuf>,
    pub categorical_axis: bool,
}

/// Main application window.
pub struct ChartApp {
    loader: DataLoader,
    /// Options from the loaded options file, before panel overrides.
    base_options: ChartOptions,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async table loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.settings = UserSettings {
            data_path: startup.data_path.clone(),
            options_path: startup.options_path,
            categorical_axis: startup.categorical_axis,
            ..UserSettings::from_options(&startup.options)
        };

        let mut app = Self {
            loader: DataLoader::new(),
            base_options: startup.options,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        if let Some(table) = startup.table {
            app.accept_table(table, startup.data_path);
            app.render();
        }
        app
    }

    /// Handle data file selection, loading in the background
    fn handle_browse_data(&mut self) {
        if self.is_loading {
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["csv", "json"])
            .add_filter("CSV Files", &["csv"])
            .add_filter("JSON Tables", &["json"])
            .pick_file()
        else {
            return;
        };

        self.chart_viewer.clear();
        self.control_panel.settings.data_path = Some(path.clone());
        self.control_panel.set_status("Loading data...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Reading {}...",
                path.display()
            )));

            match DataLoader::read_table(&path) {
                Ok(table) => {
                    let _ = tx.send(LoadResult::Complete { table, path });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for table loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        for result in drain_load_results(&rx) {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_status(&status);
                }
                LoadResult::Complete { table, path } => {
                    self.accept_table(table, Some(path));
                    self.is_loading = false;
                    should_keep_receiver = false;
                    self.render();
                }
                LoadResult::Error(error) => {
                    warn!("loading data failed: {}", error);
                    self.control_panel.set_status(&format!("Error: {}", error));
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    fn accept_table(&mut self, table: Table, path: Option<PathBuf>) {
        let columns: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.display_name().to_string())
            .collect();
        let row_count = table.rows().len();

        self.control_panel.set_status(&format!(
            "Loaded {} rows, {} columns",
            row_count,
            columns.len()
        ));
        self.control_panel.update_columns(columns, row_count);
        self.loader.set_table(table, path);
    }

    /// Load a chart options JSON file and re-render
    fn handle_load_options(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Chart Options", &["json"])
            .pick_file()
        else {
            return;
        };

        match ChartOptions::load(&path) {
            Ok(options) => {
                let data_path = self.control_panel.settings.data_path.take();
                self.control_panel.settings = UserSettings {
                    data_path,
                    options_path: Some(path),
                    categorical_axis: self.control_panel.settings.categorical_axis,
                    ..UserSettings::from_options(&options)
                };
                self.base_options = options;
                self.control_panel.set_status("Options loaded");
                if self.loader.table().is_some() {
                    self.render();
                }
            }
            Err(e) => {
                warn!("loading options from {} failed: {}", path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Prepare a frame from the loaded table and current settings
    fn render(&mut self) {
        let Some(table) = self.loader.table() else {
            self.control_panel.set_status("No data loaded");
            return;
        };

        let options = self
            .control_panel
            .settings
            .chart_options(&self.base_options, table);

        match ChartFrame::prepare(table, &options) {
            Ok(frame) => {
                let status = if frame.is_empty() {
                    "No data".to_string()
                } else {
                    format!("{} series plotted", frame.series.len())
                };
                self.chart_viewer.set_frame(frame, options);
                self.control_panel.set_status(&status);
            }
            Err(e) => {
                warn!("chart preparation failed: {}", e);
                self.chart_viewer.set_error(e.to_string());
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
        self.control_panel.export_enabled = self.chart_viewer.frame.is_some();
    }

    /// Handle PNG export of the current chart
    fn handle_export_png(&mut self) {
        let Some(frame) = &self.chart_viewer.frame else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("chart.png")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_png(frame, &self.chart_viewer.options, &output_path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    warn!("could not open {}: {}", output_path.display(), e);
                }
            }
            Err(e) => {
                warn!("export failed: {}", e);
                self.control_panel.set_status(&format!("Render error: {}", e));
            }
        }
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseData => self.handle_browse_data(),
                        ControlPanelAction::LoadOptions => self.handle_load_options(),
                        ControlPanelAction::Render => self.render(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_that_hangs_up_reports_an_error() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Progress("Reading data.csv...".into()))
            .unwrap();
        assert_eq!(drain_load_results(&rx).len(), 1);
        assert!(drain_load_results(&rx).is_empty());

        drop(tx);
        let results = drain_load_results(&rx);
        assert!(matches!(
            results.as_slice(),
            [LoadResult::Error(message)] if message == "loader stopped without a result"
        ));
    }

    #[test]
    fn finished_loader_is_not_an_error() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Error("bad header".into())).unwrap();
        drop(tx);

        let results = drain_load_results(&rx);
        assert!(matches!(
            results.as_slice(),
            [LoadResult::Error(message)] if message == "bad header"
        ));
    }
}
