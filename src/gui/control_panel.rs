//! Control Panel Widget
//! Left side panel with data source, chart settings and actions.

use crate::charts::ChartOptions;
use crate::data::Table;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Settings the user controls from the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct UserSettings {
    pub data_path: Option<PathBuf>,
    pub options_path: Option<PathBuf>,
    pub title: String,
    pub inverted: bool,
    /// Treat column 0 as categories on its axis.
    pub categorical_axis: bool,
    pub lines: bool,
    pub points: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::from_options(&ChartOptions::default())
    }
}

impl UserSettings {
    /// Seed the panel from loaded chart options.
    pub fn from_options(options: &ChartOptions) -> Self {
        Self {
            data_path: None,
            options_path: None,
            title: options.title.clone().unwrap_or_default(),
            inverted: options.inverted,
            categorical_axis: false,
            lines: options.lines,
            points: options.points,
        }
    }

    /// Options for one render: `base` overridden by the panel settings.
    pub fn chart_options(&self, base: &ChartOptions, table: &Table) -> ChartOptions {
        let mut options = base.clone();
        options.inverted = self.inverted;
        options.lines = self.lines;
        options.points = self.points;

        let title = self.title.trim();
        options.title = (!title.is_empty()).then(|| title.to_string());

        if self.categorical_axis {
            options.categorize_axis_column(table);
        }
        options
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub status: String,
    pub render_enabled: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            columns: Vec::new(),
            row_count: 0,
            status: "Ready".to_string(),
            render_enabled: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the column list after a table load
    pub fn update_columns(&mut self, columns: Vec<String>, row_count: usize) {
        self.render_enabled = !columns.is_empty();
        self.columns = columns;
        self.row_count = row_count;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Table Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        Self::file_row(ui, self.settings.data_path.as_ref(), "📂 Browse", || {
            action = ControlPanelAction::BrowseData;
        });
        ui.add_space(5.0);
        Self::file_row(ui, self.settings.options_path.as_ref(), "⚙ Options", || {
            action = ControlPanelAction::LoadOptions;
        });

        if !self.columns.is_empty() {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!(
                    "{} rows · columns: {}",
                    self.row_count,
                    self.columns.join(", ")
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Section =====
        ui.label(RichText::new("🔧 Chart").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([60.0, 20.0], egui::Label::new("Title:"));
            ui.text_edit_singleline(&mut self.settings.title);
        });
        ui.add_space(5.0);

        let x_label = self.columns.first().map(String::as_str).unwrap_or("first column");
        ui.checkbox(
            &mut self.settings.inverted,
            format!("Inverted ({} on the y axis)", x_label),
        );
        ui.checkbox(&mut self.settings.categorical_axis, "Categorical axis");
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.settings.lines, "Lines");
            ui.checkbox(&mut self.settings.points, "Points");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let render = egui::Button::new(RichText::new("▶ Render").size(16.0))
                .min_size(egui::vec2(200.0, 36.0));
            if ui.add_enabled(self.render_enabled, render).clicked() {
                action = ControlPanelAction::Render;
            }
            ui.add_space(8.0);
            let export = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add_enabled(self.export_enabled, export).clicked() {
                action = ControlPanelAction::ExportPng;
            }
        });

        ui.add_space(15.0);
        ui.label(RichText::new(&self.status).size(12.0).color(Color32::GRAY));

        action
    }

    fn file_row(ui: &mut egui::Ui, path: Option<&PathBuf>, button: &str, on_click: impl FnOnce()) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = path
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    let color = if path.is_some() {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(button).clicked() {
                            on_click();
                        }
                    });
                });
            });
    }
}

/// Action requested by the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseData,
    LoadOptions,
    Render,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{AxisSlot, AxisSpec};
    use crate::data::{Cell, ColumnDescription, ColumnType};

    fn table() -> Table {
        Table::from_rows(
            vec![
                ColumnDescription::new("day", ColumnType::String),
                ColumnDescription::new("visits", ColumnType::Number),
            ],
            vec![
                vec![Cell::from("Mon"), Cell::from(3)],
                vec![Cell::from("Tue"), Cell::from(5)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn settings_round_trip_through_options() {
        let base = ChartOptions {
            title: Some("Visits".into()),
            inverted: true,
            points: false,
            ..Default::default()
        };
        let settings = UserSettings::from_options(&base);
        assert_eq!(settings.title, "Visits");
        assert!(settings.inverted && settings.lines && !settings.points);

        let options = settings.chart_options(&base, &table());
        assert_eq!(options.title.as_deref(), Some("Visits"));
        assert!(options.inverted);
    }

    #[test]
    fn blank_title_clears_and_categorical_axis_is_applied() {
        let base = ChartOptions {
            title: Some("Old".into()),
            xaxis: Some(AxisSpec::titled("Day")),
            ..Default::default()
        };
        let settings = UserSettings {
            title: "  ".into(),
            categorical_axis: true,
            ..UserSettings::from_options(&base)
        };

        let options = settings.chart_options(&base, &table());
        assert_eq!(options.title, None);
        let x = options.axis(AxisSlot::X).unwrap();
        assert_eq!(x.title.as_deref(), Some("Day"));
        assert_eq!(x.label_for(1.0), Some("Tue"));
        // Base options are left alone
        assert!(!base.xaxis.as_ref().unwrap().is_categorical());
    }
}
