//! Chart Viewer Widget
//! Central panel showing the rendered chart and the point under the pointer.

use crate::charts::{ChartFrame, ChartOptions, ChartPlotter, PlotEvent, PointSummary};
use egui::{Color32, RichText};
use log::debug;

/// Central chart display.
#[derive(Default)]
pub struct ChartViewer {
    pub frame: Option<ChartFrame>,
    pub options: ChartOptions,
    pub error: Option<String>,
    /// Point under the pointer in the last frame.
    pub hovered: Option<PointSummary>,
    /// Last clicked point.
    pub selected: Option<PointSummary>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Show a freshly prepared frame.
    pub fn set_frame(&mut self, frame: ChartFrame, options: ChartOptions) {
        self.frame = Some(frame);
        self.options = options;
        self.error = None;
        self.hovered = None;
        self.selected = None;
    }

    /// Replace the chart with an error message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.frame = None;
        self.error = Some(message.into());
        self.hovered = None;
        self.selected = None;
    }

    fn handle_event(&mut self, event: Option<PlotEvent>) {
        match event {
            Some(PlotEvent::Hover(summary)) => self.hovered = Some(summary),
            Some(PlotEvent::Click(summary)) => {
                debug!(
                    "selected row {} of '{}': ({}, {})",
                    summary.row, summary.series, summary.x, summary.y
                );
                self.hovered = Some(summary.clone());
                self.selected = Some(summary);
            }
            None => self.hovered = None,
        }
    }

    /// Draw the chart viewer
    pub fn show(&mut self, _ctx: &egui::Context, ui: &mut egui::Ui) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(error)
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(frame) = &self.frame else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let mut event = None;
        egui::TopBottomPanel::bottom("point_status")
            .show_separator_line(true)
            .show_inside(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(Self::status_text("Hover", self.hovered.as_ref()));
                    ui.separator();
                    ui.label(Self::status_text("Selected", self.selected.as_ref()));
                });
            });
        egui::CentralPanel::default().show_inside(ui, |ui| {
            event = ChartPlotter::draw(ui, frame, &self.options);
        });

        self.handle_event(event);
    }

    fn status_text(prefix: &str, point: Option<&PointSummary>) -> RichText {
        match point {
            Some(p) => RichText::new(format!(
                "{}: {} · row {} · x = {} · y = {}",
                prefix, p.series, p.row, p.x, p.y
            )),
            None => RichText::new(format!("{}: -", prefix)).color(Color32::GRAY),
        }
    }
}
