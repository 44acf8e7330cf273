//! Chart Plotter Module
//! Hands a prepared frame to egui_plot for interactive display.

use crate::charts::{
    format_number, parse_hex_color, AxisSlot, AxisTicks, ChartFrame, ChartOptions, Dimension,
    PointSummary, Series,
};
use egui::{Color32, RichText};
use egui_plot::{
    AxisHints, GridMark, HPlacement, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    VPlacement,
};

/// Series colors, assigned in column order unless a column sets its own.
pub const PALETTE: [[u8; 3]; 10] = [
    [231, 76, 60],   // Red
    [52, 152, 219],  // Blue
    [46, 204, 113],  // Green
    [155, 89, 182],  // Purple
    [243, 156, 18],  // Orange
    [26, 188, 156],  // Teal
    [233, 30, 99],   // Pink
    [0, 188, 212],   // Cyan
    [121, 85, 72],   // Brown
    [96, 125, 139],  // Blue Grey
];

/// Pointer distance in pixels within which a point counts as hovered.
const HOVER_RADIUS: f64 = 12.0;

/// Pointer interaction with a plotted point.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotEvent {
    Hover(PointSummary),
    Click(PointSummary),
}

/// Draws chart frames with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color of a series: the column's own `color`, else the palette entry.
    pub fn series_rgb(series: &Series, index: usize) -> [u8; 3] {
        series
            .properties
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(PALETTE[index % PALETTE.len()])
    }

    pub fn series_color(series: &Series, index: usize) -> Color32 {
        let [r, g, b] = Self::series_rgb(series, index);
        Color32::from_rgb(r, g, b)
    }

    /// Draw title and plot. Returns the point under the pointer, if any.
    ///
    /// egui_plot has a single transform, so series on a secondary axis are
    /// drawn at their own values on the shared scale; the secondary axis
    /// hints only move the labels. The PNG export rescales them instead.
    pub fn draw(ui: &mut egui::Ui, frame: &ChartFrame, options: &ChartOptions) -> Option<PlotEvent> {
        Self::draw_title(ui, frame, options);

        if frame.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data").size(options.font_size() * 1.5));
            });
            return None;
        }

        let hover_ticks = frame.ticks.clone();
        let series_axes: Vec<(String, AxisSlot, AxisSlot)> = frame
            .series
            .iter()
            .map(|s| (s.label.clone(), s.x_axis, s.y_axis))
            .collect();
        let mut plot = Plot::new("table_chart_plot")
            .legend(Legend::default())
            .custom_x_axes(Self::axis_hints(frame, options, Dimension::X))
            .custom_y_axes(Self::axis_hints(frame, options, Dimension::Y))
            .label_formatter(move |name: &str, value: &PlotPoint| {
                Self::hover_text(&hover_ticks, &series_axes, name, value.x, value.y)
            });

        // Categorical axes get one grid mark per tick
        if let Some(marks) = Self::tick_marks(frame, AxisSlot::X, AxisSlot::X2) {
            plot = plot.x_grid_spacer(move |_input| marks.clone());
        }
        if let Some(marks) = Self::tick_marks(frame, AxisSlot::Y, AxisSlot::Y2) {
            plot = plot.y_grid_spacer(move |_input| marks.clone());
        }

        for slot in AxisSlot::ALL {
            let Some(axis) = options.axis(slot) else {
                continue;
            };
            for bound in [axis.min, axis.max].into_iter().flatten() {
                plot = match slot.dimension() {
                    Dimension::X => plot.include_x(bound),
                    Dimension::Y => plot.include_y(bound),
                };
            }
        }

        let response = plot.show(ui, |plot_ui| {
            for (index, series) in frame.series.iter().enumerate() {
                let color = Self::series_color(series, index);

                if options.lines {
                    for segment in series.segments() {
                        let points: PlotPoints = segment.into_iter().collect();
                        plot_ui.line(
                            Line::new(points)
                                .color(color)
                                .width(1.5)
                                .name(&series.label),
                        );
                    }
                }

                if options.points || !options.lines {
                    let points: PlotPoints = series.positions().into_iter().collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(color)
                            .name(&series.label),
                    );
                }
            }
        });

        let pointer = response.response.hover_pos()?;
        let value = response.transform.value_from_position(pointer);
        let scale = [
            response.transform.dpos_dvalue_x().abs(),
            response.transform.dpos_dvalue_y().abs(),
        ];
        let hit = frame.nearest_point([value.x, value.y], scale, HOVER_RADIUS)?;
        let summary = frame.describe(&hit);

        if response.response.clicked() {
            Some(PlotEvent::Click(summary))
        } else {
            Some(PlotEvent::Hover(summary))
        }
    }

    /// Hover read-out, with labels from the axes of the series named `name`.
    /// Away from any series the primary axes are used.
    fn hover_text(
        ticks: &AxisTicks,
        series_axes: &[(String, AxisSlot, AxisSlot)],
        name: &str,
        x: f64,
        y: f64,
    ) -> String {
        let (x_axis, y_axis) = series_axes
            .iter()
            .find(|(label, _, _)| label == name)
            .map(|(_, x_axis, y_axis)| (*x_axis, *y_axis))
            .unwrap_or((AxisSlot::X, AxisSlot::Y));
        let text = |slot, value: f64| {
            ticks
                .label_at(slot, value)
                .map(str::to_string)
                .unwrap_or_else(|| format_number(value))
        };

        if name.is_empty() {
            format!("x: {}\ny: {}", text(x_axis, x), text(y_axis, y))
        } else {
            format!("{}\nx: {}\ny: {}", name, text(x_axis, x), text(y_axis, y))
        }
    }

    fn draw_title(ui: &mut egui::Ui, frame: &ChartFrame, options: &ChartOptions) {
        let Some(title) = &frame.title else {
            return;
        };
        let color = options
            .title_rgb()
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .unwrap_or_else(|| ui.visuals().strong_text_color());

        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(title)
                    .size(options.title_font_size())
                    .strong()
                    .color(color),
            );
        });
        ui.add_space(5.0);
    }

    /// Grid marks at the categorical ticks of the primary axis, else the
    /// secondary one.
    fn tick_marks(frame: &ChartFrame, primary: AxisSlot, secondary: AxisSlot) -> Option<Vec<GridMark>> {
        let ticks = frame.ticks.get(primary).or_else(|| frame.ticks.get(secondary))?;
        Some(
            ticks
                .iter()
                .map(|tick| GridMark {
                    value: tick.position as f64,
                    step_size: 1.0,
                })
                .collect(),
        )
    }

    /// Primary axis, plus the secondary one when configured or used by a series.
    fn axis_hints<'a>(
        frame: &ChartFrame,
        options: &ChartOptions,
        dimension: Dimension,
    ) -> Vec<AxisHints<'a>> {
        let (primary, secondary) = match dimension {
            Dimension::X => (AxisSlot::X, AxisSlot::X2),
            Dimension::Y => (AxisSlot::Y, AxisSlot::Y2),
        };

        let mut hints = vec![Self::axis_hint(frame, options, primary)];
        let secondary_used = options.axis(secondary).is_some()
            || frame
                .series
                .iter()
                .any(|s| s.x_axis == secondary || s.y_axis == secondary);
        if secondary_used {
            hints.push(Self::axis_hint(frame, options, secondary));
        }
        hints
    }

    fn axis_hint<'a>(frame: &ChartFrame, options: &ChartOptions, slot: AxisSlot) -> AxisHints<'a> {
        let mut hint = match slot {
            AxisSlot::X => AxisHints::new_x().placement(VPlacement::Bottom),
            AxisSlot::X2 => AxisHints::new_x().placement(VPlacement::Top),
            AxisSlot::Y => AxisHints::new_y().placement(HPlacement::Left),
            AxisSlot::Y2 => AxisHints::new_y().placement(HPlacement::Right),
        };

        if let Some(title) = options.axis_title(slot) {
            hint = hint.label(title.to_string());
        }

        if frame.ticks.get(slot).is_some() {
            let ticks = frame.ticks.clone();
            hint = hint.formatter(move |mark, _range| {
                ticks
                    .label_at(slot, mark.value)
                    .map(str::to_string)
                    .unwrap_or_default()
            });
        }

        hint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{AxisSide, AxisSpec};
    use crate::data::{Cell, ColumnDescription, ColumnProperties, ColumnType, Table};

    #[test]
    fn column_color_overrides_palette() {
        let mut table = Table::from_rows(
            vec![
                ColumnDescription::new("x", ColumnType::Number),
                ColumnDescription::new("a", ColumnType::Number),
                ColumnDescription::new("b", ColumnType::Number),
            ],
            vec![vec![Cell::from(1), Cell::from(2), Cell::from(3)]],
        )
        .unwrap();
        table.set_column_properties(
            2,
            ColumnProperties {
                color: Some("#010203".into()),
                ..Default::default()
            },
        );
        let frame = ChartFrame::prepare(&table, &ChartOptions::default()).unwrap();

        assert_eq!(ChartPlotter::series_rgb(&frame.series[0], 0), PALETTE[0]);
        assert_eq!(ChartPlotter::series_rgb(&frame.series[1], 1), [1, 2, 3]);
        assert_eq!(ChartPlotter::series_rgb(&frame.series[0], 11), PALETTE[1]);
    }

    #[test]
    fn hover_text_uses_the_series_own_axes() {
        let mut table = Table::from_rows(
            vec![
                ColumnDescription::new("day", ColumnType::String),
                ColumnDescription::new("visits", ColumnType::Number),
                ColumnDescription::new("level", ColumnType::String),
            ],
            vec![vec![Cell::from("Mon"), Cell::from(3), Cell::from("high")]],
        )
        .unwrap();
        table.set_column_properties(
            2,
            ColumnProperties {
                y_axis: AxisSide::Secondary,
                ..Default::default()
            },
        );
        let options = ChartOptions {
            xaxis: Some(AxisSpec::categorical(["Mon"])),
            y2axis: Some(AxisSpec::categorical(["low", "high"])),
            ..Default::default()
        };
        let frame = ChartFrame::prepare(&table, &options).unwrap();
        let axes: Vec<(String, AxisSlot, AxisSlot)> = frame
            .series
            .iter()
            .map(|s| (s.label.clone(), s.x_axis, s.y_axis))
            .collect();

        assert_eq!(
            ChartPlotter::hover_text(&frame.ticks, &axes, "level", 0.0, 1.0),
            "level\nx: Mon\ny: high"
        );
        assert_eq!(
            ChartPlotter::hover_text(&frame.ticks, &axes, "visits", 0.0, 1.0),
            "visits\nx: Mon\ny: 1"
        );
        assert_eq!(
            ChartPlotter::hover_text(&frame.ticks, &axes, "", 0.0, 2.5),
            "x: Mon\ny: 2.5"
        );
    }

    #[test]
    fn grid_marks_follow_categorical_ticks() {
        let table = Table::from_rows(
            vec![
                ColumnDescription::new("m", ColumnType::String),
                ColumnDescription::new("v", ColumnType::Number),
            ],
            vec![vec![Cell::from("a"), Cell::from(1)]],
        )
        .unwrap();
        let options = ChartOptions {
            x2axis: Some(AxisSpec::categorical(["a", "b"])),
            ..Default::default()
        };
        let frame = ChartFrame::prepare(&table, &options).unwrap();

        let marks = ChartPlotter::tick_marks(&frame, AxisSlot::X, AxisSlot::X2).unwrap();
        let values: Vec<f64> = marks.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0.0, 1.0]);
        assert!(ChartPlotter::tick_marks(&frame, AxisSlot::Y, AxisSlot::Y2).is_none());
    }
}
