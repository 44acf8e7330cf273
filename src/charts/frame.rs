//! Chart Frame Module
//! Everything one render call hands to a plotting backend.

use crate::charts::axis::{build_tick_labels, AxisSlot, TickLabel};
use crate::charts::layout::ChartLayout;
use crate::charts::series::{build_series, DataPoint, Series};
use crate::charts::ChartOptions;
use crate::data::{CellValue, TableSource};
use crate::error::Result;
use log::debug;

/// Categorical tick overrides per axis. `None` leaves ticks to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTicks {
    pub x: Option<Vec<TickLabel>>,
    pub x2: Option<Vec<TickLabel>>,
    pub y: Option<Vec<TickLabel>>,
    pub y2: Option<Vec<TickLabel>>,
}

impl AxisTicks {
    fn from_options(options: &ChartOptions) -> Self {
        let ticks = |slot| options.axis(slot).and_then(build_tick_labels);
        Self {
            x: ticks(AxisSlot::X),
            x2: ticks(AxisSlot::X2),
            y: ticks(AxisSlot::Y),
            y2: ticks(AxisSlot::Y2),
        }
    }

    pub fn get(&self, slot: AxisSlot) -> Option<&[TickLabel]> {
        match slot {
            AxisSlot::X => self.x.as_deref(),
            AxisSlot::X2 => self.x2.as_deref(),
            AxisSlot::Y => self.y.as_deref(),
            AxisSlot::Y2 => self.y2.as_deref(),
        }
    }

    /// Display label of the tick at `value`, if `value` sits on one.
    pub fn label_at(&self, slot: AxisSlot, value: f64) -> Option<&str> {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 {
            return None;
        }
        self.get(slot)?
            .iter()
            .find(|tick| tick.position as f64 == rounded)
            .map(|tick| tick.label.as_str())
    }
}

/// A point found near a target position.
#[derive(Debug, Clone, Copy)]
pub struct PointHit<'a> {
    pub series: &'a Series,
    pub point: &'a DataPoint,
    pub position: [f64; 2],
    /// Scaled distance to the target.
    pub distance: f64,
}

/// Human-readable description of a data point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSummary {
    pub series: String,
    pub row: usize,
    pub x: String,
    pub y: String,
}

/// Prepared payload of one render call.
#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub title: Option<String>,
    pub layout: ChartLayout,
    pub series: Vec<Series>,
    pub ticks: AxisTicks,
    pub rows: usize,
}

impl ChartFrame {
    /// Build series, tick overrides and layout for `table`.
    ///
    /// A table without rows gives an empty frame without checking columns;
    /// otherwise fewer than two columns is an error.
    pub fn prepare<T: TableSource + ?Sized>(table: &T, options: &ChartOptions) -> Result<Self> {
        let layout = ChartLayout::compute(options, options.width as f32, options.height as f32);
        let rows = table.row_count();

        let (series, ticks) = if rows == 0 {
            (Vec::new(), AxisTicks::default())
        } else {
            (build_series(table, options)?, AxisTicks::from_options(options))
        };

        debug!(
            "prepared frame: {} rows, {} series, plot area {}x{}",
            rows,
            series.len(),
            layout.plot.width,
            layout.plot.height
        );

        Ok(Self {
            title: options.title.clone(),
            layout,
            series,
            ticks,
            rows,
        })
    }

    /// True when there is no data to plot.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Min/max of drawable positions over series drawn on the given axes.
    pub fn bounds(&self, x_axis: AxisSlot, y_axis: AxisSlot) -> Option<([f64; 2], [f64; 2])> {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        let mut any = false;

        for series in &self.series {
            let x_matches = series.x_axis == x_axis;
            let y_matches = series.y_axis == y_axis;
            if !x_matches && !y_matches {
                continue;
            }
            for [x, y] in series.positions() {
                if x_matches && x.is_finite() {
                    min[0] = min[0].min(x);
                    max[0] = max[0].max(x);
                    any = true;
                }
                if y_matches && y.is_finite() {
                    min[1] = min[1].min(y);
                    max[1] = max[1].max(y);
                    any = true;
                }
            }
        }

        any.then_some((min, max))
    }

    /// Nearest drawable point to `target`, measuring distance after
    /// multiplying by `scale` (e.g. pixels per unit). Points further than
    /// `max_distance` are ignored.
    pub fn nearest_point(
        &self,
        target: [f64; 2],
        scale: [f64; 2],
        max_distance: f64,
    ) -> Option<PointHit<'_>> {
        let mut best: Option<PointHit<'_>> = None;

        for series in &self.series {
            for point in &series.points {
                let Some(position) = point.position() else {
                    continue;
                };
                let dx = (position[0] - target[0]) * scale[0];
                let dy = (position[1] - target[1]) * scale[1];
                let distance = (dx * dx + dy * dy).sqrt();
                if distance > max_distance {
                    continue;
                }
                if best.as_ref().map_or(true, |b| distance < b.distance) {
                    best = Some(PointHit {
                        series,
                        point,
                        position,
                        distance,
                    });
                }
            }
        }

        best
    }

    /// Describe a hit. A cell's own formatted text wins, then the categorical
    /// label of its axis, then the raw value.
    pub fn describe(&self, hit: &PointHit<'_>) -> PointSummary {
        let text = |slot: AxisSlot, formatted: Option<&String>, value: Option<&CellValue>| {
            if let Some(formatted) = formatted {
                return formatted.clone();
            }
            match value {
                Some(CellValue::Number(n)) => self
                    .ticks
                    .label_at(slot, *n)
                    .map(str::to_string)
                    .unwrap_or_else(|| format_number(*n)),
                Some(other) => other.to_string(),
                None => "-".to_string(),
            }
        };

        PointSummary {
            series: hit.series.label.clone(),
            row: hit.point.row,
            x: text(
                hit.series.x_axis,
                hit.point.x_formatted.as_ref(),
                hit.point.x.as_ref(),
            ),
            y: text(
                hit.series.y_axis,
                hit.point.y_formatted.as_ref(),
                hit.point.y.as_ref(),
            ),
        }
    }
}

/// Short decimal form: at most two decimals, trailing zeros removed.
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::AxisSpec;
    use crate::data::{Cell, ColumnDescription, ColumnType, Table};
    use crate::error::ChartError;

    fn months_table() -> Table {
        Table::from_rows(
            vec![
                ColumnDescription::new("month", ColumnType::String),
                ColumnDescription::new("sales", ColumnType::Number).with_label("Sales"),
                ColumnDescription::new("costs", ColumnType::Number).with_label("Costs"),
            ],
            vec![
                vec![Cell::from("Jan"), Cell::from(10), Cell::from(4)],
                vec![Cell::from("Feb"), Cell::from(20), Cell::from(8)],
                vec![Cell::from("Mar"), Cell::from(15), Cell::empty()],
            ],
        )
        .unwrap()
    }

    fn categorical_options() -> ChartOptions {
        ChartOptions {
            title: Some("Q1".into()),
            xaxis: Some(AxisSpec::categorical(["Jan", "Feb", "Mar"]).with_tick_format("{}.")),
            ..Default::default()
        }
    }

    #[test]
    fn empty_table_gives_empty_frame_even_with_one_column() {
        let table = Table::new(vec![ColumnDescription::new("x", ColumnType::Number)]).unwrap();
        let frame = ChartFrame::prepare(&table, &ChartOptions::default()).unwrap();
        assert!(frame.is_empty());
        assert!(frame.series.is_empty());
        assert_eq!(frame.bounds(AxisSlot::X, AxisSlot::Y), None);
    }

    #[test]
    fn one_column_with_rows_is_an_error() {
        let table = Table::from_rows(
            vec![ColumnDescription::new("x", ColumnType::Number)],
            vec![vec![Cell::from(1)]],
        )
        .unwrap();
        let err = ChartFrame::prepare(&table, &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, ChartError::InsufficientData { columns: 1 }));
    }

    #[test]
    fn frame_carries_series_ticks_and_title() {
        let frame = ChartFrame::prepare(&months_table(), &categorical_options()).unwrap();
        assert_eq!(frame.title.as_deref(), Some("Q1"));
        assert_eq!(frame.series.len(), 2);
        assert_eq!(frame.ticks.get(AxisSlot::X).map(|t| t.len()), Some(3));
        assert_eq!(frame.ticks.label_at(AxisSlot::X, 1.0), Some("Feb."));
        assert_eq!(frame.ticks.label_at(AxisSlot::X, 1.4), None);
        assert!(frame.ticks.get(AxisSlot::Y).is_none());
        assert!(frame.layout.title_band > 0.0);
    }

    #[test]
    fn bounds_cover_series_on_requested_axes() {
        let frame = ChartFrame::prepare(&months_table(), &categorical_options()).unwrap();
        let (min, max) = frame.bounds(AxisSlot::X, AxisSlot::Y).unwrap();
        assert_eq!(min, [0.0, 4.0]);
        assert_eq!(max, [2.0, 20.0]);
        assert_eq!(frame.bounds(AxisSlot::X2, AxisSlot::Y2), None);
    }

    #[test]
    fn nearest_point_respects_scale_and_radius() {
        let frame = ChartFrame::prepare(&months_table(), &categorical_options()).unwrap();

        let hit = frame.nearest_point([1.1, 19.0], [1.0, 1.0], 5.0).unwrap();
        assert_eq!(hit.series.label, "Sales");
        assert_eq!(hit.point.row, 1);
        assert_eq!(hit.position, [1.0, 20.0]);

        assert!(frame.nearest_point([1.1, 19.0], [100.0, 100.0], 5.0).is_none());
        assert!(frame.nearest_point([10.0, 100.0], [1.0, 1.0], 5.0).is_none());
    }

    #[test]
    fn describe_uses_tick_labels() {
        let frame = ChartFrame::prepare(&months_table(), &categorical_options()).unwrap();
        let hit = frame.nearest_point([0.0, 4.0], [1.0, 1.0], 0.5).unwrap();
        assert_eq!(
            frame.describe(&hit),
            PointSummary {
                series: "Costs".into(),
                row: 0,
                x: "Jan.".into(),
                y: "4".into(),
            }
        );
    }

    #[test]
    fn describe_prefers_formatted_cell_text() {
        let mut table = months_table();
        table
            .add_row(vec![
                Cell::from("Apr"),
                Cell {
                    formatted: Some("forty".into()),
                    ..Cell::from(40)
                },
                Cell::from(9),
            ])
            .unwrap();
        let options = ChartOptions {
            xaxis: Some(AxisSpec::categorical(["Jan", "Feb", "Mar", "Apr"])),
            ..Default::default()
        };
        let frame = ChartFrame::prepare(&table, &options).unwrap();

        let hit = frame.nearest_point([3.0, 40.0], [1.0, 1.0], 0.5).unwrap();
        let summary = frame.describe(&hit);
        assert_eq!(summary.x, "Apr");
        assert_eq!(summary.y, "forty");
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_number(-0.001), "0");
    }
}
