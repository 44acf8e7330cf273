//! Series Module
//! Reshapes a table into per-column coordinate series for a plotting routine.

use crate::charts::axis::{resolve_axis_value, AxisSlot, Dimension};
use crate::charts::ChartOptions;
use crate::data::{CellValue, ColumnProperties, TableSource};
use crate::error::{ChartError, Result};
use log::{debug, trace};

/// One (x, y) pair of a series, tagged with the row it came from.
///
/// A coordinate is `None` when the raw value was present but matched no label
/// of a categorical axis. Such a point is a gap: it keeps its slot, is never
/// drawn, and lines are broken around it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    pub row: usize,
    pub x: Option<CellValue>,
    pub y: Option<CellValue>,
    /// Display strings the source cells carried (`f` in a JSON table).
    pub x_formatted: Option<String>,
    pub y_formatted: Option<String>,
}

impl DataPoint {
    /// Numeric position, if both coordinates resolved to numbers.
    pub fn position(&self) -> Option<[f64; 2]> {
        Some([self.x.as_ref()?.as_f64()?, self.y.as_ref()?.as_f64()?])
    }

    pub fn is_gap(&self) -> bool {
        self.x.is_none() || self.y.is_none()
    }
}

/// Coordinate data derived from one table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Source column index.
    pub column: usize,
    pub label: String,
    pub properties: ColumnProperties,
    pub x_axis: AxisSlot,
    pub y_axis: AxisSlot,
    pub points: Vec<DataPoint>,
}

impl Series {
    /// Every drawable position, in row order.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.points.iter().filter_map(DataPoint::position).collect()
    }

    /// Runs of drawable positions from consecutive rows. A skipped row or an
    /// undrawable point ends the current run.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        let mut previous_row: Option<usize> = None;

        for point in &self.points {
            let contiguous = previous_row.map_or(true, |row| point.row == row + 1);
            if !contiguous && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }

            match point.position() {
                Some(position) => current.push(position),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
            previous_row = Some(point.row);
        }

        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    pub fn uses_secondary_axis(&self) -> bool {
        self.x_axis == AxisSlot::X2 || self.y_axis == AxisSlot::Y2
    }
}

/// Build one series per data column (1..columns), in column order.
///
/// Column 0 supplies x and the data column supplies y, or the reverse when
/// `options.inverted` is set. A row is skipped for a series when either raw
/// value is missing. Coordinates are resolved through the axis the column's
/// properties select.
pub fn build_series<T: TableSource + ?Sized>(
    table: &T,
    options: &ChartOptions,
) -> Result<Vec<Series>> {
    let columns = table.column_count();
    if columns < 2 {
        return Err(ChartError::InsufficientData { columns });
    }

    let rows = table.row_count();
    let mut all_series = Vec::with_capacity(columns - 1);

    for column in 1..columns {
        let properties = table.column_properties(column).cloned().unwrap_or_default();
        let x_axis = AxisSlot::for_series(Dimension::X, &properties);
        let y_axis = AxisSlot::for_series(Dimension::Y, &properties);
        let x_spec = options.axis(x_axis);
        let y_spec = options.axis(y_axis);

        let mut points = Vec::with_capacity(rows);
        for row in 0..rows {
            let (x_column, y_column) = if options.inverted {
                (column, 0)
            } else {
                (0, column)
            };
            let (Some(x_raw), Some(y_raw)) = (table.value(row, x_column), table.value(row, y_column))
            else {
                trace!("column {} row {} skipped: missing value", column, row);
                continue;
            };

            points.push(DataPoint {
                row,
                x: resolve_axis_value(x_spec, x_raw),
                y: resolve_axis_value(y_spec, y_raw),
                x_formatted: table.formatted_value(row, x_column).map(str::to_string),
                y_formatted: table.formatted_value(row, y_column).map(str::to_string),
            });
        }

        let label = properties
            .label
            .clone()
            .or_else(|| table.column_label(column).map(str::to_string))
            .unwrap_or_else(|| format!("Series {}", column));

        let gaps = points.iter().filter(|p| p.is_gap()).count();
        debug!(
            "series '{}' (column {}): {} points, {} unresolved, axes {:?}/{:?}",
            label,
            column,
            points.len(),
            gaps,
            x_axis,
            y_axis
        );

        all_series.push(Series {
            column,
            label,
            properties,
            x_axis,
            y_axis,
            points,
        });
    }

    Ok(all_series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{AxisSide, AxisSpec};
    use crate::data::{Cell, ColumnDescription, ColumnType, Table};

    fn table(columns: usize, rows: Vec<Vec<Cell>>) -> Table {
        let descriptions = (0..columns)
            .map(|i| ColumnDescription::new(format!("c{}", i), ColumnType::Number))
            .collect();
        Table::from_rows(descriptions, rows).unwrap()
    }

    fn num(v: f64) -> Option<CellValue> {
        Some(CellValue::Number(v))
    }

    fn point(row: usize, x: Option<CellValue>, y: Option<CellValue>) -> DataPoint {
        DataPoint {
            row,
            x,
            y,
            ..Default::default()
        }
    }

    #[test]
    fn one_series_per_data_column_in_order() {
        let t = table(
            3,
            vec![
                vec![Cell::from(1), Cell::from(10), Cell::from(100)],
                vec![Cell::from(2), Cell::from(20), Cell::from(200)],
            ],
        );
        let series = build_series(&t, &ChartOptions::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].column, 1);
        assert_eq!(series[1].column, 2);
        assert_eq!(series[0].label, "c1");
        assert_eq!(series[1].positions(), vec![[1.0, 100.0], [2.0, 200.0]]);
    }

    #[test]
    fn single_column_is_insufficient() {
        let t = table(1, vec![vec![Cell::from(1)]]);
        let err = build_series(&t, &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, ChartError::InsufficientData { columns: 1 }));
    }

    #[test]
    fn missing_values_skip_only_their_own_pair() {
        let t = table(
            3,
            vec![
                vec![Cell::from(1), Cell::empty(), Cell::from(100)],
                vec![Cell::empty(), Cell::from(20), Cell::from(200)],
                vec![Cell::from(3), Cell::from(30), Cell::from(300)],
            ],
        );
        let series = build_series(&t, &ChartOptions::default()).unwrap();

        let rows: Vec<usize> = series[0].points.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![2]);
        let rows: Vec<usize> = series[1].points.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn inverted_swaps_axis_roles() {
        let t = table(2, vec![vec![Cell::from(1), Cell::from(10)]]);
        let normal = build_series(&t, &ChartOptions::default()).unwrap();
        let inverted = build_series(
            &t,
            &ChartOptions {
                inverted: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(normal[0].points[0].x, num(1.0));
        assert_eq!(normal[0].points[0].y, num(10.0));
        assert_eq!(inverted[0].points[0].x, num(10.0));
        assert_eq!(inverted[0].points[0].y, num(1.0));
    }

    #[test]
    fn categorical_axis_resolves_and_keeps_gaps() {
        let mut t = Table::new(vec![
            ColumnDescription::new("month", ColumnType::String),
            ColumnDescription::new("sales", ColumnType::Number),
        ])
        .unwrap();
        t.add_row(vec![Cell::from("Jan"), Cell::from(10)]).unwrap();
        t.add_row(vec![Cell::from("Feb"), Cell::from(20)]).unwrap();
        t.add_row(vec![Cell::from("Smarch"), Cell::from(30)]).unwrap();

        let options = ChartOptions {
            xaxis: Some(AxisSpec::categorical(["Jan", "Feb"])),
            ..Default::default()
        };
        let series = build_series(&t, &options).unwrap();
        let points = &series[0].points;

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].position(), Some([0.0, 10.0]));
        assert_eq!(points[1].position(), Some([1.0, 20.0]));
        assert!(points[2].is_gap());
        assert_eq!(points[2].x, None);
        assert_eq!(points[2].y, num(30.0));
    }

    #[test]
    fn text_on_numeric_axis_passes_through_undrawable() {
        let mut t = Table::new(vec![
            ColumnDescription::new("month", ColumnType::String),
            ColumnDescription::new("sales", ColumnType::Number),
        ])
        .unwrap();
        t.add_row(vec![Cell::from("Jan"), Cell::from(10)]).unwrap();

        let series = build_series(&t, &ChartOptions::default()).unwrap();
        assert_eq!(series[0].points[0].x, Some(CellValue::from("Jan")));
        assert!(!series[0].points[0].is_gap());
        assert!(series[0].positions().is_empty());
    }

    #[test]
    fn secondary_axis_lookup_follows_column_properties() {
        let mut t = table(
            3,
            vec![
                vec![Cell::from(1), Cell::from("lo"), Cell::from("lo")],
                vec![Cell::from(2), Cell::from("hi"), Cell::from("hi")],
            ],
        );
        t.set_column_properties(
            2,
            ColumnProperties {
                y_axis: AxisSide::Secondary,
                label: Some("Level".into()),
                ..Default::default()
            },
        );
        let options = ChartOptions {
            y2axis: Some(AxisSpec::categorical(["lo", "hi"])),
            ..Default::default()
        };
        let series = build_series(&t, &options).unwrap();

        assert_eq!(series[0].y_axis, AxisSlot::Y);
        assert!(series[0].positions().is_empty());
        assert_eq!(series[1].y_axis, AxisSlot::Y2);
        assert_eq!(series[1].label, "Level");
        assert!(series[1].uses_secondary_axis());
        assert_eq!(series[1].positions(), vec![[1.0, 0.0], [2.0, 1.0]]);
    }

    #[test]
    fn formatted_cell_text_follows_its_coordinate() {
        let t = Table::from_json_str(
            r#"{"cols": [{"id": "x"}, {"id": "v"}],
                "rows": [[1, {"v": 0.25, "f": "25%"}], [{"v": 2, "f": "two"}, 0.5]]}"#,
        )
        .unwrap();

        let normal = build_series(&t, &ChartOptions::default()).unwrap();
        assert_eq!(normal[0].points[0].y_formatted.as_deref(), Some("25%"));
        assert_eq!(normal[0].points[0].x_formatted, None);
        assert_eq!(normal[0].points[1].x_formatted.as_deref(), Some("two"));

        let inverted = build_series(
            &t,
            &ChartOptions {
                inverted: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(inverted[0].points[0].x_formatted.as_deref(), Some("25%"));
        assert_eq!(inverted[0].points[1].y_formatted.as_deref(), Some("two"));
    }

    #[test]
    fn empty_table_builds_empty_series() {
        let t = table(3, Vec::new());
        let series = build_series(&t, &ChartOptions::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.points.is_empty()));
    }

    #[test]
    fn segments_break_at_skipped_rows_and_gaps() {
        let series = Series {
            column: 1,
            label: "s".into(),
            properties: ColumnProperties::default(),
            x_axis: AxisSlot::X,
            y_axis: AxisSlot::Y,
            points: vec![
                point(0, num(0.0), num(1.0)),
                point(1, num(1.0), num(2.0)),
                // row 2 skipped
                point(3, num(3.0), num(4.0)),
                point(4, None, num(5.0)),
                point(5, num(5.0), num(6.0)),
                point(6, num(6.0), num(7.0)),
            ],
        };
        assert_eq!(
            series.segments(),
            vec![
                vec![[0.0, 1.0], [1.0, 2.0]],
                vec![[3.0, 4.0]],
                vec![[5.0, 6.0], [6.0, 7.0]],
            ]
        );
    }
}
