//! Table Module
//! Column-described tabular data consumed by the series adapter.

use crate::charts::AxisSide;
use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Raw value held by a table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Text form used for categorical matching: numbers render without a
/// trailing `.0`, so `10.0` displays as `10`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One table cell: raw value, optional display string and free-form properties.
///
/// In JSON a cell is either a bare value (`12`, `"Jan"`, `null`) or an object
/// `{"v": ..., "f": "...", "p": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCell")]
pub struct Cell {
    #[serde(rename = "v")]
    pub value: Option<CellValue>,
    #[serde(rename = "f", skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(rename = "p", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Bare(Option<CellValue>),
    Full {
        #[serde(default)]
        v: Option<CellValue>,
        #[serde(default)]
        f: Option<String>,
        #[serde(default)]
        p: Option<Map<String, Value>>,
    },
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Bare(value) => Cell {
                value,
                ..Default::default()
            },
            RawCell::Full { v, f, p } => Cell {
                value: v,
                formatted: f,
                properties: p,
            },
        }
    }
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// A missing cell.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }
}

impl From<Option<CellValue>> for Cell {
    fn from(value: Option<CellValue>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::new(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::new(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::new(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::new(value)
    }
}

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    #[default]
    String,
    Boolean,
    Date,
    Datetime,
    Timeofday,
}

/// Display properties attached to a column, and to the series built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "xaxis")]
    pub x_axis: AxisSide,
    #[serde(default, rename = "yaxis")]
    pub y_axis: AxisSide,
    /// Series color as `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Any other keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ColumnProperties>,
}

impl ColumnDescription {
    pub fn new(id: impl Into<String>, column_type: ColumnType) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            column_type,
            properties: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Label if set, otherwise the id.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Read access the series adapter needs from a table.
pub trait TableSource {
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;
    /// Raw value at `(row, column)`; `None` for a missing cell or out of range.
    fn value(&self, row: usize, column: usize) -> Option<&CellValue>;
    fn column_properties(&self, column: usize) -> Option<&ColumnProperties>;
    fn column_label(&self, column: usize) -> Option<&str>;
    /// Display string supplied with the cell, if any.
    fn formatted_value(&self, row: usize, column: usize) -> Option<&str>;
}

/// Rows of cells under a fixed set of column descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    #[serde(rename = "cols")]
    columns: Vec<ColumnDescription>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct RawTable {
    cols: Vec<ColumnDescription>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<RawTable> for Table {
    type Error = ChartError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Table::from_rows(raw.cols, raw.rows)
    }
}

impl Table {
    pub fn new(columns: Vec<ColumnDescription>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ChartError::NoColumns);
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn from_rows(columns: Vec<ColumnDescription>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Parse a `{"cols": [...], "rows": [[...], ...]}` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a row. Short rows are padded with missing cells.
    pub fn add_row(&mut self, mut cells: Vec<Cell>) -> Result<()> {
        let expected = self.columns.len();
        if cells.len() > expected {
            return Err(ChartError::RowTooWide {
                row: self.rows.len(),
                expected,
                found: cells.len(),
            });
        }
        cells.resize_with(expected, Cell::empty);
        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[ColumnDescription] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }

    pub fn set_column_properties(&mut self, column: usize, properties: ColumnProperties) {
        if let Some(description) = self.columns.get_mut(column) {
            description.properties = Some(properties);
        }
    }
}

impl TableSource for Table {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.cell(row, column)?.value.as_ref()
    }

    fn column_properties(&self, column: usize) -> Option<&ColumnProperties> {
        self.columns.get(column)?.properties.as_ref()
    }

    fn column_label(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(|c| c.display_name())
    }

    fn formatted_value(&self, row: usize, column: usize) -> Option<&str> {
        self.cell(row, column)?.formatted.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> Vec<ColumnDescription> {
        vec![
            ColumnDescription::new("month", ColumnType::String),
            ColumnDescription::new("sales", ColumnType::Number).with_label("Sales"),
        ]
    }

    #[test]
    fn rejects_table_without_columns() {
        assert!(matches!(Table::new(Vec::new()), Err(ChartError::NoColumns)));
    }

    #[test]
    fn pads_short_rows_and_rejects_wide_ones() {
        let mut table = Table::new(two_columns()).unwrap();
        table.add_row(vec![Cell::from("Jan")]).unwrap();
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.value(0, 1), None);

        let err = table
            .add_row(vec![Cell::from("Feb"), Cell::from(1), Cell::from(2)])
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::RowTooWide {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn parses_bare_and_object_cells() {
        let json = r##"{
            "cols": [
                {"id": "month", "type": "string"},
                {"id": "sales", "label": "Sales", "type": "number",
                 "p": {"yaxis": "2", "color": "#ff0000", "lines": {"show": false}}}
            ],
            "rows": [
                ["Jan", 10],
                [{"v": "Feb", "f": "February"}, null],
                [{"v": "Mar", "p": {"style": "bold"}}, {"v": 30.5}]
            ]
        }"##;
        let table = Table::from_json_str(json).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.value(0, 1), Some(&CellValue::Number(10.0)));
        assert_eq!(table.value(1, 1), None);
        assert_eq!(table.formatted_value(1, 0), Some("February"));
        assert_eq!(table.formatted_value(0, 0), None);
        assert!(table.cell(2, 0).unwrap().properties.is_some());
        assert_eq!(table.value(2, 1), Some(&CellValue::Number(30.5)));

        let props = table.column_properties(1).unwrap();
        assert_eq!(props.y_axis, AxisSide::Secondary);
        assert_eq!(props.x_axis, AxisSide::Primary);
        assert_eq!(props.color.as_deref(), Some("#ff0000"));
        assert!(props.extra.contains_key("lines"));
        assert_eq!(table.column_label(1), Some("Sales"));
        assert_eq!(table.column_label(0), Some("month"));
    }

    #[test]
    fn number_text_form_drops_trailing_zero() {
        assert_eq!(CellValue::from(10).to_string(), "10");
        assert_eq!(CellValue::from(2.5).to_string(), "2.5");
    }
}
