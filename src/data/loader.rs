//! Data Loader Module
//! Loads CSV files (via Polars) and JSON table documents into a [`Table`].

use crate::data::{Cell, CellValue, ColumnDescription, ColumnType, Table};
use crate::error::Result;
use log::{debug, info};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Holds the most recently loaded table and where it came from.
pub struct DataLoader {
    table: Option<Table>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            table: None,
            file_path: None,
        }
    }

    /// Load a file, picking the format from its extension (`.json` or CSV).
    pub fn load(&mut self, file_path: &Path) -> Result<&Table> {
        let table = Self::read_table(file_path)?;
        self.file_path = Some(file_path.to_path_buf());
        Ok(&*self.table.insert(table))
    }

    /// Stateless variant of [`DataLoader::load`], used from background threads.
    pub fn read_table(file_path: &Path) -> Result<Table> {
        let is_json = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::read_json(file_path)?
        } else {
            Self::read_csv(file_path)?
        };

        info!(
            "loaded {} rows x {} columns from {}",
            table.rows().len(),
            table.columns().len(),
            file_path.display()
        );
        Ok(table)
    }

    /// Load a CSV file using Polars.
    pub fn read_csv(file_path: &Path) -> Result<Table> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::table_from_dataframe(&df)
    }

    pub fn read_json(file_path: &Path) -> Result<Table> {
        let json = fs::read_to_string(file_path)?;
        Table::from_json_str(&json)
    }

    /// Convert a DataFrame into a table. Numeric columns become numbers,
    /// everything else is read as text; nulls become missing cells.
    pub fn table_from_dataframe(df: &DataFrame) -> Result<Table> {
        let mut descriptions = Vec::with_capacity(df.width());
        let mut columns: Vec<Vec<Option<CellValue>>> = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let numeric = is_numeric(column.dtype());
            debug!(
                "column '{}' dtype {:?} read as {}",
                column.name(),
                column.dtype(),
                if numeric { "number" } else { "text" }
            );

            let values: Vec<Option<CellValue>> = if numeric {
                let as_f64 = column.cast(&DataType::Float64)?;
                let ca = as_f64.f64()?;
                (0..df.height())
                    .map(|i| ca.get(i).filter(|v| !v.is_nan()).map(CellValue::Number))
                    .collect()
            } else {
                let as_str = column.cast(&DataType::String)?;
                let ca = as_str.str()?;
                (0..df.height())
                    .map(|i| ca.get(i).map(|s| CellValue::Text(s.to_string())))
                    .collect()
            };

            let column_type = if numeric {
                ColumnType::Number
            } else {
                ColumnType::String
            };
            descriptions.push(ColumnDescription::new(column.name().to_string(), column_type));
            columns.push(values);
        }

        let mut table = Table::new(descriptions)?;
        for row in 0..df.height() {
            let cells = columns
                .iter()
                .map(|values| Cell::from(values[row].clone()))
                .collect();
            table.add_row(cells)?;
        }
        Ok(table)
    }

    /// Get a reference to the loaded table.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Set the table directly (used for async loading)
    pub fn set_table(&mut self, table: Table, file_path: Option<PathBuf>) {
        self.table = Some(table);
        self.file_path = file_path;
    }

    /// Get file path.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
