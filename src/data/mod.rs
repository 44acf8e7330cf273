//! Data module - table model and loading

mod loader;
mod table;

pub use loader::DataLoader;
pub use table::{Cell, CellValue, ColumnDescription, ColumnProperties, ColumnType, Table, TableSource};
