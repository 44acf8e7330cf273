//! Table Chart
//!
//! Turns a column-oriented data table into per-column coordinate series,
//! with categorical axis support, and draws them interactively (egui_plot)
//! or to a PNG image (plotters).

pub mod charts;
pub mod data;
pub mod error;
pub mod gui;

pub use charts::{
    build_series, build_tick_labels, resolve_axis_value, AxisSpec, ChartFrame, ChartOptions,
    Series, TickLabel,
};
pub use data::{Table, TableSource};
pub use error::{ChartError, Result};
