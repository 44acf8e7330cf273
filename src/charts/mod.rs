//! Charts module - Table to series adaptation and chart rendering

mod axis;
mod frame;
mod layout;
mod options;
mod plotter;
mod renderer;
mod series;

pub use axis::{
    build_tick_labels, resolve_axis_value, AxisSide, AxisSlot, AxisSpec, Dimension, TickFormatter,
    TickLabel,
};
pub use frame::{format_number, AxisTicks, ChartFrame, PointHit, PointSummary};
pub use layout::{ChartLayout, Rect};
pub use options::{parse_hex_color, ChartOptions, DEFAULT_FONT_SIZE};
pub use plotter::{ChartPlotter, PlotEvent};
pub use renderer::StaticChartRenderer;
pub use series::{build_series, DataPoint, Series};
