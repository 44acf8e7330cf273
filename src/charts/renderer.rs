//! Static Chart Renderer
//! Writes a prepared frame to a PNG image with plotters.

use crate::charts::plotter::ChartPlotter;
use crate::charts::{format_number, AxisSlot, ChartFrame, ChartOptions, Dimension, Series};
use crate::error::{ChartError, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

const FONT_FAMILY: &str = "sans-serif";

/// Share of the data span added on each side of a numeric axis.
const RANGE_PADDING: f64 = 0.05;

fn render_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Value ranges of the four axes for one image.
#[derive(Debug, Clone, PartialEq)]
struct AxisRanges {
    x: Range<f64>,
    x2: Range<f64>,
    y: Range<f64>,
    y2: Range<f64>,
}

impl AxisRanges {
    fn compute(frame: &ChartFrame, options: &ChartOptions) -> Self {
        Self {
            x: StaticChartRenderer::axis_range(frame, options, AxisSlot::X),
            x2: StaticChartRenderer::axis_range(frame, options, AxisSlot::X2),
            y: StaticChartRenderer::axis_range(frame, options, AxisSlot::Y),
            y2: StaticChartRenderer::axis_range(frame, options, AxisSlot::Y2),
        }
    }

    fn get(&self, slot: AxisSlot) -> &Range<f64> {
        match slot {
            AxisSlot::X => &self.x,
            AxisSlot::X2 => &self.x2,
            AxisSlot::Y => &self.y,
            AxisSlot::Y2 => &self.y2,
        }
    }

    /// Map a series position from its own axes onto the primary coordinates
    /// every series is drawn in.
    fn project(&self, series: &Series, [x, y]: [f64; 2]) -> (f64, f64) {
        (
            rescale(x, self.get(series.x_axis), &self.x),
            rescale(y, self.get(series.y_axis), &self.y),
        )
    }
}

fn rescale(value: f64, from: &Range<f64>, to: &Range<f64>) -> f64 {
    if from == to {
        return value;
    }
    to.start + (value - from.start) * (to.end - to.start) / (from.end - from.start)
}

/// Static chart renderer for image export.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `frame` to a PNG file of `options.width` x `options.height`.
    pub fn render_png(frame: &ChartFrame, options: &ChartOptions, path: &Path) -> Result<()> {
        let size = (options.width.max(1), options.height.max(1));
        let root = BitMapBackend::new(path, size).into_drawing_area();

        Self::draw(&root, frame, options)?;
        root.present().map_err(render_error)?;

        info!(
            "chart written to {} ({}x{})",
            path.display(),
            size.0,
            size.1
        );
        Ok(())
    }

    /// Draw onto any plotters backend.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &ChartFrame,
        options: &ChartOptions,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(render_error)?;
        let font_size = f64::from(options.font_size());

        let area = match &frame.title {
            Some(title) => {
                let [r, g, b] = options.title_rgb().unwrap_or([0, 0, 0]);
                let style = (FONT_FAMILY, f64::from(options.title_font_size()))
                    .into_font()
                    .color(&RGBColor(r, g, b));
                root.titled(title, style).map_err(render_error)?
            }
            None => root.clone(),
        };

        if frame.is_empty() {
            let (width, height) = area.dim_in_pixel();
            let style = TextStyle::from((FONT_FAMILY, font_size * 1.5).into_font())
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(
                "No data",
                (width as i32 / 2, height as i32 / 2),
                style,
            ))
            .map_err(render_error)?;
            return Ok(());
        }

        Self::draw_chart(&area, frame, options, font_size)
    }

    fn draw_chart<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        frame: &ChartFrame,
        options: &ChartOptions,
        font_size: f64,
    ) -> Result<()> {
        let layout = &frame.layout;
        let secondary_x = Self::has_secondary(frame, options, Dimension::X);
        let secondary_y = Self::has_secondary(frame, options, Dimension::Y);

        // Tick labels plus the axis title band
        let label_rows = (font_size * 2.0) as f32;
        let label_columns = (font_size * 4.0) as f32;
        let top = if secondary_x { label_rows + layout.top_band } else { 0.0 };
        let right = if secondary_y { label_columns + layout.right_gutter } else { 0.0 };

        let ranges = AxisRanges::compute(frame, options);
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size((label_rows + layout.bottom_band) as u32)
            .y_label_area_size((label_columns + layout.left_gutter) as u32)
            .top_x_label_area_size(top as u32)
            .right_y_label_area_size(right as u32)
            .build_cartesian_2d(ranges.x.clone(), ranges.y.clone())
            .map_err(render_error)?
            // Only labels the secondary axes; series are projected onto the primary ones
            .set_secondary_coord(ranges.x2.clone(), ranges.y2.clone());

        let label_font = (FONT_FAMILY, font_size);
        let x_fmt = |v: &f64| Self::tick_text(frame, AxisSlot::X, *v);
        let y_fmt = |v: &f64| Self::tick_text(frame, AxisSlot::Y, *v);
        let x2_fmt = |v: &f64| Self::tick_text(frame, AxisSlot::X2, *v);
        let y2_fmt = |v: &f64| Self::tick_text(frame, AxisSlot::Y2, *v);

        let mut mesh = chart.configure_mesh();
        mesh.label_style(label_font)
            .axis_desc_style(label_font)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt);
        if let Some(title) = options.axis_title(AxisSlot::X) {
            mesh.x_desc(title);
        }
        if let Some(title) = options.axis_title(AxisSlot::Y) {
            mesh.y_desc(title);
        }
        mesh.draw().map_err(render_error)?;

        if secondary_x || secondary_y {
            let mut secondary = chart.configure_secondary_axes();
            secondary
                .label_style(label_font)
                .axis_desc_style(label_font)
                .x_label_formatter(&x2_fmt)
                .y_label_formatter(&y2_fmt);
            if let Some(title) = options.axis_title(AxisSlot::X2) {
                secondary.x_desc(title);
            }
            if let Some(title) = options.axis_title(AxisSlot::Y2) {
                secondary.y_desc(title);
            }
            secondary.draw().map_err(render_error)?;
        }

        for (index, series) in frame.series.iter().enumerate() {
            let [r, g, b] = ChartPlotter::series_rgb(series, index);
            let color = RGBColor(r, g, b);

            if options.lines {
                for segment in series.segments() {
                    chart
                        .draw_series(LineSeries::new(
                            segment.into_iter().map(|p| ranges.project(series, p)),
                            color.stroke_width(2),
                        ))
                        .map_err(render_error)?;
                }
            }

            if options.points || !options.lines {
                chart
                    .draw_series(
                        series
                            .positions()
                            .into_iter()
                            .map(|p| Circle::new(ranges.project(series, p), 3, color.filled())),
                    )
                    .map_err(render_error)?;
            }

            // Legend entry
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                .map_err(render_error)?
                .label(series.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }

        chart
            .configure_series_labels()
            .label_font(label_font)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }

    fn has_secondary(frame: &ChartFrame, options: &ChartOptions, dimension: Dimension) -> bool {
        let slot = match dimension {
            Dimension::X => AxisSlot::X2,
            Dimension::Y => AxisSlot::Y2,
        };
        options.axis(slot).is_some()
            || frame
                .series
                .iter()
                .any(|s| s.x_axis == slot || s.y_axis == slot)
    }

    /// Tick text: categorical label where the axis has ticks, else the number.
    fn tick_text(frame: &ChartFrame, slot: AxisSlot, value: f64) -> String {
        if frame.ticks.get(slot).is_some() {
            frame
                .ticks
                .label_at(slot, value)
                .map(str::to_string)
                .unwrap_or_default()
        } else {
            format_number(value)
        }
    }

    /// Value range of an axis from the data on it, its categorical ticks and
    /// any configured min/max. An unused secondary axis mirrors its primary.
    fn axis_range(frame: &ChartFrame, options: &ChartOptions, slot: AxisSlot) -> Range<f64> {
        let (x_axis, y_axis, component) = match slot {
            AxisSlot::X => (AxisSlot::X, AxisSlot::Y, 0),
            AxisSlot::Y => (AxisSlot::X, AxisSlot::Y, 1),
            AxisSlot::X2 => (AxisSlot::X2, AxisSlot::Y2, 0),
            AxisSlot::Y2 => (AxisSlot::X2, AxisSlot::Y2, 1),
        };

        let data = frame
            .bounds(x_axis, y_axis)
            .map(|(min, max)| (min[component], max[component]))
            .filter(|(min, max)| min.is_finite() && max.is_finite());
        let ticks = frame.ticks.get(slot).and_then(|ticks| {
            let first = ticks.iter().map(|t| t.position).min()?;
            let last = ticks.iter().map(|t| t.position).max()?;
            Some((first as f64, last as f64))
        });
        let extent = match (data, ticks) {
            (Some(d), Some(t)) => Some((d.0.min(t.0), d.1.max(t.1))),
            (d, t) => d.or(t),
        };

        let axis = options.axis(slot);
        let min = axis.and_then(|a| a.min);
        let max = axis.and_then(|a| a.max);

        let primary = match slot {
            AxisSlot::X2 => Some(AxisSlot::X),
            AxisSlot::Y2 => Some(AxisSlot::Y),
            _ => None,
        };
        if let (None, Some(primary)) = (extent, primary) {
            let mirrored = Self::axis_range(frame, options, primary);
            return bounded(mirrored.start, mirrored.end, min, max);
        }

        padded_range(extent, ticks.is_some(), min, max)
    }
}

/// Pad an extent for display. Categorical axes get half a step on each side so
/// the outer labels sit inside the plot. Explicit bounds win over padding.
fn padded_range(
    extent: Option<(f64, f64)>,
    categorical: bool,
    min: Option<f64>,
    max: Option<f64>,
) -> Range<f64> {
    let (low, high) = match extent {
        Some((low, high)) if categorical => (low - 0.5, high + 0.5),
        Some((low, high)) if high > low => {
            let pad = (high - low) * RANGE_PADDING;
            (low - pad, high + pad)
        }
        Some((value, _)) => (value - 1.0, value + 1.0),
        None => (0.0, 1.0),
    };

    bounded(low, high, min, max)
}

/// Apply configured bounds, keeping the range non-empty.
fn bounded(low: f64, high: f64, min: Option<f64>, max: Option<f64>) -> Range<f64> {
    let low = min.unwrap_or(low);
    let high = max.unwrap_or(high);
    if high > low {
        low..high
    } else {
        low..low + 1.0
    }
}
