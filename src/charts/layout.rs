//! Chart Layout Module
//! Splits the output area into title band, axis title bands and the plot area.

use crate::charts::axis::AxisSlot;
use crate::charts::ChartOptions;

const LINE_HEIGHT: f32 = 1.2;
const TITLE_PADDING_BOTTOM: f32 = 5.0;
const AXIS_TITLE_PADDING: f32 = 3.0;
const VERTICAL_TITLE_WIDTH: f32 = 15.0;
const INNER_GUTTER: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Pixel bands of a chart. Bands for absent titles are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub title_band: f32,
    /// x2 axis title.
    pub top_band: f32,
    /// x axis title.
    pub bottom_band: f32,
    /// y axis title.
    pub left_gutter: f32,
    /// y2 axis title.
    pub right_gutter: f32,
    pub plot: Rect,
}

impl ChartLayout {
    pub fn compute(options: &ChartOptions, width: f32, height: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);

        let title_band = if options.title.is_some() {
            options.title_font_size() * LINE_HEIGHT + TITLE_PADDING_BOTTOM
        } else {
            0.0
        };

        let horizontal_band = options.font_size() * LINE_HEIGHT + 2.0 * AXIS_TITLE_PADDING;
        let has_title = |slot| options.axis_title(slot).is_some();
        let band_if = |present: bool, size: f32| if present { size } else { 0.0 };

        let bottom_band = band_if(has_title(AxisSlot::X), horizontal_band);
        let top_band = band_if(has_title(AxisSlot::X2), horizontal_band);
        let left_gutter = band_if(
            has_title(AxisSlot::Y),
            AXIS_TITLE_PADDING + VERTICAL_TITLE_WIDTH + INNER_GUTTER,
        );
        let right_gutter = band_if(
            has_title(AxisSlot::Y2),
            INNER_GUTTER + VERTICAL_TITLE_WIDTH + AXIS_TITLE_PADDING,
        );

        let plot = Rect {
            x: left_gutter.min(width),
            y: (title_band + top_band).min(height),
            width: (width - left_gutter - right_gutter).max(0.0),
            height: (height - title_band - top_band - bottom_band).max(0.0),
        };

        Self {
            width,
            height,
            title_band,
            top_band,
            bottom_band,
            left_gutter,
            right_gutter,
            plot,
        }
    }
}
