//! Chart Options Module
//! Rendering options, loadable from a JSON configuration file.

use crate::charts::axis::{AxisSlot, AxisSpec};
use crate::data::TableSource;
use crate::error::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Body font size in pixels when none is configured.
pub const DEFAULT_FONT_SIZE: f32 = 11.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Draw column 0 on the y axis and the data columns on the x axis.
    pub inverted: bool,
    pub title: Option<String>,
    /// Output size in pixels.
    pub width: u32,
    pub height: u32,
    #[serde(alias = "fontSize")]
    pub font_size: Option<f32>,
    #[serde(alias = "titleFontSize")]
    pub title_font_size: Option<f32>,
    /// Title color as `#rrggbb`.
    #[serde(alias = "titleColor")]
    pub title_color: Option<String>,
    pub xaxis: Option<AxisSpec>,
    pub x2axis: Option<AxisSpec>,
    pub yaxis: Option<AxisSpec>,
    pub y2axis: Option<AxisSpec>,
    /// Connect points with lines.
    pub lines: bool,
    /// Draw a marker at every point.
    pub points: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            inverted: false,
            title: None,
            width: 800,
            height: 500,
            font_size: None,
            title_font_size: None,
            title_color: None,
            xaxis: None,
            x2axis: None,
            yaxis: None,
            y2axis: None,
            lines: true,
            points: true,
        }
    }
}

impl ChartOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        info!("loaded chart options from {}", path.display());
        Ok(options)
    }

    pub fn axis(&self, slot: AxisSlot) -> Option<&AxisSpec> {
        match slot {
            AxisSlot::X => self.xaxis.as_ref(),
            AxisSlot::X2 => self.x2axis.as_ref(),
            AxisSlot::Y => self.yaxis.as_ref(),
            AxisSlot::Y2 => self.y2axis.as_ref(),
        }
    }

    pub fn axis_mut(&mut self, slot: AxisSlot) -> &mut Option<AxisSpec> {
        match slot {
            AxisSlot::X => &mut self.xaxis,
            AxisSlot::X2 => &mut self.x2axis,
            AxisSlot::Y => &mut self.yaxis,
            AxisSlot::Y2 => &mut self.y2axis,
        }
    }

    pub fn axis_title(&self, slot: AxisSlot) -> Option<&str> {
        self.axis(slot)?.title.as_deref()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size.unwrap_or_else(|| self.font_size())
    }

    pub fn title_rgb(&self) -> Option<[u8; 3]> {
        self.title_color.as_deref().and_then(parse_hex_color)
    }

    /// Make the primary axis that carries column 0 categorical, with one tick
    /// per distinct value of that column. Keeps any other settings of the axis.
    pub fn categorize_axis_column<T: TableSource + ?Sized>(&mut self, table: &T) {
        let slot = if self.inverted { AxisSlot::Y } else { AxisSlot::X };
        let labels: Vec<String> = (0..table.row_count())
            .filter_map(|row| table.value(row, 0).map(|v| v.to_string()))
            .collect();

        let axis = self.axis_mut(slot).take().unwrap_or_default();
        let axis = axis.with_categories(labels);
        debug!(
            "axis {:?} made categorical with {} ticks",
            slot,
            axis.text_conversion.as_ref().map_or(0, |c| c.len())
        );
        *self.axis_mut(slot) = Some(axis);
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
