//! Axis Module
//! Categorical lookup tables, value resolution and tick label generation.

use crate::data::{CellValue, ColumnProperties};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A function which formats a categorical label for display on the axis.
pub type TickFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    X,
    Y,
}

/// Which of the two axes of a dimension a series is drawn against.
///
/// Deserializes from `1`/`2` or `"1"`/`"2"`; only `2` selects the secondary
/// axis, anything else falls back to the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawAxisSide", into = "u8")]
pub enum AxisSide {
    #[default]
    Primary,
    Secondary,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAxisSide {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawAxisSide> for AxisSide {
    fn from(raw: RawAxisSide) -> Self {
        let secondary = match raw {
            RawAxisSide::Number(n) => n == 2.0,
            RawAxisSide::Text(s) => s.trim() == "2",
            RawAxisSide::Other(_) => false,
        };
        if secondary {
            AxisSide::Secondary
        } else {
            AxisSide::Primary
        }
    }
}

impl From<AxisSide> for u8 {
    fn from(side: AxisSide) -> Self {
        match side {
            AxisSide::Primary => 1,
            AxisSide::Secondary => 2,
        }
    }
}

/// One of the four chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSlot {
    X,
    X2,
    Y,
    Y2,
}

impl AxisSlot {
    pub const ALL: [AxisSlot; 4] = [AxisSlot::X, AxisSlot::X2, AxisSlot::Y, AxisSlot::Y2];

    pub fn new(dimension: Dimension, side: AxisSide) -> Self {
        match (dimension, side) {
            (Dimension::X, AxisSide::Primary) => AxisSlot::X,
            (Dimension::X, AxisSide::Secondary) => AxisSlot::X2,
            (Dimension::Y, AxisSide::Primary) => AxisSlot::Y,
            (Dimension::Y, AxisSide::Secondary) => AxisSlot::Y2,
        }
    }

    /// Axis a series built from a column with `properties` uses in `dimension`.
    pub fn for_series(dimension: Dimension, properties: &ColumnProperties) -> Self {
        let side = match dimension {
            Dimension::X => properties.x_axis,
            Dimension::Y => properties.y_axis,
        };
        Self::new(dimension, side)
    }

    pub fn dimension(self) -> Dimension {
        match self {
            AxisSlot::X | AxisSlot::X2 => Dimension::X,
            AxisSlot::Y | AxisSlot::Y2 => Dimension::Y,
        }
    }

    pub fn side(self) -> AxisSide {
        match self {
            AxisSlot::X | AxisSlot::Y => AxisSide::Primary,
            AxisSlot::X2 | AxisSlot::Y2 => AxisSide::Secondary,
        }
    }
}

/// Configuration of one axis.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tick position to label. Present only when the axis carries text values.
    #[serde(alias = "textConversion", skip_serializing_if = "Option::is_none")]
    pub text_conversion: Option<BTreeMap<i64, String>>,
    /// Label template where `{}` is replaced by the raw label.
    #[serde(alias = "tickFormat", skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Takes precedence over `tick_format`.
    #[serde(skip)]
    pub tick_formatter: Option<TickFormatter>,
}

impl fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisSpec")
            .field("title", &self.title)
            .field("text_conversion", &self.text_conversion)
            .field("tick_format", &self.tick_format)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("tick_formatter", &self.tick_formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl AxisSpec {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// A categorical axis placing distinct `labels` at 0, 1, 2, ... in
    /// first-seen order.
    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().with_categories(labels)
    }

    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut conversion = BTreeMap::new();
        let mut seen = HashSet::new();
        for label in labels {
            let label = label.into();
            if seen.insert(label.clone()) {
                conversion.insert(conversion.len() as i64, label);
            }
        }
        self.text_conversion = Some(conversion);
        self
    }

    pub fn with_text_conversion(mut self, conversion: BTreeMap<i64, String>) -> Self {
        self.text_conversion = Some(conversion);
        self
    }

    pub fn with_tick_format(mut self, template: impl Into<String>) -> Self {
        self.tick_format = Some(template.into());
        self
    }

    pub fn with_tick_formatter(
        mut self,
        formatter: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tick_formatter = Some(Arc::new(formatter));
        self
    }

    pub fn is_categorical(&self) -> bool {
        self.text_conversion.is_some()
    }

    /// Raw label at an integral tick position.
    pub fn label_for(&self, position: f64) -> Option<&str> {
        let conversion = self.text_conversion.as_ref()?;
        let rounded = position.round();
        if (position - rounded).abs() > 1e-6 {
            return None;
        }
        conversion.get(&(rounded as i64)).map(String::as_str)
    }

    /// Apply the formatter, or the template, to a raw label.
    pub fn format_label(&self, raw: &str) -> String {
        if let Some(formatter) = &self.tick_formatter {
            formatter(raw)
        } else if let Some(template) = &self.tick_format {
            template.replace("{}", raw)
        } else {
            raw.to_string()
        }
    }
}

/// A categorical tick: position on the axis and its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub position: i64,
    pub label: String,
}

/// Map a raw cell value onto an axis.
///
/// Without a lookup table the value passes through unchanged. With one, the
/// table is searched in ascending tick order for a label equal to the value's
/// text form and the tick position is returned; `None` means no label matched.
pub fn resolve_axis_value(axis: Option<&AxisSpec>, raw: &CellValue) -> Option<CellValue> {
    let Some(conversion) = axis.and_then(|a| a.text_conversion.as_ref()) else {
        return Some(raw.clone());
    };

    let text = raw.to_string();
    conversion
        .iter()
        .find(|(_, label)| **label == text)
        .map(|(&position, _)| CellValue::Number(position as f64))
}

/// Tick labels for a categorical axis, in position order. `None` when the axis
/// has no lookup table and the renderer should place ticks itself.
pub fn build_tick_labels(axis: &AxisSpec) -> Option<Vec<TickLabel>> {
    let conversion = axis.text_conversion.as_ref()?;
    Some(
        conversion
            .iter()
            .map(|(&position, raw)| TickLabel {
                position,
                label: axis.format_label(raw),
            })
            .collect(),
    )
}
