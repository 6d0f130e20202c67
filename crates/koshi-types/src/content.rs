//! Auxiliary payload types shared by the cell variants.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Horizontal alignment of a cell's content within its rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ContentAlign {
    #[default]
    Left,
    Right,
    Center,
}

impl ContentAlign {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }
}

/// Pointer cursor the grid should show while hovering a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CursorHint {
    #[default]
    Default,
    Pointer,
    Text,
    NotAllowed,
}

/// Where an editor is mounted relative to the cell's rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EditorPosition {
    Above,
    Below,
    /// Covers the cell rectangle exactly.
    #[default]
    Overlap,
}

/// A reference-stable custom editor component.
///
/// The grid never instantiates the component itself; the name is the key the
/// surrounding UI uses to look up the mounted implementation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomEditor {
    pub name: String,
}

impl CustomEditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Gauge style for a number cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum NumberDisplayType {
    Ring,
    Bar,
}

/// "Show as" visualization of a number cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberShowAs {
    #[serde(rename = "type")]
    pub display_type: NumberDisplayType,
    /// Gauge fill color (`#rrggbb`).
    pub color: String,
    pub max_value: f64,
    /// Overlay the formatted value as text next to the gauge.
    #[serde(default)]
    pub show_value: bool,
}

impl NumberShowAs {
    /// Fill ratio of `value` against `max_value`, clamped to `0.0..=1.0`.
    pub fn ratio(&self, value: f64) -> f64 {
        if !(self.max_value > 0.0) || !value.is_finite() {
            return 0.0;
        }
        (value / self.max_value).clamp(0.0, 1.0)
    }
}

/// Chart style for a chart cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

/// One selectable option of a select cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl SelectChoice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            bg_color: None,
            text_color: None,
        }
    }

    /// Check whether a selected value refers to this choice.
    ///
    /// Values are matched against the choice id first, then its name.
    pub fn matches(&self, value: &str) -> bool {
        self.id.as_deref() == Some(value) || self.name == value
    }
}

/// One image attached to an image cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageData {
    pub id: String,
    pub url: String,
}

impl ImageData {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}
