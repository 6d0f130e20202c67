//! The cell tagged union.
//!
//! ## Design: data vs display_data
//!
//! Every non-loading variant carries both the raw `data` (whatever the kind
//! needs: a string, a list of links, an optional number) and a `display_data`
//! that upstream formatting has already turned into renderer-ready text.
//! Renderers never format values. Number precision, date formats and
//! currency symbols are decided before the cell reaches the grid.
//!
//! The one exception is `Select`: chip labels come from `choices`, so a
//! select cell renders correctly without a pre-joined `display_data`.
//!
//! ## Wire shape
//!
//! Cells serialize internally tagged on `"type"` with camelCase fields, the
//! same JSON shape the record services hand to the grid:
//!
//! ```json
//! { "type": "Number", "data": 42, "displayData": "42.00", "readonly": true }
//! ```

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::callback::CellCallback;
use crate::content::{
    ChartType, ContentAlign, CursorHint, CustomEditor, EditorPosition, ImageData, NumberShowAs,
    SelectChoice,
};
use crate::error::CellDataError;
use crate::theme::ThemeOverride;

/// The tag discriminating which variant a cell is.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    EnumCount,
    Display,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CellKind {
    Text,
    Link,
    Number,
    Select,
    Image,
    Chart,
    Rating,
    Boolean,
    Loading,
}

impl CellKind {
    /// Kinds that can open an editor. `Loading` is the only one that can't.
    pub fn is_editable(&self) -> bool {
        !matches!(self, CellKind::Loading)
    }
}

/// Attributes shared by every cell kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellCommon {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<CursorHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_align: Option<ContentAlign>,
    /// When the underlying value last changed (Unix millis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<ThemeOverride>,
}

/// Attributes of kinds that can be edited in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditableAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_editor: Option<CustomEditor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_position: Option<EditorPosition>,
    /// A single click opens the editor instead of only selecting the cell.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub edit_when_clicked: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: String,
    pub display_data: String,
    /// Wrap onto multiple lines instead of truncating with an ellipsis.
    #[serde(default)]
    pub is_wrap: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: Vec<String>,
    pub display_data: String,
    /// Invoked with the link value whose icon was clicked.
    #[serde(skip)]
    pub on_click: Option<CellCallback<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: Option<f64>,
    pub display_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as: Option<NumberShowAs>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    /// Selected values (choice ids or names).
    pub data: Vec<String>,
    #[serde(default)]
    pub choices: Vec<SelectChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_data: Option<String>,
    #[serde(default)]
    pub is_multiple: bool,
}

impl SelectCell {
    /// Chip labels for the selected values, resolved through `choices`.
    ///
    /// Values with no matching choice are shown verbatim.
    pub fn labels(&self) -> Vec<&str> {
        self.data
            .iter()
            .map(|value| {
                self.choice_for(value)
                    .map(|c| c.name.as_str())
                    .unwrap_or(value.as_str())
            })
            .collect()
    }

    /// The choice a selected value refers to, if any.
    pub fn choice_for(&self, value: &str) -> Option<&SelectChoice> {
        self.choices
            .iter()
            .find(|c| c.id.as_deref() == Some(value))
            .or_else(|| self.choices.iter().find(|c| c.name == value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: Vec<ImageData>,
    #[serde(default)]
    pub display_data: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: Vec<f64>,
    pub display_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: f64,
    #[serde(default)]
    pub display_data: String,
    /// Sprite identifier of the rating glyph.
    pub icon: String,
    pub color: String,
    pub max: u32,
    /// Invoked with the clicked icon's value (1-based).
    #[serde(skip)]
    pub on_rate: Option<CellCallback<u32>>,
}

/// Largest rating scale a cell may declare.
pub const MAX_RATING_SCALE: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanCell {
    #[serde(flatten)]
    pub common: CellCommon,
    #[serde(flatten)]
    pub editable: EditableAttrs,
    pub data: bool,
    #[serde(default)]
    pub display_data: String,
    /// Invoked with the new value when the checkbox glyph is clicked.
    #[serde(skip)]
    pub on_toggle: Option<CellCallback<bool>>,
}

/// Placeholder for a row whose data hasn't arrived yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingCell {
    #[serde(flatten)]
    pub common: CellCommon,
}

/// One grid cell.
///
/// Built fresh from record/field data on every render pass and never mutated
/// while a draw, measure or hit-test call is looking at it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Cell {
    Text(TextCell),
    Link(LinkCell),
    Number(NumberCell),
    Select(SelectCell),
    Image(ImageCell),
    Chart(ChartCell),
    Rating(RatingCell),
    Boolean(BooleanCell),
    Loading(LoadingCell),
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl From<$ty> for Cell {
                fn from(cell: $ty) -> Self {
                    Cell::$variant(cell)
                }
            }
        )*
    };
}

impl_from_variant!(
    Text(TextCell),
    Link(LinkCell),
    Number(NumberCell),
    Select(SelectCell),
    Image(ImageCell),
    Chart(ChartCell),
    Rating(RatingCell),
    Boolean(BooleanCell),
    Loading(LoadingCell),
);

impl Cell {
    /// A pending-state placeholder.
    pub fn loading() -> Self {
        Cell::Loading(LoadingCell::default())
    }

    /// A plain text cell whose display text equals its data.
    pub fn text(data: impl Into<String>) -> Self {
        let data = data.into();
        Cell::Text(TextCell {
            display_data: data.clone(),
            data,
            ..Default::default()
        })
    }

    /// A number cell with upstream-formatted display text.
    pub fn number(data: Option<f64>, display_data: impl Into<String>) -> Self {
        Cell::Number(NumberCell {
            data,
            display_data: display_data.into(),
            ..Default::default()
        })
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Text(_) => CellKind::Text,
            Cell::Link(_) => CellKind::Link,
            Cell::Number(_) => CellKind::Number,
            Cell::Select(_) => CellKind::Select,
            Cell::Image(_) => CellKind::Image,
            Cell::Chart(_) => CellKind::Chart,
            Cell::Rating(_) => CellKind::Rating,
            Cell::Boolean(_) => CellKind::Boolean,
            Cell::Loading(_) => CellKind::Loading,
        }
    }

    pub fn common(&self) -> &CellCommon {
        match self {
            Cell::Text(c) => &c.common,
            Cell::Link(c) => &c.common,
            Cell::Number(c) => &c.common,
            Cell::Select(c) => &c.common,
            Cell::Image(c) => &c.common,
            Cell::Chart(c) => &c.common,
            Cell::Rating(c) => &c.common,
            Cell::Boolean(c) => &c.common,
            Cell::Loading(c) => &c.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CellCommon {
        match self {
            Cell::Text(c) => &mut c.common,
            Cell::Link(c) => &mut c.common,
            Cell::Number(c) => &mut c.common,
            Cell::Select(c) => &mut c.common,
            Cell::Image(c) => &mut c.common,
            Cell::Chart(c) => &mut c.common,
            Cell::Rating(c) => &mut c.common,
            Cell::Boolean(c) => &mut c.common,
            Cell::Loading(c) => &mut c.common,
        }
    }

    /// Editing attributes, or `None` for `Loading`.
    pub fn editable(&self) -> Option<&EditableAttrs> {
        match self {
            Cell::Text(c) => Some(&c.editable),
            Cell::Link(c) => Some(&c.editable),
            Cell::Number(c) => Some(&c.editable),
            Cell::Select(c) => Some(&c.editable),
            Cell::Image(c) => Some(&c.editable),
            Cell::Chart(c) => Some(&c.editable),
            Cell::Rating(c) => Some(&c.editable),
            Cell::Boolean(c) => Some(&c.editable),
            Cell::Loading(_) => None,
        }
    }

    pub fn is_readonly(&self) -> bool {
        self.common().readonly
    }

    /// Check if an edit session may be opened on this cell.
    pub fn is_editable(&self) -> bool {
        self.kind().is_editable() && !self.is_readonly()
    }

    /// Mark the cell read-only (builder style).
    pub fn with_readonly(mut self) -> Self {
        self.common_mut().readonly = true;
        self
    }

    pub fn with_align(mut self, align: ContentAlign) -> Self {
        self.common_mut().content_align = Some(align);
        self
    }

    pub fn with_theme(mut self, theme: ThemeOverride) -> Self {
        self.common_mut().custom_theme = Some(theme);
        self
    }

    pub fn with_last_updated(mut self, millis: u64) -> Self {
        self.common_mut().last_updated = Some(millis);
        self
    }

    /// Plain-text rendition of `display_data`.
    ///
    /// List-valued display data is joined with `", "`. Select cells without
    /// display data fall back to their chip labels.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Text(c) => c.display_data.clone(),
            Cell::Link(c) => c.display_data.clone(),
            Cell::Number(c) => c.display_data.clone(),
            Cell::Select(c) => match &c.display_data {
                Some(d) => d.clone(),
                None => c.labels().join(", "),
            },
            Cell::Image(c) => c.display_data.join(", "),
            Cell::Chart(c) => c.display_data.join(", "),
            Cell::Rating(c) => c.display_data.clone(),
            Cell::Boolean(c) => c.display_data.clone(),
            Cell::Loading(_) => String::new(),
        }
    }

    /// Check that the data is well-formed for the cell's kind.
    pub fn validate(&self) -> Result<(), CellDataError> {
        match self {
            Cell::Number(c) => {
                if let Some(v) = c.data
                    && !v.is_finite()
                {
                    return Err(CellDataError::NonFiniteNumber(v));
                }
                if let Some(show_as) = &c.show_as
                    && !(show_as.max_value > 0.0 && show_as.max_value.is_finite())
                {
                    return Err(CellDataError::InvalidGaugeMax(show_as.max_value));
                }
                Ok(())
            }
            Cell::Chart(c) => {
                if c.data.len() != c.display_data.len() {
                    return Err(CellDataError::ChartSeriesMismatch {
                        values: c.data.len(),
                        labels: c.display_data.len(),
                    });
                }
                match c.data.iter().position(|v| !v.is_finite()) {
                    Some(index) => Err(CellDataError::NonFiniteChartPoint { index }),
                    None => Ok(()),
                }
            }
            Cell::Rating(c) => {
                if c.max == 0 {
                    return Err(CellDataError::ZeroRatingScale);
                }
                if c.max > MAX_RATING_SCALE {
                    return Err(CellDataError::RatingScaleTooLarge {
                        max: c.max,
                        limit: MAX_RATING_SCALE,
                    });
                }
                if !c.data.is_finite() || c.data < 0.0 {
                    return Err(CellDataError::InvalidRating(c.data));
                }
                Ok(())
            }
            Cell::Image(c) => match c.data.iter().find(|img| img.url.trim().is_empty()) {
                Some(img) => Err(CellDataError::EmptyImageUrl { id: img.id.clone() }),
                None => Ok(()),
            },
            Cell::Text(_) | Cell::Link(_) | Cell::Select(_) | Cell::Boolean(_) | Cell::Loading(_) => {
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
