//! Per-cell partial theme.
//!
//! Cells may override a subset of the grid theme (a highlighted row, a
//! warning cell). Every field is optional; `None` keeps the grid's value.
//! Colors are `#rrggbb` / `#rgb` strings, resolved by the grid when the
//! override is applied.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverride {
    pub cell_bg: Option<String>,
    pub cell_text_color: Option<String>,
    pub cell_text_color_secondary: Option<String>,
    pub cell_line_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub cell_horizontal_padding: Option<f64>,
    pub cell_vertical_padding: Option<f64>,
    pub icon_size: Option<f64>,
    pub chip_bg: Option<String>,
    pub chip_text_color: Option<String>,
}

impl ThemeOverride {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ThemeOverride::default().is_empty());
    }

    #[test]
    fn test_partial_json() {
        let o: ThemeOverride = serde_json::from_str(r##"{"cellBg":"#ff0000","fontSize":15}"##).unwrap();
        assert_eq!(o.cell_bg.as_deref(), Some("#ff0000"));
        assert_eq!(o.font_size, Some(15.0));
        assert!(o.cell_text_color.is_none());
        assert!(!o.is_empty());
    }
}
