//! Grid theme.
//!
//! [`GridTheme`] holds every color, font and spacing constant the renderers
//! read. It is read-only input to a frame; per-cell tweaks arrive as a
//! [`ThemeOverride`] on the cell and are merged with
//! [`GridTheme::with_override`] right before that cell is drawn.
//!
//! Users can restyle the grid with a Rhai script, see [`loader`].

pub mod loader;

use std::borrow::Cow;

use koshi_types::ThemeOverride;

use crate::color::{Color, parse_hex_or, rgb8, with_alpha};
use crate::surface::FontSpec;

/// Colors, fonts and spacing for the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridTheme {
    // ═══════════════════════════════════════════════════════════════════════
    // Typography
    // ═══════════════════════════════════════════════════════════════════════
    pub font_family: String,
    pub font_size: f64,
    /// Height of one text line box (pixels).
    pub line_height: f64,

    // ═══════════════════════════════════════════════════════════════════════
    // Cell surface
    // ═══════════════════════════════════════════════════════════════════════
    pub cell_bg: Color,
    /// Background of odd rows (zebra striping).
    pub cell_bg_alt: Color,
    pub cell_bg_hovered: Color,
    pub cell_bg_active: Color,
    pub cell_line_color: Color,
    pub cell_active_border: Color,
    pub cell_text_color: Color,
    pub cell_text_color_secondary: Color,
    /// Background flash for recently updated cells.
    pub cell_updated_bg: Color,

    // ═══════════════════════════════════════════════════════════════════════
    // Semantic colors
    // ═══════════════════════════════════════════════════════════════════════
    pub link_color: Color,
    pub error_color: Color,
    pub placeholder_color: Color,
    pub accent: Color,

    // Select chips
    pub chip_bg: Color,
    pub chip_text_color: Color,
    pub chip_height: f64,
    pub chip_gap: f64,
    pub chip_padding: f64,
    pub chip_radius: f64,

    // Gauges and charts
    pub gauge_track_color: Color,
    pub gauge_bar_height: f64,
    pub ring_stroke_width: f64,
    pub chart_color: Color,

    // ═══════════════════════════════════════════════════════════════════════
    // Spacing
    // ═══════════════════════════════════════════════════════════════════════
    pub cell_horizontal_padding: f64,
    pub cell_vertical_padding: f64,
    pub icon_size: f64,
    pub icon_gap: f64,
    pub checkbox_size: f64,
    /// Default row height when a renderer has no sizing opinion.
    pub row_height: f64,
    /// Height of an image cell, with or without images.
    pub image_cell_height: f64,

    /// How long (ms) a cell keeps `cell_updated_bg` after `last_updated`.
    pub update_highlight_ms: u64,
}

impl Default for GridTheme {
    fn default() -> Self {
        // Tokyo Night inspired palette
        Self {
            font_family: "Inter".to_string(),
            font_size: 13.0,
            line_height: 18.0,

            cell_bg: rgb8(0x1a, 0x1b, 0x26),
            cell_bg_alt: rgb8(0x1f, 0x20, 0x2c),
            cell_bg_hovered: rgb8(0x24, 0x26, 0x35),
            cell_bg_active: rgb8(0x29, 0x2e, 0x42),
            cell_line_color: rgb8(0x2f, 0x33, 0x4d),
            cell_active_border: rgb8(0x7a, 0xa2, 0xf7),
            cell_text_color: rgb8(0xc0, 0xca, 0xf5),
            cell_text_color_secondary: rgb8(0x56, 0x5f, 0x89),
            cell_updated_bg: with_alpha(rgb8(0xe0, 0xaf, 0x68), 0.25),

            link_color: rgb8(0x7d, 0xcf, 0xff),
            error_color: rgb8(0xf7, 0x76, 0x8e),
            placeholder_color: rgb8(0x41, 0x48, 0x68),
            accent: rgb8(0x7a, 0xa2, 0xf7),

            chip_bg: rgb8(0x3b, 0x42, 0x61),
            chip_text_color: rgb8(0xc0, 0xca, 0xf5),
            chip_height: 20.0,
            chip_gap: 4.0,
            chip_padding: 6.0,
            chip_radius: 4.0,

            gauge_track_color: rgb8(0x2f, 0x33, 0x4d),
            gauge_bar_height: 6.0,
            ring_stroke_width: 3.0,
            chart_color: rgb8(0x9e, 0xce, 0x6a),

            cell_horizontal_padding: 8.0,
            cell_vertical_padding: 6.0,
            icon_size: 16.0,
            icon_gap: 4.0,
            checkbox_size: 16.0,
            row_height: 32.0,
            image_cell_height: 64.0,

            update_highlight_ms: 1_500,
        }
    }
}

impl GridTheme {
    /// The body text font.
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), self.font_size)
    }

    /// Font for chip labels (one step smaller than body text).
    pub fn chip_font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), (self.font_size - 1.0).max(1.0))
    }

    /// Merge a cell's partial theme over this one.
    ///
    /// Borrows when there's nothing to merge. Unparseable colors keep the
    /// grid's value.
    pub fn with_override<'a>(&'a self, o: Option<&ThemeOverride>) -> Cow<'a, GridTheme> {
        let Some(o) = o.filter(|o| !o.is_empty()) else {
            return Cow::Borrowed(self);
        };
        let mut t = self.clone();
        t.cell_bg = parse_hex_or(o.cell_bg.as_deref(), t.cell_bg);
        t.cell_bg_alt = parse_hex_or(o.cell_bg.as_deref(), t.cell_bg_alt);
        t.cell_text_color = parse_hex_or(o.cell_text_color.as_deref(), t.cell_text_color);
        t.cell_text_color_secondary = parse_hex_or(
            o.cell_text_color_secondary.as_deref(),
            t.cell_text_color_secondary,
        );
        t.cell_line_color = parse_hex_or(o.cell_line_color.as_deref(), t.cell_line_color);
        t.chip_bg = parse_hex_or(o.chip_bg.as_deref(), t.chip_bg);
        t.chip_text_color = parse_hex_or(o.chip_text_color.as_deref(), t.chip_text_color);
        if let Some(family) = &o.font_family {
            t.font_family = family.clone();
        }
        if let Some(size) = o.font_size.filter(|s| *s > 0.0) {
            // Keep the line box proportional to the font.
            t.line_height *= size / t.font_size;
            t.font_size = size;
        }
        if let Some(p) = o.cell_horizontal_padding.filter(|p| *p >= 0.0) {
            t.cell_horizontal_padding = p;
        }
        if let Some(p) = o.cell_vertical_padding.filter(|p| *p >= 0.0) {
            t.cell_vertical_padding = p;
        }
        if let Some(s) = o.icon_size.filter(|s| *s > 0.0) {
            t.icon_size = s;
        }
        Cow::Owned(t)
    }
}
