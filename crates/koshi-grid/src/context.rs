//! Per-call inputs handed to renderers.

use kurbo::{Point, Rect, Size};

use crate::cache::{ImageCache, SpriteCache};
use crate::surface::{DrawSurface, TextMeasure};
use crate::theme::GridTheme;

/// Everything a renderer needs to paint one cell.
///
/// Only `surface` is written to. The caches use interior mutability so a
/// renderer can request an image load through a shared reference.
pub struct RenderContext<'a> {
    pub surface: &'a mut dyn DrawSurface,
    pub theme: &'a GridTheme,
    /// Destination rectangle in surface coordinates.
    pub rect: Rect,
    pub row_index: usize,
    pub column_index: usize,
    pub images: &'a ImageCache,
    pub sprites: &'a SpriteCache,
    /// The pointer is somewhere over this cell.
    pub hovered: bool,
    /// Exact pointer position relative to `rect`'s origin. Only set for the
    /// active cell or renderers that track the position.
    pub hover: Option<Point>,
    pub is_active: bool,
    /// Frame time (Unix millis) for time-based styling.
    pub now_millis: u64,
}

impl RenderContext<'_> {
    /// Hover position translated into surface coordinates.
    pub fn hover_in_surface(&self) -> Option<Point> {
        self.hover.map(|p| Point::new(self.rect.x0 + p.x, self.rect.y0 + p.y))
    }
}

/// Inputs for a sizing pass.
pub struct MeasureContext<'a> {
    pub metrics: &'a dyn TextMeasure,
    pub theme: &'a GridTheme,
    /// Column width available to the cell.
    pub width: f64,
}

/// Inputs for hit-testing and click dispatch.
///
/// `position` is relative to the cell's top-left corner. `metrics` lets
/// renderers rebuild the same text layout they drew.
pub struct ClickContext<'a> {
    pub width: f64,
    pub height: f64,
    pub position: Point,
    pub theme: &'a GridTheme,
    pub metrics: &'a dyn TextMeasure,
}

impl ClickContext<'_> {
    /// The cell rectangle in cell-local coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, Size::new(self.width, self.height))
    }
}
