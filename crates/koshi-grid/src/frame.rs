//! The frame driver.
//!
//! [`GridCanvas`] owns everything that outlives a single frame: the theme,
//! both caches, the renderer registry, pointer and selection state, and the
//! edit controller. Cells themselves are not owned; each frame the caller
//! hands in freshly built [`PlacedCell`]s and a surface to paint on.
//!
//! Per cell, a frame does:
//!
//! 1. merge the cell's theme override onto the grid theme
//! 2. paint background, update highlight and grid lines
//! 3. resolve the renderer (unknown kinds get an error glyph)
//! 4. decide whether the renderer sees the hover position
//! 5. draw, clipped to the cell rectangle
//! 6. outline the active cell

use std::sync::Arc;

use koshi_types::{Cell, CellKind, CellLocation, CursorHint, EditSessionId};
use kurbo::{Point, Rect, Size};
use tracing::{debug, error};

use crate::cache::{ImageCache, SpriteCache};
use crate::context::{ClickContext, MeasureContext, RenderContext};
use crate::editor::{EditController, EditOutcome, EditSession};
use crate::error::GridError;
use crate::interaction::{self, ClickOutcome};
use crate::registry::{RendererRegistry, builtin_registry};
use crate::renderer::{CellRenderer, paint_error_glyph};
use crate::surface::{DrawSurface, TextMeasure};
use crate::theme::GridTheme;

/// A cell positioned for this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCell {
    pub location: CellLocation,
    /// Destination rectangle in surface coordinates.
    pub rect: Rect,
    pub cell: Cell,
}

impl PlacedCell {
    pub fn new(location: CellLocation, rect: Rect, cell: Cell) -> Self {
        Self { location, rect, cell }
    }
}

/// Where the pointer is, relative to the cell under it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverTarget {
    pub location: CellLocation,
    pub position: Point,
    pub kind: CellKind,
}

/// Counters from one painted frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cells: usize,
    /// Cells that couldn't be dispatched and got the error glyph.
    pub errors: usize,
    /// Cells painted with the recently-updated highlight.
    pub highlighted: usize,
    /// Image loads finished since the previous frame.
    pub images_changed: bool,
}

/// Frame driver for one grid.
#[derive(Debug)]
pub struct GridCanvas {
    theme: GridTheme,
    images: ImageCache,
    sprites: SpriteCache,
    registry: Arc<RendererRegistry>,
    hover: Option<HoverTarget>,
    active: Option<CellLocation>,
    edits: EditController,
}

impl Default for GridCanvas {
    fn default() -> Self {
        Self::new(GridTheme::default())
    }
}

impl GridCanvas {
    pub fn new(theme: GridTheme) -> Self {
        Self {
            theme,
            images: ImageCache::new(),
            sprites: SpriteCache::builtin(),
            registry: builtin_registry(),
            hover: None,
            active: None,
            edits: EditController::new(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<RendererRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_images(mut self, images: ImageCache) -> Self {
        self.images = images;
        self
    }

    pub fn with_sprites(mut self, sprites: SpriteCache) -> Self {
        self.sprites = sprites;
        self
    }

    pub fn theme(&self) -> &GridTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: GridTheme) {
        self.theme = theme;
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    pub fn active(&self) -> Option<CellLocation> {
        self.active
    }

    pub fn set_active(&mut self, location: Option<CellLocation>) {
        self.active = location;
    }

    pub fn edits(&self) -> &EditController {
        &self.edits
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Paint one frame at the current wall-clock time.
    pub fn paint_frame(&self, surface: &mut dyn DrawSurface, cells: &[PlacedCell]) -> FrameStats {
        self.paint_frame_at(surface, cells, koshi_types::now_millis())
    }

    /// Paint one frame as of `now_millis`.
    pub fn paint_frame_at(
        &self,
        surface: &mut dyn DrawSurface,
        cells: &[PlacedCell],
        now_millis: u64,
    ) -> FrameStats {
        let mut stats = FrameStats {
            images_changed: self.images.drain_completions(),
            ..Default::default()
        };

        for placed in cells {
            let theme = self
                .theme
                .with_override(placed.cell.common().custom_theme.as_ref());
            let is_active = self.active == Some(placed.location);
            let resolved = self.registry.resolve(placed.cell.kind());

            let (wants_hover, wants_position) = resolved
                .as_ref()
                .map(|r| (r.needs_hover, r.needs_hover_position))
                .unwrap_or((false, false));
            let over = self
                .hover
                .filter(|h| h.location == placed.location && (is_active || wants_hover));
            let hovered = over.is_some();
            let hover = over
                .filter(|_| is_active || wants_position)
                .map(|h| h.position);

            let highlighted = is_recently_updated(&placed.cell, &theme, now_millis);
            paint_chrome(surface, &theme, placed, is_active, hovered, highlighted);
            if highlighted {
                stats.highlighted += 1;
            }

            let mut ctx = RenderContext {
                surface: &mut *surface,
                theme: &theme,
                rect: placed.rect,
                row_index: placed.location.row,
                column_index: placed.location.column,
                images: &self.images,
                sprites: &self.sprites,
                hovered,
                hover,
                is_active,
                now_millis,
            };
            ctx.surface.save();
            ctx.surface.clip(placed.rect);
            match resolved {
                Ok(renderer) => renderer.paint(&placed.cell, &mut ctx),
                Err(err) => {
                    error!(location = %placed.location, error = %err, "cannot draw cell");
                    paint_error_glyph(&mut ctx);
                    stats.errors += 1;
                }
            }
            ctx.surface.restore();

            if is_active {
                surface.stroke_rect(placed.rect.inset(-1.0), theme.cell_active_border, 2.0);
            }
            stats.cells += 1;
        }
        stats
    }

    /// Take queued image URLs for a loader.
    pub fn take_image_requests(&self) -> Vec<String> {
        self.images.take_requests()
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Track the pointer and return the cells that need repainting.
    ///
    /// Entering or leaving a cell repaints it if its renderer needs hover or
    /// it is the active cell. Moving within a cell repaints it if its
    /// renderer tracks the exact position or it is the active cell, the two
    /// cases where the renderer is handed that position.
    pub fn pointer_move(&mut self, target: Option<HoverTarget>) -> Vec<CellLocation> {
        let previous = std::mem::replace(&mut self.hover, target);
        let mut dirty = Vec::new();
        match (previous, target) {
            (Some(prev), Some(next)) if prev.location == next.location => {
                if prev.position != next.position
                    && (self.flags(next.kind).1 || self.active == Some(next.location))
                {
                    dirty.push(next.location);
                }
            }
            (prev, next) => {
                for h in [prev, next].into_iter().flatten() {
                    if self.flags(h.kind).0 || self.active == Some(h.location) {
                        dirty.push(h.location);
                    }
                }
            }
        }
        dirty
    }

    /// (needs_hover, needs_hover_position) for a kind.
    fn flags(&self, kind: CellKind) -> (bool, bool) {
        self.registry
            .resolve(kind)
            .map(|r| (r.needs_hover, r.needs_hover_position))
            .unwrap_or((false, false))
    }

    /// Cursor for the pointer at `position` within `cell`.
    pub fn cursor_at(
        &self,
        metrics: &dyn TextMeasure,
        cell: &Cell,
        size: Size,
        position: Point,
    ) -> CursorHint {
        let Ok(renderer) = self.registry.resolve(cell.kind()) else {
            return CursorHint::Default;
        };
        let theme = self.theme.with_override(cell.common().custom_theme.as_ref());
        let ctx = click_context(metrics, &theme, size, position);
        interaction::cursor_at(renderer, cell, &ctx)
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Height of a row: the tallest measured cell, never below the theme's
    /// row height. `cells` pairs each cell with its column width.
    pub fn measure_row(&self, metrics: &dyn TextMeasure, cells: &[(f64, &Cell)]) -> f64 {
        cells
            .iter()
            .filter_map(|(width, cell)| self.measure_cell(metrics, cell, *width))
            .fold(self.theme.row_height, f64::max)
    }

    /// Minimum height of one cell, or `None` for the default row height.
    pub fn measure_cell(&self, metrics: &dyn TextMeasure, cell: &Cell, width: f64) -> Option<f64> {
        let renderer = match self.registry.resolve(cell.kind()) {
            Ok(r) => r,
            Err(err) => {
                error!(error = %err, "cannot measure cell");
                return None;
            }
        };
        let theme = self.theme.with_override(cell.common().custom_theme.as_ref());
        let ctx = MeasureContext {
            metrics,
            theme: &theme,
            width: width.max(0.0),
        };
        renderer.measure_height(cell, &ctx)
    }

    // ========================================================================
    // Clicks and editing
    // ========================================================================

    /// Handle a click at `position` (cell-relative) and make the cell active.
    ///
    /// Returns the started session when the click opened an editor.
    pub fn click(
        &mut self,
        metrics: &dyn TextMeasure,
        location: CellLocation,
        cell: &Cell,
        size: Size,
        position: Point,
    ) -> Result<(ClickOutcome, Option<EditSession>), GridError> {
        self.active = Some(location);
        let renderer = self.renderer_for(cell)?;
        let theme = self.theme.with_override(cell.common().custom_theme.as_ref());
        let ctx = click_context(metrics, &theme, size, position);
        let outcome = interaction::dispatch_click(&renderer, cell, &ctx);
        debug!(%location, ?outcome, "cell clicked");

        if outcome == ClickOutcome::StartEdit && self.edits.is_idle() {
            let session = self.edits.begin(&self.registry, location, cell)?;
            return Ok((outcome, Some(session)));
        }
        Ok((outcome, None))
    }

    pub fn begin_edit(&mut self, location: CellLocation, cell: &Cell) -> Result<EditSession, GridError> {
        self.active = Some(location);
        self.edits.begin(&self.registry, location, cell)
    }

    pub fn commit_edit(&mut self, id: EditSessionId, value: Cell) -> Result<(), GridError> {
        self.edits.commit(id, value)
    }

    pub fn cancel_edit(&mut self, id: EditSessionId) -> Result<(), GridError> {
        self.edits.cancel(id)
    }

    pub fn finish_edit(&mut self, id: EditSessionId) -> Result<EditOutcome, GridError> {
        self.edits.finish(id)
    }

    // ========================================================================
    // Accessibility and paste
    // ========================================================================

    /// Screen-reader text for a cell, falling back to its display data.
    pub fn accessibility_text(&self, cell: &Cell) -> String {
        self.registry
            .resolve(cell.kind())
            .ok()
            .and_then(|r| r.accessibility_string(cell))
            .unwrap_or_else(|| cell.display_text())
    }

    /// New value for a paste into `cell`. `None` leaves the cell unchanged.
    pub fn paste(&self, text: &str, cell: &Cell) -> Option<Cell> {
        let renderer = self.registry.resolve(cell.kind()).ok()?;
        let pasted = renderer.paste(text, cell);
        if pasted.is_none() {
            debug!(kind = %cell.kind(), "paste rejected");
        }
        pasted
    }

    fn renderer_for(&self, cell: &Cell) -> Result<CellRenderer, GridError> {
        self.registry.resolve(cell.kind()).copied()
    }
}

fn click_context<'a>(
    metrics: &'a dyn TextMeasure,
    theme: &'a GridTheme,
    size: Size,
    position: Point,
) -> ClickContext<'a> {
    ClickContext {
        width: size.width,
        height: size.height,
        position,
        theme,
        metrics,
    }
}

fn is_recently_updated(cell: &Cell, theme: &GridTheme, now_millis: u64) -> bool {
    cell.common()
        .last_updated
        .is_some_and(|t| t <= now_millis && now_millis - t < theme.update_highlight_ms)
}

/// Background, highlight and grid lines under a cell.
fn paint_chrome(
    surface: &mut dyn DrawSurface,
    theme: &GridTheme,
    placed: &PlacedCell,
    is_active: bool,
    hovered: bool,
    highlighted: bool,
) {
    let rect = placed.rect;
    let bg = if is_active {
        theme.cell_bg_active
    } else if hovered {
        theme.cell_bg_hovered
    } else if placed.location.row % 2 == 1 {
        theme.cell_bg_alt
    } else {
        theme.cell_bg
    };
    surface.fill_rect(rect, bg);
    if highlighted {
        surface.fill_rect(rect, theme.cell_updated_bg);
    }
    surface.stroke_line(
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        theme.cell_line_color,
        1.0,
    );
    surface.stroke_line(
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        theme.cell_line_color,
        1.0,
    );
}
