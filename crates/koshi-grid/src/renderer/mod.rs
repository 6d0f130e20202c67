//! Per-kind cell renderers.
//!
//! A [`CellRenderer`] is a plain record: one required draw function, optional
//! hooks for sizing, hit-testing, click handling, editor provisioning,
//! accessibility and paste, plus two capability flags. Each kind module
//! exports a `RENDERER` constant; the registry maps kinds to them.
//!
//! Every hook that cares about sub-regions (link segments, chips, the
//! checkbox) computes them with the same layout function its draw path uses,
//! so what the user sees is exactly what they can hit.

pub mod boolean;
pub mod chart;
pub mod image;
pub mod link;
pub mod loading;
pub mod number;
pub mod rating;
pub mod select;
pub mod text;

use std::fmt;

use koshi_types::{Cell, CellDataError, CellKind, ContentAlign};
use kurbo::{Point, Rect};
use tracing::{error, warn};

use crate::color::Color;
use crate::context::{ClickContext, MeasureContext, RenderContext};
use crate::editor::EditorDescriptor;
use crate::surface::{FontSpec, TextMeasure};
use crate::text::truncate_to_width;
use crate::theme::GridTheme;

pub type DrawFn = fn(&Cell, &mut RenderContext<'_>);
pub type MeasureFn = fn(&Cell, &MeasureContext<'_>) -> Option<f64>;
pub type BoundFn = fn(&Cell, &ClickContext<'_>) -> bool;
pub type ClickFn = fn(&Cell, &ClickContext<'_>);
pub type EditorFn = fn(&Cell) -> Option<EditorDescriptor>;
pub type AccessibilityFn = fn(&Cell) -> Option<String>;
pub type PasteFn = fn(&str, &Cell) -> Option<Cell>;

/// Draw, measure, interaction and editor behavior for one cell kind.
#[derive(Clone, Copy)]
pub struct CellRenderer {
    pub kind: CellKind,
    pub draw: DrawFn,
    /// Repaint on pointer enter/leave even when the cell isn't active.
    pub needs_hover: bool,
    /// Repaint as the pointer moves within the cell.
    pub needs_hover_position: bool,
    pub measure: Option<MeasureFn>,
    pub check_within_bound: Option<BoundFn>,
    pub on_click: Option<ClickFn>,
    pub provide_editor: Option<EditorFn>,
    pub accessibility: Option<AccessibilityFn>,
    pub on_paste: Option<PasteFn>,
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRenderer")
            .field("kind", &self.kind)
            .field("needs_hover", &self.needs_hover)
            .field("needs_hover_position", &self.needs_hover_position)
            .field("measure", &self.measure.is_some())
            .field("check_within_bound", &self.check_within_bound.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("provide_editor", &self.provide_editor.is_some())
            .field("accessibility", &self.accessibility.is_some())
            .field("on_paste", &self.on_paste.is_some())
            .finish()
    }
}

impl CellRenderer {
    /// A renderer that only draws.
    pub const fn draw_only(kind: CellKind, draw: DrawFn) -> Self {
        Self {
            kind,
            draw,
            needs_hover: false,
            needs_hover_position: false,
            measure: None,
            check_within_bound: None,
            on_click: None,
            provide_editor: None,
            accessibility: None,
            on_paste: None,
        }
    }

    pub fn paint(&self, cell: &Cell, ctx: &mut RenderContext<'_>) {
        (self.draw)(cell, ctx);
    }

    /// Minimum height for `cell`, or `None` for the default row height.
    pub fn measure_height(&self, cell: &Cell, ctx: &MeasureContext<'_>) -> Option<f64> {
        let measure = self.measure?;
        measure(cell, ctx).map(|h| if h.is_finite() { h.max(0.0) } else { 0.0 })
    }

    pub fn is_within_bound(&self, cell: &Cell, ctx: &ClickContext<'_>) -> bool {
        self.check_within_bound.is_some_and(|bound| bound(cell, ctx))
    }

    /// Dispatch a click. `on_click` runs only when the same position passes
    /// `check_within_bound`. Returns whether the click was handled.
    pub fn click(&self, cell: &Cell, ctx: &ClickContext<'_>) -> bool {
        let Some(on_click) = self.on_click else {
            return false;
        };
        if !self.is_within_bound(cell, ctx) {
            return false;
        }
        on_click(cell, ctx);
        true
    }

    /// The editor this renderer asks for. A custom editor on the cell wins.
    pub fn editor_for(&self, cell: &Cell) -> Option<EditorDescriptor> {
        EditorDescriptor::custom_for(cell).or_else(|| self.provide_editor.and_then(|f| f(cell)))
    }

    pub fn accessibility_string(&self, cell: &Cell) -> Option<String> {
        self.accessibility.and_then(|f| f(cell))
    }

    /// New cell value from pasted text. Read-only cells never accept paste.
    pub fn paste(&self, text: &str, cell: &Cell) -> Option<Cell> {
        if cell.is_readonly() {
            return None;
        }
        self.on_paste.and_then(|f| f(text, cell))
    }
}

// ============================================================================
// Shared layout and paint helpers
// ============================================================================

/// The cell rectangle minus theme padding. Never inverted.
pub(crate) fn content_box(rect: Rect, theme: &GridTheme) -> Rect {
    let h = theme.cell_horizontal_padding.min(rect.width() / 2.0).max(0.0);
    let v = theme.cell_vertical_padding.min(rect.height() / 2.0).max(0.0);
    Rect::new(rect.x0 + h, rect.y0 + v, rect.x1 - h, rect.y1 - v)
}

pub(crate) fn alignment(cell: &Cell, default: ContentAlign) -> ContentAlign {
    cell.common().content_align.unwrap_or(default)
}

/// Left edge for content `width` wide inside `area`.
pub(crate) fn align_x(area: Rect, width: f64, align: ContentAlign) -> f64 {
    match align {
        ContentAlign::Left => area.x0,
        ContentAlign::Right => (area.x1 - width).max(area.x0),
        ContentAlign::Center => area.x0 + ((area.width() - width) / 2.0).max(0.0),
    }
}

/// Top of a single line box vertically centered in `area`.
pub(crate) fn line_top(area: Rect, line_height: f64) -> f64 {
    area.y0 + (area.height() - line_height) / 2.0
}

/// Rect of a single text run laid out the way [`paint_line`] draws it.
pub(crate) fn line_rect<M: TextMeasure + ?Sized>(
    metrics: &M,
    text: &str,
    font: &FontSpec,
    area: Rect,
    line_height: f64,
    align: ContentAlign,
) -> Rect {
    let width = metrics.measure_text(text, font).width.min(area.width());
    let x = align_x(area, width, align);
    let y = line_top(area, line_height);
    Rect::new(x, y, x + width, y + line_height)
}

/// Paint one line of text into `area`, truncated with an ellipsis.
pub(crate) fn paint_line(
    ctx: &mut RenderContext<'_>,
    text: &str,
    font: &FontSpec,
    area: Rect,
    align: ContentAlign,
    color: Color,
) {
    let fitted = truncate_to_width(&*ctx.surface, text, font, area.width());
    if fitted.is_empty() {
        return;
    }
    let run = line_rect(&*ctx.surface, &fitted, font, area, ctx.theme.line_height, align);
    ctx.surface.fill_text(&fitted, Point::new(run.x0, run.y0), font, color);
}

/// Outline the cell in the error color with a `!` marker.
pub(crate) fn paint_error_glyph(ctx: &mut RenderContext<'_>) {
    let theme = ctx.theme;
    let rect = ctx.rect.inset(-1.0);
    ctx.surface.stroke_rect(rect, theme.error_color, 1.0);
    let area = content_box(ctx.rect, theme);
    paint_line(ctx, "!", &theme.font().bold(), area, ContentAlign::Left, theme.error_color);
}

/// Report malformed data and paint the error glyph instead of the cell.
pub(crate) fn paint_malformed(ctx: &mut RenderContext<'_>, kind: CellKind, err: &CellDataError) {
    warn!(
        row = ctx.row_index,
        column = ctx.column_index,
        %kind,
        error = %err,
        "malformed cell data"
    );
    paint_error_glyph(ctx);
}

/// A renderer was handed a cell of another kind.
pub(crate) fn paint_kind_mismatch(ctx: &mut RenderContext<'_>, expected: CellKind, cell: &Cell) {
    error!(
        row = ctx.row_index,
        column = ctx.column_index,
        %expected,
        got = %cell.kind(),
        "renderer dispatched on wrong cell kind"
    );
    paint_error_glyph(ctx);
}

/// Index of the first region containing `point`. Earlier regions win ties.
pub(crate) fn first_hit(regions: &[Rect], point: Point) -> Option<usize> {
    regions.iter().position(|r| r.contains(point))
}
