//! Boolean cells: a checkbox that toggles in place.

use koshi_types::{BooleanCell, Cell, CellKind, ContentAlign};
use kurbo::Rect;

use super::{CellRenderer, alignment, align_x, content_box, paint_kind_mismatch};
use crate::color::with_alpha;
use crate::context::{ClickContext, RenderContext};
use crate::theme::GridTheme;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Boolean,
    draw,
    needs_hover: true,
    needs_hover_position: false,
    measure: None,
    check_within_bound: Some(check_within_bound),
    on_click: Some(on_click),
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: Some(paste),
};

fn checkbox_rect(cell: &Cell, rect: Rect, theme: &GridTheme) -> Rect {
    let area = content_box(rect, theme);
    let size = theme.checkbox_size.min(area.width()).min(area.height());
    let x = align_x(area, size, alignment(cell, ContentAlign::Center));
    let y = area.center().y - size / 2.0;
    Rect::new(x, y, x + size, y + size)
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Boolean(boolean) = cell else {
        paint_kind_mismatch(ctx, CellKind::Boolean, cell);
        return;
    };
    let theme = ctx.theme;
    let sprites = ctx.sprites;
    let bx = checkbox_rect(cell, ctx.rect, theme);
    let readonly = boolean.common.readonly;
    let accent = if readonly {
        theme.cell_text_color_secondary
    } else {
        theme.accent
    };
    let hovered = !readonly && ctx.hovered;

    if boolean.data {
        ctx.surface.fill_rounded_rect(bx, 3.0, accent);
        if let Some(check) = sprites.get("check") {
            ctx.surface.draw_sprite(check, bx.inset(-2.0), theme.cell_bg);
        }
    } else {
        if hovered {
            ctx.surface.fill_rounded_rect(bx, 3.0, with_alpha(accent, 0.2));
        }
        ctx.surface.stroke_rect(bx, accent, 1.0);
    }
}

/// Only the checkbox glyph of an editable cell is interactive.
fn check_within_bound(cell: &Cell, ctx: &ClickContext<'_>) -> bool {
    matches!(cell, Cell::Boolean(_))
        && !cell.is_readonly()
        && checkbox_rect(cell, ctx.local_rect(), ctx.theme).contains(ctx.position)
}

fn on_click(cell: &Cell, _ctx: &ClickContext<'_>) {
    let Cell::Boolean(boolean) = cell else { return };
    if let Some(toggle) = &boolean.on_toggle {
        toggle.call(!boolean.data);
    }
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Boolean(boolean) = cell else { return None };
    Some(if boolean.data { "checked" } else { "unchecked" }.to_string())
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "checked" | "x" => Some(true),
        "false" | "no" | "0" | "unchecked" | "" => Some(false),
        _ => None,
    }
}

fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Boolean(current) = cell else { return None };
    let data = parse_bool(text)?;
    Some(Cell::Boolean(BooleanCell {
        data,
        display_data: data.to_string(),
        ..current.clone()
    }))
}
