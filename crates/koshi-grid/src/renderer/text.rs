//! Plain text cells: one truncated line, or wrapped lines when `is_wrap`.

use koshi_types::{Cell, CellKind, ContentAlign, TextCell};
use kurbo::Point;

use super::{CellRenderer, alignment, align_x, content_box, paint_kind_mismatch, paint_line};
use crate::context::{MeasureContext, RenderContext};
use crate::text::wrap_lines;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Text,
    draw,
    needs_hover: false,
    needs_hover_position: false,
    measure: Some(measure),
    check_within_bound: None,
    on_click: None,
    provide_editor: None,
    accessibility: None,
    on_paste: Some(paste),
};

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Text(text) = cell else {
        paint_kind_mismatch(ctx, CellKind::Text, cell);
        return;
    };
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);
    let align = alignment(cell, ContentAlign::Left);
    let font = theme.font();

    let lines = if text.is_wrap {
        wrap_lines(&*ctx.surface, &text.display_data, &font, area.width())
    } else {
        Vec::new()
    };
    if lines.len() <= 1 {
        paint_line(ctx, &text.display_data, &font, area, align, theme.cell_text_color);
        return;
    }

    ctx.surface.save();
    ctx.surface.clip(ctx.rect);
    for (i, line) in lines.iter().enumerate() {
        let y = area.y0 + i as f64 * theme.line_height;
        if y >= area.y1 {
            break;
        }
        let width = ctx.surface.measure_text(line, &font).width;
        let x = align_x(area, width, align);
        ctx.surface.fill_text(line, Point::new(x, y), &font, theme.cell_text_color);
    }
    ctx.surface.restore();
}

/// Wrapped cells grow with their line count; single-line cells use the row
/// height.
fn measure(cell: &Cell, ctx: &MeasureContext<'_>) -> Option<f64> {
    let Cell::Text(text) = cell else { return None };
    if !text.is_wrap {
        return None;
    }
    let theme = ctx.theme;
    let width = (ctx.width - 2.0 * theme.cell_horizontal_padding).max(0.0);
    let lines = wrap_lines(ctx.metrics, &text.display_data, &theme.font(), width).len();
    Some(lines as f64 * theme.line_height + 2.0 * theme.cell_vertical_padding)
}

fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Text(current) = cell else { return None };
    Some(Cell::Text(TextCell {
        data: text.to_string(),
        display_data: text.to_string(),
        ..current.clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::Harness;
    use crate::surface::DrawOp;

    fn wrapped(s: &str) -> Cell {
        Cell::Text(TextCell {
            data: s.into(),
            display_data: s.into(),
            is_wrap: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_draws_display_data_not_data() {
        let mut h = Harness::new(200.0, 32.0);
        let cell = Cell::Text(TextCell {
            data: "raw".into(),
            display_data: "Shown".into(),
            ..Default::default()
        });
        h.draw(&RENDERER, &cell, None);
        assert_eq!(h.surface.texts(), vec!["Shown"]);
    }

    #[test]
    fn test_long_text_truncates() {
        // 84px of content at 7.8px per char
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &Cell::text("abcdefghijklmnop"), None);
        let texts = h.surface.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with('…'));
    }

    #[test]
    fn test_right_align() {
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &Cell::text("ab").with_align(ContentAlign::Right), None);
        let Some(DrawOp::Text { origin, .. }) = h.surface.ops().first() else {
            panic!("expected text op");
        };
        assert!((origin.x - (92.0 - 15.6)).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_draws_each_line_clipped() {
        let mut h = Harness::new(100.0, 200.0);
        h.draw(&RENDERER, &wrapped("alpha beta gamma delta epsilon"), None);
        assert!(h.surface.texts().len() > 1);
        assert_eq!(h.surface.depth(), 0);
        assert!(matches!(h.surface.ops().first(), Some(DrawOp::Save)));
    }

    #[test]
    fn test_measure_only_when_wrapping() {
        let h = Harness::new(100.0, 32.0);
        assert_eq!(h.measure(&RENDERER, &Cell::text("a b c")), None);
        // "alpha beta" / "gamma" at 84px → 2 lines
        let height = h.measure(&RENDERER, &wrapped("alpha beta gamma")).unwrap();
        assert_eq!(height, 2.0 * 18.0 + 12.0);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let h = Harness::new(120.0, 32.0);
        let cell = wrapped("the quick brown fox jumps over the lazy dog");
        assert_eq!(h.measure(&RENDERER, &cell), h.measure(&RENDERER, &cell));
    }

    #[test]
    fn test_paste_keeps_attributes() {
        let cell = Cell::text("old").with_align(ContentAlign::Center);
        let pasted = RENDERER.paste("new", &cell).unwrap();
        assert_eq!(pasted.display_text(), "new");
        assert_eq!(pasted.common().content_align, Some(ContentAlign::Center));
    }
}
