use koshi_types::{Cell, CellKind};
use kurbo::Rect;

use super::{CellRenderer, content_box};
use crate::context::RenderContext;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Loading,
    draw,
    needs_hover: false,
    needs_hover_position: false,
    measure: None,
    check_within_bound: None,
    on_click: None,
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: None,
};

/// Skeleton bar across most of the content box.
fn draw(_cell: &Cell, ctx: &mut RenderContext<'_>) {
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);
    let height = (theme.font_size * 0.8).min(area.height());
    let y = area.center().y - height / 2.0;
    let bar = Rect::new(area.x0, y, area.x0 + area.width() * 0.6, y + height);
    ctx.surface.fill_rounded_rect(bar, height / 2.0, theme.placeholder_color);
}

fn accessibility(_cell: &Cell) -> Option<String> {
    Some("loading".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::Harness;
    use crate::surface::DrawOp;

    #[test]
    fn test_skeleton_bar() {
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &Cell::loading(), None);
        let [DrawOp::FillRoundedRect { rect, .. }] = h.surface.ops() else {
            panic!("expected one skeleton bar");
        };
        assert!((rect.width() - 84.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_loading_has_no_editor_or_paste() {
        assert!(RENDERER.editor_for(&Cell::loading()).is_none());
        assert!(RENDERER.paste("x", &Cell::loading()).is_none());
        assert_eq!(RENDERER.accessibility_string(&Cell::loading()).as_deref(), Some("loading"));
    }
}
