//! Rating cells: a row of `max` icons, the first `data` of them filled.
//! Clicking an icon of an editable cell reports that icon's value.

use koshi_types::{Cell, CellKind, ContentAlign, RatingCell};
use kurbo::Rect;

use super::{CellRenderer, alignment, align_x, content_box, first_hit, paint_kind_mismatch, paint_malformed};
use crate::color::{parse_hex_or, with_alpha};
use crate::context::{ClickContext, MeasureContext, RenderContext};
use crate::theme::GridTheme;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Rating,
    draw,
    needs_hover: true,
    needs_hover_position: true,
    measure: Some(measure),
    check_within_bound: Some(check_within_bound),
    on_click: Some(on_click),
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: Some(paste),
};

/// Icons that start inside `area`. Anything past the right edge is never laid out.
fn icon_rects(rating: &RatingCell, area: Rect, align: ContentAlign, theme: &GridTheme) -> Vec<Rect> {
    let size = theme.icon_size;
    let count = rating.max as usize;
    let total = count as f64 * size + count.saturating_sub(1) as f64 * theme.icon_gap;
    let x0 = align_x(area, total, align);
    let y0 = area.center().y - size / 2.0;
    (0..count)
        .map(|i| {
            let x = x0 + i as f64 * (size + theme.icon_gap);
            Rect::new(x, y0, x + size, y0 + size)
        })
        .take_while(|r| r.x0 < area.x1)
        .collect()
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Rating(rating) = cell else {
        paint_kind_mismatch(ctx, CellKind::Rating, cell);
        return;
    };
    if let Err(err) = cell.validate() {
        paint_malformed(ctx, CellKind::Rating, &err);
        return;
    }
    let theme = ctx.theme;
    let sprites = ctx.sprites;
    let area = content_box(ctx.rect, theme);
    let icons = icon_rects(rating, area, alignment(cell, ContentAlign::Left), theme);
    let filled = rating.data.round() as usize;
    let color = parse_hex_or(Some(&rating.color), theme.accent);

    // Hovering an editable rating previews the value it would become.
    let preview = if rating.common.readonly {
        None
    } else {
        ctx.hover_in_surface()
            .and_then(|p| first_hit(&icons, p))
            .map(|i| i + 1)
    };

    ctx.surface.save();
    ctx.surface.clip(ctx.rect);
    for (i, dest) in icons.into_iter().enumerate() {
        let icon_color = match preview {
            Some(p) if i < p => with_alpha(color, 0.6),
            _ if i < filled => color,
            _ => theme.placeholder_color,
        };
        match sprites.get_or_fallback(&rating.icon) {
            Some(sprite) => ctx.surface.draw_sprite(sprite, dest, icon_color),
            None => ctx.surface.fill_rounded_rect(dest, dest.width() / 2.0, icon_color),
        }
    }
    ctx.surface.restore();
}

/// 1-based value of the icon under the pointer, for editable cells.
fn hit_value(cell: &Cell, ctx: &ClickContext<'_>) -> Option<u32> {
    let Cell::Rating(rating) = cell else { return None };
    if cell.is_readonly() {
        return None;
    }
    let area = content_box(ctx.local_rect(), ctx.theme);
    let icons = icon_rects(rating, area, alignment(cell, ContentAlign::Left), ctx.theme);
    let index = first_hit(&icons, ctx.position)?;
    u32::try_from(index + 1).ok()
}

fn check_within_bound(cell: &Cell, ctx: &ClickContext<'_>) -> bool {
    hit_value(cell, ctx).is_some()
}

fn on_click(cell: &Cell, ctx: &ClickContext<'_>) {
    let Cell::Rating(rating) = cell else { return };
    if let (Some(value), Some(rate)) = (hit_value(cell, ctx), &rating.on_rate) {
        rate.call(value);
    }
}

/// One icon row plus padding. Doesn't depend on the column width, so even a
/// zero-width column gets the full floor height.
fn measure(_cell: &Cell, ctx: &MeasureContext<'_>) -> Option<f64> {
    let theme = ctx.theme;
    Some(theme.icon_size.max(theme.line_height) + 2.0 * theme.cell_vertical_padding)
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Rating(rating) = cell else { return None };
    Some(format!("{} of {}", rating.data, rating.max))
}

/// Whole numbers from 0 to `max`.
fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Rating(current) = cell else { return None };
    let value: u32 = text.trim().parse().ok()?;
    if value > current.max {
        return None;
    }
    Some(Cell::Rating(RatingCell {
        data: f64::from(value),
        display_data: value.to_string(),
        ..current.clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SpriteCache;
    use crate::renderer::test_support::Harness;
    use crate::surface::DrawOp;
    use koshi_types::{CellCallback, MAX_RATING_SCALE};
    use kurbo::Point;
    use std::sync::{Arc, Mutex};

    fn rating(value: f64, max: u32) -> Cell {
        Cell::Rating(RatingCell {
            data: value,
            display_data: format!("{value}"),
            icon: "heart".into(),
            color: "#ff0000".into(),
            max,
            ..Default::default()
        })
    }

    fn sprite_colors(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Sprite { color, .. } => Some(crate::color::to_hex(*color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_measure_floor_at_zero_width() {
        let h = Harness::new(100.0, 32.0);
        let floor = 18.0 + 12.0;
        assert_eq!(h.measure_at(&RENDERER, &rating(3.0, 5), 0.0), Some(floor));
        assert_eq!(h.measure_at(&RENDERER, &rating(3.0, 5), 500.0), Some(floor));
    }

    #[test]
    fn test_filled_icons() {
        let mut h = Harness::new(200.0, 32.0);
        h.draw(&RENDERER, &rating(3.0, 5), None);
        assert_eq!(h.surface.sprites(), vec!["heart"; 5]);
        let colors = sprite_colors(h.surface.ops());
        assert_eq!(colors.iter().filter(|c| *c == "#ff0000ff").count(), 3);
    }

    #[test]
    fn test_hover_previews_value() {
        let mut h = Harness::new(200.0, 32.0);
        // icons at x 8, 28, 48, 68, 88 (16px + 4px gap)
        h.draw(&RENDERER, &rating(1.0, 5), Some(Point::new(50.0, 16.0)));
        let colors = sprite_colors(h.surface.ops());
        let preview = crate::color::to_hex(with_alpha(crate::color::rgb8(255, 0, 0), 0.6));
        assert_eq!(colors.iter().filter(|c| **c == preview).count(), 3);
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        let mut h = Harness::new(200.0, 32.0);
        let Cell::Rating(mut r) = rating(2.0, 3) else { unreachable!() };
        r.icon = "unicorn".into();
        h.draw(&RENDERER, &Cell::Rating(r.clone()), None);
        assert_eq!(h.surface.sprites(), vec!["star"; 3]);

        h.sprites = SpriteCache::empty();
        h.surface.clear();
        h.draw(&RENDERER, &Cell::Rating(r), None);
        assert!(h.surface.sprites().is_empty());
    }

    #[test]
    fn test_icons_stop_at_cell_edge() {
        let mut h = Harness::new(120.0, 32.0);
        let Cell::Rating(mut r) = rating(3.0, 5) else { unreachable!() };
        r.max = MAX_RATING_SCALE;
        h.draw(&RENDERER, &Cell::Rating(r), None);
        // content box 8..112: icons at 8, 28, 48, 68, 88, 108
        assert_eq!(h.surface.sprites().len(), 6);
        assert_eq!(h.surface.depth(), 0);
    }

    #[test]
    fn test_oversized_scale_is_malformed() {
        let mut h = Harness::new(120.0, 32.0);
        h.draw(&RENDERER, &rating(3.0, 5_000_000), None);
        assert!(h.surface.sprites().is_empty());
        assert_eq!(h.surface.texts(), vec!["!"]);
    }

    // ── clicks ──────────────────────────────────────────────────────────

    fn rated(value: f64, max: u32) -> (Cell, Arc<Mutex<Vec<u32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let Cell::Rating(mut r) = rating(value, max) else { unreachable!() };
        r.on_rate = Some(CellCallback::new(move |v| sink.lock().unwrap().push(v)));
        (Cell::Rating(r), seen)
    }

    #[test]
    fn test_click_icon_reports_value() {
        let h = Harness::new(200.0, 32.0);
        let (cell, seen) = rated(1.0, 5);
        // fourth icon spans x 68..84
        assert!(RENDERER.click(&cell, &h.click_ctx(Point::new(70.0, 16.0))));
        assert_eq!(*seen.lock().unwrap(), vec![4]);
    }

    #[test]
    fn test_click_between_or_past_icons_ignored() {
        let h = Harness::new(200.0, 32.0);
        let (cell, seen) = rated(1.0, 5);
        // gap between the first two icons, then past the last one
        assert!(!RENDERER.click(&cell, &h.click_ctx(Point::new(26.0, 16.0))));
        assert!(!RENDERER.click(&cell, &h.click_ctx(Point::new(150.0, 16.0))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_readonly_rating_not_clickable() {
        let h = Harness::new(200.0, 32.0);
        let (cell, seen) = rated(1.0, 5);
        let cell = cell.with_readonly();
        assert!(!RENDERER.is_within_bound(&cell, &h.click_ctx(Point::new(70.0, 16.0))));
        assert!(!RENDERER.click(&cell, &h.click_ctx(Point::new(70.0, 16.0))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_scale_is_malformed() {
        let mut h = Harness::new(200.0, 32.0);
        h.draw(&RENDERER, &rating(0.0, 0), None);
        assert_eq!(h.surface.texts(), vec!["!"]);
    }

    #[test]
    fn test_paste_range() {
        let cell = rating(1.0, 5);
        let Some(Cell::Rating(r)) = RENDERER.paste("4", &cell) else {
            panic!("expected rating");
        };
        assert_eq!(r.data, 4.0);
        assert_eq!(RENDERER.paste("6", &cell), None);
        assert_eq!(RENDERER.paste("2.5", &cell), None);
        assert_eq!(RENDERER.paste("-1", &cell), None);
    }

    #[test]
    fn test_accessibility() {
        assert_eq!(RENDERER.accessibility_string(&rating(3.0, 5)).as_deref(), Some("3 of 5"));
    }
}
