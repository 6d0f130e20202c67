//! Image cells: a strip of square thumbnails loaded through the image cache.

use koshi_types::{Cell, CellKind, ImageCell};
use kurbo::Rect;

use super::{CellRenderer, content_box, paint_kind_mismatch, paint_malformed};
use crate::cache::ImageStatus;
use crate::color::{Color, with_alpha};
use crate::context::{MeasureContext, RenderContext};
use crate::theme::GridTheme;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Image,
    draw,
    needs_hover: false,
    needs_hover_position: false,
    measure: Some(measure),
    check_within_bound: None,
    on_click: None,
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: None,
};

/// Square thumbnail slots across `area`, one per image, clipped to the
/// slots that start inside it.
fn thumbnail_rects(cell: &ImageCell, area: Rect, theme: &GridTheme) -> Vec<Rect> {
    let side = area.height();
    if side <= 0.0 {
        return Vec::new();
    }
    (0..cell.data.len())
        .map(|i| {
            let x = area.x0 + i as f64 * (side + theme.icon_gap);
            Rect::new(x, area.y0, x + side, area.y1)
        })
        .take_while(|r| r.x0 < area.x1)
        .collect()
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Image(image) = cell else {
        paint_kind_mismatch(ctx, CellKind::Image, cell);
        return;
    };
    if let Err(err) = cell.validate() {
        paint_malformed(ctx, CellKind::Image, &err);
        return;
    }
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);

    if image.data.is_empty() {
        ctx.surface.stroke_rect(area, theme.placeholder_color, 1.0);
        paint_icon(ctx, area, theme.placeholder_color);
        return;
    }

    ctx.surface.save();
    ctx.surface.clip(area);
    for (slot, data) in thumbnail_rects(image, area, theme).into_iter().zip(&image.data) {
        match ctx.images.request(&data.url) {
            ImageStatus::Ready(loaded) => ctx.surface.draw_image(&loaded, slot),
            ImageStatus::Pending => {
                ctx.surface.fill_rounded_rect(slot, theme.chip_radius, theme.placeholder_color);
            }
            ImageStatus::Failed(_) => {
                let bg = with_alpha(theme.error_color, 0.15);
                ctx.surface.fill_rounded_rect(slot, theme.chip_radius, bg);
                paint_icon(ctx, slot, theme.error_color);
            }
        }
    }
    ctx.surface.restore();
}

/// The "image" sprite centered in `within`.
fn paint_icon(ctx: &mut RenderContext<'_>, within: Rect, color: Color) {
    let sprites = ctx.sprites;
    let Some(sprite) = sprites.get("image") else {
        return;
    };
    let size = ctx.theme.icon_size.min(within.width()).min(within.height());
    let c = within.center();
    let dest = Rect::new(c.x - size / 2.0, c.y - size / 2.0, c.x + size / 2.0, c.y + size / 2.0);
    ctx.surface.draw_sprite(sprite, dest, color);
}

/// Image cells are a fixed height whether or not they hold images.
fn measure(_cell: &Cell, ctx: &MeasureContext<'_>) -> Option<f64> {
    Some(ctx.theme.image_cell_height)
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Image(image) = cell else { return None };
    Some(match image.data.len() {
        0 => "no images".to_string(),
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    })
}
