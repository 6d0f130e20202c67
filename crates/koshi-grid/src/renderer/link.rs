//! Link cells: each link is its own clickable segment.

use koshi_types::{Cell, CellKind, ContentAlign, LinkCell};
use kurbo::{Point, Rect};

use super::{
    CellRenderer, content_box, first_hit, line_top, paint_kind_mismatch, paint_line,
};
use crate::context::{ClickContext, RenderContext};
use crate::surface::{FontSpec, TextMeasure};
use crate::text::truncate_to_width;
use crate::theme::GridTheme;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Link,
    draw,
    needs_hover: true,
    needs_hover_position: true,
    measure: None,
    check_within_bound: Some(check_within_bound),
    on_click: Some(on_click),
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: Some(paste),
};

const SEPARATOR: &str = ", ";

/// One laid-out link.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    /// Index into `LinkCell::data`.
    index: usize,
    text: String,
    rect: Rect,
}

/// Lay links left to right on one line, stopping at the area's right edge.
fn layout<M: TextMeasure + ?Sized>(
    metrics: &M,
    cell: &LinkCell,
    area: Rect,
    theme: &GridTheme,
    font: &FontSpec,
) -> Vec<Segment> {
    let sep = metrics.measure_text(SEPARATOR, font).width;
    let y = line_top(area, theme.line_height);
    let mut x = area.x0;
    let mut segments = Vec::with_capacity(cell.data.len());
    for (index, link) in cell.data.iter().enumerate() {
        let remaining = area.x1 - x;
        if remaining <= 0.0 {
            break;
        }
        let text = truncate_to_width(metrics, link, font, remaining);
        if text.is_empty() {
            break;
        }
        let width = metrics.measure_text(&text, font).width;
        segments.push(Segment {
            index,
            text: text.into_owned(),
            rect: Rect::new(x, y, x + width, y + theme.line_height),
        });
        x += width + sep;
    }
    segments
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Link(link) = cell else {
        paint_kind_mismatch(ctx, CellKind::Link, cell);
        return;
    };
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);
    let font = theme.font();

    if link.data.is_empty() {
        paint_line(ctx, &link.display_data, &font, area, ContentAlign::Left, theme.cell_text_color);
        return;
    }

    let hover = ctx.hover_in_surface();
    let segments = layout(&*ctx.surface, link, area, theme, &font);
    let hovered = hover.and_then(|p| first_hit(&segment_rects(&segments), p));
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            let sep_x = seg.rect.x0 - ctx.surface.measure_text(SEPARATOR, &font).width;
            ctx.surface.fill_text(
                SEPARATOR,
                Point::new(sep_x, seg.rect.y0),
                &font,
                theme.cell_text_color_secondary,
            );
        }
        ctx.surface.fill_text(&seg.text, Point::new(seg.rect.x0, seg.rect.y0), &font, theme.link_color);
        if hovered == Some(i) {
            let baseline = seg.rect.y0 + font.size + 1.0;
            ctx.surface.stroke_line(
                Point::new(seg.rect.x0, baseline),
                Point::new(seg.rect.x1, baseline),
                theme.link_color,
                1.0,
            );
        }
    }
}

fn segment_rects(segments: &[Segment]) -> Vec<Rect> {
    segments.iter().map(|s| s.rect).collect()
}

fn hit(cell: &Cell, ctx: &ClickContext<'_>) -> Option<usize> {
    let Cell::Link(link) = cell else { return None };
    let area = content_box(ctx.local_rect(), ctx.theme);
    let segments = layout(ctx.metrics, link, area, ctx.theme, &ctx.theme.font());
    first_hit(&segment_rects(&segments), ctx.position).map(|i| segments[i].index)
}

fn check_within_bound(cell: &Cell, ctx: &ClickContext<'_>) -> bool {
    hit(cell, ctx).is_some()
}

fn on_click(cell: &Cell, ctx: &ClickContext<'_>) {
    let Cell::Link(link) = cell else { return };
    let (Some(index), Some(callback)) = (hit(cell, ctx), &link.on_click) else {
        return;
    };
    if let Some(value) = link.data.get(index) {
        callback.call(value.clone());
    }
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Link(link) = cell else { return None };
    match link.data.len() {
        0 => None,
        1 => Some(format!("link {}", link.data[0])),
        n => Some(format!("{n} links: {}", link.data.join(", "))),
    }
}

/// Comma-separated links, blanks dropped.
fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Link(current) = cell else { return None };
    let data: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Some(Cell::Link(LinkCell {
        display_data: data.join(SEPARATOR),
        data,
        ..current.clone()
    }))
}
