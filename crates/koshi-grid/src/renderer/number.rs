//! Number cells: right-aligned text, or a ring/bar gauge when `show_as` is
//! set.

use std::f64::consts::TAU;

use koshi_types::{Cell, CellKind, ContentAlign, NumberCell, NumberDisplayType, NumberShowAs};
use kurbo::{Point, Rect};

use super::{
    CellRenderer, alignment, content_box, line_rect, paint_kind_mismatch, paint_line,
    paint_malformed,
};
use crate::color::parse_hex_or;
use crate::context::RenderContext;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Number,
    draw,
    needs_hover: false,
    needs_hover_position: false,
    measure: None,
    check_within_bound: None,
    on_click: None,
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: Some(paste),
};

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Number(number) = cell else {
        paint_kind_mismatch(ctx, CellKind::Number, cell);
        return;
    };
    if let Err(err) = cell.validate() {
        paint_malformed(ctx, CellKind::Number, &err);
        return;
    }
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);

    match (&number.show_as, number.data) {
        (Some(show_as), Some(value)) => draw_gauge(ctx, number, show_as, value, area),
        _ => {
            let align = alignment(cell, ContentAlign::Right);
            paint_line(ctx, &number.display_data, &theme.font(), area, align, theme.cell_text_color);
        }
    }
}

fn draw_gauge(
    ctx: &mut RenderContext<'_>,
    number: &NumberCell,
    show_as: &NumberShowAs,
    value: f64,
    area: Rect,
) {
    let theme = ctx.theme;
    let font = theme.font();
    let ratio = show_as.ratio(value);
    let fill = parse_hex_or(Some(&show_as.color), theme.accent);

    // Value label sits at the right; the gauge takes what's left.
    let mut gauge_area = area;
    if show_as.show_value && !number.display_data.is_empty() {
        let label = line_rect(&*ctx.surface, &number.display_data, &font, area, theme.line_height, ContentAlign::Right);
        gauge_area.x1 = (label.x0 - theme.icon_gap).max(area.x0);
        paint_line(ctx, &number.display_data, &font, area, ContentAlign::Right, theme.cell_text_color);
    }

    match show_as.display_type {
        NumberDisplayType::Bar => {
            let h = theme.gauge_bar_height.min(gauge_area.height());
            let y = gauge_area.center().y - h / 2.0;
            let track = Rect::new(gauge_area.x0, y, gauge_area.x1, y + h);
            ctx.surface.fill_rounded_rect(track, h / 2.0, theme.gauge_track_color);
            if ratio > 0.0 {
                let bar = Rect::new(track.x0, y, track.x0 + track.width() * ratio, y + h);
                ctx.surface.fill_rounded_rect(bar, h / 2.0, fill);
            }
        }
        NumberDisplayType::Ring => {
            let stroke = theme.ring_stroke_width;
            let radius = ((gauge_area.height().min(gauge_area.width()) - stroke) / 2.0).max(0.0);
            let center = Point::new(gauge_area.x0 + radius + stroke / 2.0, gauge_area.center().y);
            ctx.surface
                .stroke_arc(center, radius, 0.0, TAU, theme.gauge_track_color, stroke);
            if ratio > 0.0 {
                ctx.surface.stroke_arc(center, radius, 0.0, TAU * ratio, fill, stroke);
            }
        }
    }
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Number(number) = cell else { return None };
    let show_as = number.show_as.as_ref()?;
    number.data?;
    Some(format!("{} of {}", number.display_data, show_as.max_value))
}

/// Parse pasted text as a number. Thousands separators are ignored and blank
/// text clears the value.
fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Number(current) = cell else { return None };
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return Some(Cell::Number(NumberCell {
            data: None,
            display_data: String::new(),
            ..current.clone()
        }));
    }
    let value: f64 = cleaned.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(Cell::Number(NumberCell {
        data: Some(value),
        display_data: value.to_string(),
        ..current.clone()
    }))
}
