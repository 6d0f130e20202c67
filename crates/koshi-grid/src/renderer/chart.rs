//! Chart cells: a sparkline-sized bar or line chart with a hover tooltip.

use koshi_types::{Cell, CellKind, ChartType};
use kurbo::{Point, Rect};

use super::{CellRenderer, content_box, paint_kind_mismatch, paint_malformed};
use crate::color::{parse_hex_or, with_alpha};
use crate::context::RenderContext;
use crate::text::truncate_to_width;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Chart,
    draw,
    needs_hover: true,
    needs_hover_position: true,
    measure: None,
    check_within_bound: None,
    on_click: None,
    provide_editor: None,
    accessibility: Some(accessibility),
    on_paste: None,
};

/// Maps series values onto the vertical extent of the plot area.
///
/// The range always includes zero so bars grow from a visible baseline.
struct Scale {
    lo: f64,
    span: f64,
    area: Rect,
}

impl Scale {
    fn new(data: &[f64], area: Rect) -> Self {
        let lo = data.iter().copied().fold(0.0_f64, f64::min);
        let hi = data.iter().copied().fold(0.0_f64, f64::max);
        let span = if hi > lo { hi - lo } else { 1.0 };
        Self { lo, span, area }
    }

    fn y(&self, value: f64) -> f64 {
        self.area.y1 - (value - self.lo) / self.span * self.area.height()
    }

    fn slot_width(&self, n: usize) -> f64 {
        self.area.width() / n.max(1) as f64
    }

    fn slot_center(&self, n: usize, i: usize) -> f64 {
        self.area.x0 + self.slot_width(n) * (i as f64 + 0.5)
    }

    /// Index of the slot under `x`, if inside the plot area.
    fn slot_at(&self, n: usize, p: Point) -> Option<usize> {
        if n == 0 || !self.area.contains(p) {
            return None;
        }
        let i = ((p.x - self.area.x0) / self.slot_width(n)).floor() as usize;
        Some(i.min(n - 1))
    }
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Chart(chart) = cell else {
        paint_kind_mismatch(ctx, CellKind::Chart, cell);
        return;
    };
    if let Err(err) = cell.validate() {
        paint_malformed(ctx, CellKind::Chart, &err);
        return;
    }
    if chart.data.is_empty() {
        return;
    }
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);
    let scale = Scale::new(&chart.data, area);
    let color = parse_hex_or(chart.color.as_deref(), theme.chart_color);
    let n = chart.data.len();
    let hovered = ctx.hover_in_surface().and_then(|p| scale.slot_at(n, p));

    match chart.chart_type.unwrap_or_default() {
        ChartType::Bar => {
            let slot = scale.slot_width(n);
            let gap = (slot * 0.2).min(2.0);
            let base = scale.y(0.0);
            for (i, value) in chart.data.iter().enumerate() {
                let x = area.x0 + slot * i as f64 + gap / 2.0;
                let bar = Rect::new(x, base, x + slot - gap, scale.y(*value)).abs();
                let fill = if hovered.is_some_and(|h| h != i) {
                    with_alpha(color, 0.5)
                } else {
                    color
                };
                ctx.surface.fill_rect(bar, fill);
            }
        }
        ChartType::Line => {
            let points: Vec<Point> = chart
                .data
                .iter()
                .enumerate()
                .map(|(i, v)| Point::new(scale.slot_center(n, i), scale.y(*v)))
                .collect();
            ctx.surface.stroke_polyline(&points, color, 1.5);
            if let Some(p) = hovered.and_then(|i| points.get(i)) {
                let dot = Rect::new(p.x - 2.0, p.y - 2.0, p.x + 2.0, p.y + 2.0);
                ctx.surface.fill_rounded_rect(dot, 2.0, color);
            }
        }
    }

    if let Some(i) = hovered {
        paint_tooltip(ctx, &chart.display_data[i], scale.slot_center(n, i));
    }
}

/// Label chip above the plot, centered on `x` and kept inside the cell.
fn paint_tooltip(ctx: &mut RenderContext<'_>, label: &str, x: f64) {
    let theme = ctx.theme;
    let font = theme.chip_font();
    let max_width = (ctx.rect.width() - 2.0 * theme.chip_padding).max(0.0);
    let label = truncate_to_width(&*ctx.surface, label, &font, max_width);
    if label.is_empty() {
        return;
    }
    let width = ctx.surface.measure_text(&label, &font).width + 2.0 * theme.chip_padding;
    let x0 = (x - width / 2.0).clamp(ctx.rect.x0, (ctx.rect.x1 - width).max(ctx.rect.x0));
    let chip = Rect::new(x0, ctx.rect.y0, x0 + width, ctx.rect.y0 + theme.chip_height);
    ctx.surface.fill_rounded_rect(chip, theme.chip_radius, theme.chip_bg);
    let text_y = chip.y0 + (theme.chip_height - font.size) / 2.0;
    ctx.surface.fill_text(&label, Point::new(chip.x0 + theme.chip_padding, text_y), &font, theme.chip_text_color);
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Chart(chart) = cell else { return None };
    if chart.display_data.is_empty() {
        return None;
    }
    let kind = match chart.chart_type.unwrap_or_default() {
        ChartType::Bar => "bar",
        ChartType::Line => "line",
    };
    Some(format!("{kind} chart: {}", chart.display_data.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::Harness;
    use crate::surface::DrawOp;
    use koshi_types::ChartCell;

    fn chart(kind: ChartType, data: &[f64]) -> Cell {
        Cell::Chart(ChartCell {
            data: data.to_vec(),
            display_data: data.iter().map(|v| format!("{v}")).collect(),
            chart_type: Some(kind),
            ..Default::default()
        })
    }

    #[test]
    fn test_bar_per_value() {
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &chart(ChartType::Bar, &[1.0, 4.0, 2.0]), None);
        let bars: Vec<Rect> = h
            .surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 3);
        // Tallest bar fills the plot height
        assert_eq!(bars[1].height(), 20.0);
        assert_eq!(bars[0].height(), 5.0);
    }

    #[test]
    fn test_line_chart_polyline() {
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &chart(ChartType::Line, &[0.0, 1.0]), None);
        let Some(DrawOp::Polyline { points, .. }) = h.surface.ops().first() else {
            panic!("expected polyline");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].y, 26.0);
        assert_eq!(points[1].y, 6.0);
    }

    #[test]
    fn test_hover_shows_tooltip() {
        let mut h = Harness::new(100.0, 32.0);
        // Plot spans x 8..92; third slot starts at 64
        h.draw(&RENDERER, &chart(ChartType::Bar, &[1.0, 4.0, 2.0]), Some(Point::new(80.0, 20.0)));
        assert_eq!(h.surface.texts(), vec!["2"]);
    }

    #[test]
    fn test_mismatch_draws_error() {
        let mut h = Harness::new(100.0, 32.0);
        let cell = Cell::Chart(ChartCell {
            data: vec![1.0, 2.0],
            display_data: vec!["1".into()],
            ..Default::default()
        });
        h.draw(&RENDERER, &cell, Some(Point::new(80.0, 20.0)));
        assert_eq!(h.surface.texts(), vec!["!"]);
    }

    #[test]
    fn test_empty_series_draws_nothing() {
        let mut h = Harness::new(100.0, 32.0);
        h.draw(&RENDERER, &chart(ChartType::Line, &[]), None);
        assert!(h.surface.ops().is_empty());
    }

    #[test]
    fn test_accessibility() {
        assert_eq!(
            RENDERER.accessibility_string(&chart(ChartType::Line, &[1.0, 2.5])).as_deref(),
            Some("line chart: 1, 2.5")
        );
    }
}
