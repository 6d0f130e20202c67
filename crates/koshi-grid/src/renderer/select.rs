//! Select cells: one chip per selected value, wrapping onto extra rows.
//!
//! Chip labels and colors come from the cell's `choices`; `display_data` is
//! only used for accessibility fallback.

use koshi_types::{Cell, CellKind, EditorPosition, SelectCell};
use kurbo::{Point, Rect};

use super::{CellRenderer, content_box, first_hit, line_top, paint_kind_mismatch};
use crate::color::{parse_hex_or, with_alpha};
use crate::context::{MeasureContext, RenderContext};
use crate::editor::{EditorDescriptor, EditorKind};
use crate::surface::{FontSpec, TextMeasure};
use crate::text::truncate_to_width;
use crate::theme::GridTheme;

pub const RENDERER: CellRenderer = CellRenderer {
    kind: CellKind::Select,
    draw,
    needs_hover: true,
    needs_hover_position: true,
    measure: Some(measure),
    check_within_bound: None,
    on_click: None,
    provide_editor: Some(provide_editor),
    accessibility: Some(accessibility),
    on_paste: Some(paste),
};

#[derive(Debug, Clone, PartialEq)]
struct Chip {
    /// Index into `SelectCell::data`.
    value_index: usize,
    label: String,
    rect: Rect,
    row: usize,
}

/// Flow chips left to right, starting a new row when one doesn't fit.
///
/// A single row is vertically centered in `area`; multiple rows stack from
/// the top.
fn layout<M: TextMeasure + ?Sized>(
    metrics: &M,
    cell: &SelectCell,
    area: Rect,
    theme: &GridTheme,
    font: &FontSpec,
) -> Vec<Chip> {
    let max_label = (area.width() - 2.0 * theme.chip_padding).max(0.0);
    let mut chips = Vec::with_capacity(cell.data.len());
    let (mut x, mut row) = (area.x0, 0usize);

    for (value_index, label) in cell.labels().into_iter().enumerate() {
        let label = truncate_to_width(metrics, label, font, max_label);
        let width = (metrics.measure_text(&label, font).width + 2.0 * theme.chip_padding)
            .min(area.width());
        if x > area.x0 && x + width > area.x1 {
            row += 1;
            x = area.x0;
        }
        chips.push(Chip {
            value_index,
            label: label.into_owned(),
            rect: Rect::new(x, 0.0, x + width, theme.chip_height),
            row,
        });
        x += width + theme.chip_gap;
    }

    let top = if row == 0 {
        line_top(area, theme.chip_height)
    } else {
        area.y0
    };
    let pitch = theme.chip_height + theme.chip_gap;
    for chip in &mut chips {
        let y = top + chip.row as f64 * pitch;
        chip.rect.y0 = y;
        chip.rect.y1 = y + theme.chip_height;
    }
    chips
}

fn draw(cell: &Cell, ctx: &mut RenderContext<'_>) {
    let Cell::Select(select) = cell else {
        paint_kind_mismatch(ctx, CellKind::Select, cell);
        return;
    };
    let theme = ctx.theme;
    let area = content_box(ctx.rect, theme);
    let font = theme.chip_font();
    let chips = layout(&*ctx.surface, select, area, theme, &font);
    let rects: Vec<Rect> = chips.iter().map(|c| c.rect).collect();
    let hovered = ctx.hover_in_surface().and_then(|p| first_hit(&rects, p));

    ctx.surface.save();
    ctx.surface.clip(ctx.rect);
    for (i, chip) in chips.iter().enumerate() {
        if chip.rect.y0 >= ctx.rect.y1 {
            break;
        }
        let choice = select.choice_for(&select.data[chip.value_index]);
        let mut bg = parse_hex_or(choice.and_then(|c| c.bg_color.as_deref()), theme.chip_bg);
        let fg = parse_hex_or(choice.and_then(|c| c.text_color.as_deref()), theme.chip_text_color);
        if hovered == Some(i) {
            bg = with_alpha(bg, bg.alpha * 0.8);
        }
        ctx.surface.fill_rounded_rect(chip.rect, theme.chip_radius, bg);
        let text_y = chip.rect.y0 + (theme.chip_height - font.size) / 2.0;
        ctx.surface.fill_text(
            &chip.label,
            Point::new(chip.rect.x0 + theme.chip_padding, text_y),
            &font,
            fg,
        );
    }
    ctx.surface.restore();
}

fn measure(cell: &Cell, ctx: &MeasureContext<'_>) -> Option<f64> {
    let Cell::Select(select) = cell else { return None };
    if select.data.is_empty() {
        return None;
    }
    let theme = ctx.theme;
    let width = (ctx.width - 2.0 * theme.cell_horizontal_padding).max(0.0);
    let chips = layout(ctx.metrics, select, Rect::new(0.0, 0.0, width, 0.0), theme, &theme.chip_font());
    let rows = chips.last().map_or(1, |c| c.row + 1) as f64;
    Some(rows * theme.chip_height + (rows - 1.0) * theme.chip_gap + 2.0 * theme.cell_vertical_padding)
}

fn provide_editor(cell: &Cell) -> Option<EditorDescriptor> {
    let Cell::Select(select) = cell else { return None };
    // Multi-select pickers open as a dropdown list under the cell.
    let position = select
        .editable
        .editor_position
        .unwrap_or(if select.is_multiple { EditorPosition::Below } else { EditorPosition::Overlap });
    Some(EditorDescriptor {
        editor: EditorKind::Select,
        position,
    })
}

fn accessibility(cell: &Cell) -> Option<String> {
    let Cell::Select(select) = cell else { return None };
    let labels = select.labels();
    if labels.is_empty() {
        return None;
    }
    Some(labels.join(", "))
}

/// Map comma-separated tokens to choices. Any unknown token rejects the
/// paste, as does more than one token on a single-select cell.
fn paste(text: &str, cell: &Cell) -> Option<Cell> {
    let Cell::Select(current) = cell else { return None };
    let tokens: Vec<&str> = text.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.len() > 1 && !current.is_multiple {
        return None;
    }
    let data = tokens
        .into_iter()
        .map(|token| {
            current
                .choices
                .iter()
                .find(|c| c.matches(token))
                .map(|c| c.id.clone().unwrap_or_else(|| c.name.clone()))
        })
        .collect::<Option<Vec<String>>>()?;
    Some(Cell::Select(SelectCell {
        data,
        display_data: None,
        ..current.clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::Harness;
    use crate::surface::{DrawOp, MonospaceMetrics};
    use koshi_types::SelectChoice;

    fn select(values: &[&str], is_multiple: bool) -> Cell {
        Cell::Select(SelectCell {
            data: values.iter().map(|s| s.to_string()).collect(),
            choices: vec![
                SelectChoice::new("a", "Alpha"),
                SelectChoice {
                    bg_color: Some("#ff0000".into()),
                    ..SelectChoice::new("b", "Beta")
                },
                SelectChoice::new("c", "Gamma"),
            ],
            is_multiple,
            ..Default::default()
        })
    }

    #[test]
    fn test_chip_labels_come_from_choices() {
        let mut h = Harness::new(300.0, 32.0);
        h.draw(&RENDERER, &select(&["a", "b"], true), None);
        assert_eq!(h.surface.texts(), vec!["Alpha", "Beta"]);
        let chip_bgs: Vec<String> = h
            .surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRoundedRect { color, .. } => Some(crate::color::to_hex(*color)),
                _ => None,
            })
            .collect();
        assert_eq!(chip_bgs[1], "#ff0000ff");
    }

    #[test]
    fn test_chips_wrap_to_rows() {
        let theme = GridTheme::default();
        let font = theme.chip_font();
        let Cell::Select(cell) = select(&["a", "b", "c"], true) else { unreachable!() };
        // chip font 12px → 7.2/char; "Alpha" chip = 36 + 12 = 48 wide
        let chips = layout(&MonospaceMetrics, &cell, Rect::new(0.0, 0.0, 100.0, 100.0), &theme, &font);
        assert_eq!(chips.iter().map(|c| c.row).collect::<Vec<_>>(), vec![0, 0, 1]);
        assert_eq!(chips[2].rect.y0, 24.0);
    }

    #[test]
    fn test_measure_grows_with_rows() {
        let h = Harness::new(116.0, 32.0);
        assert_eq!(h.measure(&RENDERER, &select(&["a"], false)), Some(20.0 + 12.0));
        assert_eq!(h.measure(&RENDERER, &select(&["a", "b", "c"], true)), Some(44.0 + 12.0));
        assert_eq!(h.measure(&RENDERER, &select(&[], true)), None);
    }

    #[test]
    fn test_paste_maps_names_and_ids() {
        let cell = select(&[], true);
        let Some(Cell::Select(pasted)) = RENDERER.paste("Alpha, c", &cell) else {
            panic!("expected select");
        };
        assert_eq!(pasted.data, vec!["a", "c"]);
    }

    #[test]
    fn test_paste_rejects_unknown_or_too_many() {
        assert_eq!(RENDERER.paste("Alpha, Delta", &select(&[], true)), None);
        assert_eq!(RENDERER.paste("Alpha, Beta", &select(&[], false)), None);
        assert!(RENDERER.paste("Beta", &select(&[], false)).is_some());
    }

    #[test]
    fn test_editor_position_defaults() {
        let multi = RENDERER.editor_for(&select(&[], true)).unwrap();
        assert_eq!(multi.position, EditorPosition::Below);
        let single = RENDERER.editor_for(&select(&[], false)).unwrap();
        assert_eq!(single.position, EditorPosition::Overlap);
        assert_eq!(single.editor, EditorKind::Select);
    }

    #[test]
    fn test_accessibility_uses_labels() {
        assert_eq!(
            RENDERER.accessibility_string(&select(&["b", "c"], true)).as_deref(),
            Some("Beta, Gamma")
        );
    }
}
