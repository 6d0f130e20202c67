//! Integration tests for the cell rendering contract.
//!
//! # Tiers
//!
//! - **Tier 0:** Dispatch: every kind resolves and draws through the grid
//! - **Tier 1:** Purity: draw leaves the cell and theme alone, measure is
//!   deterministic
//! - **Tier 2:** Interaction: `on_click` never fires outside
//!   `check_within_bound`, across a dense grid of positions
//! - **Tier 3:** Per-kind behavior end to end: select chips, rating floor,
//!   number paste, empty images, JSON input

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use koshi_grid::{
    DrawOp, GridCanvas, GridTheme, MeasureContext, MonospaceMetrics, PlacedCell, RecordingSurface,
    builtin_registry,
};
use koshi_types::{
    BooleanCell, Cell, CellCallback, CellKind, CellLocation, ChartCell, ChartType, ImageCell,
    ImageData, LinkCell, NumberCell, NumberDisplayType, NumberShowAs, RatingCell, SelectCell,
    SelectChoice, TextCell,
};
use kurbo::{Point, Rect, Size};
use strum::IntoEnumIterator;

// ============================================================================
// Shared test setup
// ============================================================================

/// A representative, well-formed cell of each kind.
fn sample(kind: CellKind) -> Cell {
    match kind {
        CellKind::Text => Cell::Text(TextCell {
            data: "hello world".into(),
            display_data: "hello world".into(),
            is_wrap: true,
            ..Default::default()
        }),
        CellKind::Link => Cell::Link(LinkCell {
            data: vec!["a.example".into(), "b.example".into()],
            display_data: "a.example, b.example".into(),
            ..Default::default()
        }),
        CellKind::Number => Cell::Number(NumberCell {
            data: Some(40.0),
            display_data: "40".into(),
            show_as: Some(NumberShowAs {
                display_type: NumberDisplayType::Bar,
                color: "#9ece6a".into(),
                max_value: 100.0,
                show_value: true,
            }),
            ..Default::default()
        }),
        CellKind::Select => Cell::Select(SelectCell {
            data: vec!["todo".into(), "p1".into()],
            choices: vec![
                SelectChoice::new("todo", "To do"),
                SelectChoice::new("p1", "Priority 1"),
            ],
            is_multiple: true,
            ..Default::default()
        }),
        CellKind::Image => Cell::Image(ImageCell {
            data: vec![ImageData::new("i1", "https://img.example/1.png")],
            display_data: vec!["1.png".into()],
            ..Default::default()
        }),
        CellKind::Chart => Cell::Chart(ChartCell {
            data: vec![1.0, 3.0, 2.0],
            display_data: vec!["1".into(), "3".into(), "2".into()],
            chart_type: Some(ChartType::Line),
            ..Default::default()
        }),
        CellKind::Rating => Cell::Rating(RatingCell {
            data: 3.0,
            display_data: "3".into(),
            icon: "star".into(),
            color: "#e0af68".into(),
            max: 5,
            ..Default::default()
        }),
        CellKind::Boolean => Cell::Boolean(BooleanCell {
            data: true,
            display_data: "true".into(),
            ..Default::default()
        }),
        CellKind::Loading => Cell::loading(),
    }
}

fn cell_rect(row: usize) -> Rect {
    let y = row as f64 * 40.0;
    Rect::new(0.0, y, 160.0, y + 40.0)
}

fn placed_samples() -> Vec<PlacedCell> {
    CellKind::iter()
        .enumerate()
        .map(|(row, kind)| PlacedCell::new(CellLocation::new(row, 0), cell_rect(row), sample(kind)))
        .collect()
}

// ============================================================================
// Tier 0: dispatch
// ============================================================================

#[test]
fn every_kind_resolves_to_its_own_renderer() {
    let registry = builtin_registry();
    for kind in CellKind::iter() {
        let renderer = registry.resolve(kind).expect("builtin covers every kind");
        assert_eq!(renderer.kind, kind);
    }
}

#[test]
fn every_kind_draws_without_errors() {
    let canvas = GridCanvas::default();
    let mut surface = RecordingSurface::new();
    let stats = canvas.paint_frame_at(&mut surface, &placed_samples(), 0);
    assert_eq!(stats.cells, 9);
    assert_eq!(stats.errors, 0);
    assert_eq!(surface.depth(), 0, "save/restore must balance");
    assert!(!surface.texts().contains(&"!"), "no error glyphs for well-formed cells");
}

// ============================================================================
// Tier 1: purity
// ============================================================================

#[test]
fn draw_leaves_cells_and_theme_unchanged() {
    let mut canvas = GridCanvas::default();
    canvas.set_active(Some(CellLocation::new(3, 0)));
    let cells = placed_samples();
    let before = cells.clone();
    let theme_before = canvas.theme().clone();

    let mut surface = RecordingSurface::new();
    canvas.paint_frame_at(&mut surface, &cells, 0);
    canvas.paint_frame_at(&mut surface, &cells, 0);

    assert_eq!(cells, before);
    assert_eq!(canvas.theme(), &theme_before);
}

#[test]
fn repeated_frames_paint_identically() {
    let canvas = GridCanvas::default();
    let cells = placed_samples();
    let mut first = RecordingSurface::new();
    let mut second = RecordingSurface::new();
    canvas.paint_frame_at(&mut first, &cells, 0);
    canvas.paint_frame_at(&mut second, &cells, 0);
    assert_eq!(first.ops(), second.ops());
}

#[test]
fn measure_is_deterministic_and_non_negative() {
    let registry = builtin_registry();
    let theme = GridTheme::default();
    for kind in CellKind::iter() {
        let cell = sample(kind);
        let renderer = registry.resolve(kind).unwrap();
        for width in [0.0, 1.0, 37.5, 120.0, 800.0] {
            let ctx = MeasureContext {
                metrics: &MonospaceMetrics,
                theme: &theme,
                width,
            };
            let a = renderer.measure_height(&cell, &ctx);
            let b = renderer.measure_height(&cell, &ctx);
            assert_eq!(a, b, "{kind} at width {width}");
            if let Some(h) = a {
                assert!(h >= 0.0, "{kind} measured {h} at width {width}");
            }
        }
    }
}

// ============================================================================
// Tier 2: click gating
// ============================================================================

fn counting_link(hits: Arc<AtomicUsize>) -> Cell {
    Cell::Link(LinkCell {
        data: vec!["one.example".into(), "two.example".into()],
        display_data: "one.example, two.example".into(),
        on_click: Some(CellCallback::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })),
        ..Default::default()
    })
}

fn counting_checkbox(hits: Arc<AtomicUsize>) -> Cell {
    Cell::Boolean(BooleanCell {
        data: false,
        on_toggle: Some(CellCallback::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })),
        ..Default::default()
    })
}

#[test]
fn on_click_never_fires_outside_bounds() {
    let registry = builtin_registry();
    let theme = GridTheme::default();
    let size = Size::new(200.0, 32.0);

    for make in [counting_link as fn(Arc<AtomicUsize>) -> Cell, counting_checkbox] {
        let hits = Arc::new(AtomicUsize::new(0));
        let cell = make(hits.clone());
        let renderer = registry.resolve(cell.kind()).unwrap();
        let mut inside = 0;

        for xi in 0..=40 {
            for yi in 0..=8 {
                let position = Point::new(xi as f64 * 5.0, yi as f64 * 4.0);
                let ctx = koshi_grid::ClickContext {
                    width: size.width,
                    height: size.height,
                    position,
                    theme: &theme,
                    metrics: &MonospaceMetrics,
                };
                let before = hits.load(Ordering::SeqCst);
                let within = renderer.is_within_bound(&cell, &ctx);
                renderer.click(&cell, &ctx);
                let fired = hits.load(Ordering::SeqCst) > before;
                assert_eq!(fired, within, "{} at {position:?}", cell.kind());
                inside += usize::from(within);
            }
        }
        assert!(inside > 0, "{} has a clickable region", cell.kind());
    }
}

#[test]
fn grid_click_outside_link_only_selects() {
    let hits = Arc::new(AtomicUsize::new(0));
    let cell = counting_link(hits.clone());
    let mut canvas = GridCanvas::default();
    let (outcome, session) = canvas
        .click(
            &MonospaceMetrics,
            CellLocation::new(0, 0),
            &cell,
            Size::new(200.0, 32.0),
            Point::new(190.0, 2.0),
        )
        .unwrap();
    assert_eq!(outcome, koshi_grid::ClickOutcome::Selected);
    assert!(session.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Tier 3: per-kind behavior
// ============================================================================

#[test]
fn select_chips_come_from_choices_without_display_data() {
    let canvas = GridCanvas::default();
    let cell = Cell::Select(SelectCell {
        data: vec!["a".into(), "b".into()],
        choices: vec![SelectChoice::new("a", "Alpha"), SelectChoice::new("b", "Beta")],
        display_data: None,
        is_multiple: true,
        ..Default::default()
    });
    let mut surface = RecordingSurface::new();
    canvas.paint_frame_at(&mut surface, &[PlacedCell::new(CellLocation::new(0, 0), cell_rect(0), cell)], 0);
    assert_eq!(surface.texts(), vec!["Alpha", "Beta"]);
    let chips = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::FillRoundedRect { .. }))
        .count();
    assert_eq!(chips, 2);
}

#[test]
fn rating_measures_floor_at_zero_width() {
    let canvas = GridCanvas::default();
    let theme = canvas.theme();
    let floor = theme.icon_size.max(theme.line_height) + 2.0 * theme.cell_vertical_padding;
    let height = canvas.measure_cell(&MonospaceMetrics, &sample(CellKind::Rating), 0.0);
    assert_eq!(height, Some(floor));
}

#[test]
fn number_paste_parses_or_rejects() {
    let canvas = GridCanvas::default();
    let cell = Cell::number(None, "");
    let pasted = canvas.paste("42", &cell).expect("42 is a number");
    let Cell::Number(n) = pasted else {
        panic!("paste changed the kind");
    };
    assert_eq!(n.data, Some(42.0));
    assert_eq!(canvas.paste("abc", &cell), None);
}

#[test]
fn empty_image_draws_placeholder_at_default_height() {
    let canvas = GridCanvas::default();
    let empty = Cell::Image(ImageCell::default());

    let mut surface = RecordingSurface::new();
    let stats = canvas.paint_frame_at(
        &mut surface,
        &[PlacedCell::new(CellLocation::new(0, 0), cell_rect(0), empty.clone())],
        0,
    );
    assert_eq!(stats.errors, 0);
    assert_eq!(surface.sprites(), vec!["image"]);
    assert!(canvas.take_image_requests().is_empty());

    let height = canvas.measure_cell(&MonospaceMetrics, &empty, 160.0);
    assert_eq!(height, Some(canvas.theme().image_cell_height));
}

#[test]
fn image_loads_complete_between_frames() {
    let canvas = GridCanvas::default();
    let cells = vec![PlacedCell::new(CellLocation::new(0, 0), cell_rect(0), sample(CellKind::Image))];
    let mut surface = RecordingSurface::new();

    let first = canvas.paint_frame_at(&mut surface, &cells, 0);
    assert!(!first.images_changed);
    let requests = canvas.take_image_requests();
    assert_eq!(requests, vec!["https://img.example/1.png".to_string()]);

    let completer = canvas.images().completer();
    let url = requests[0].clone();
    std::thread::spawn(move || {
        completer.complete(
            url.clone(),
            Ok(koshi_grid::LoadedImage {
                url,
                width: 32,
                height: 32,
            }),
        )
    })
    .join()
    .unwrap();

    surface.clear();
    let second = canvas.paint_frame_at(&mut surface, &cells, 0);
    assert!(second.images_changed);
    assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::Image { .. })));
}

#[test]
fn cells_from_json_render() {
    let json = r##"[
        {"type": "Text", "data": "Ada", "displayData": "Ada"},
        {"type": "Number", "data": 3.5, "displayData": "3.50", "contentAlign": "right"},
        {"type": "Rating", "data": 4, "icon": "heart", "color": "#f7768e", "max": 5},
        {"type": "Loading"}
    ]"##;
    let cells: Vec<Cell> = serde_json::from_str(json).unwrap();
    let placed: Vec<PlacedCell> = cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| PlacedCell::new(CellLocation::new(row, 0), cell_rect(row), cell))
        .collect();

    let canvas = GridCanvas::default();
    let mut surface = RecordingSurface::new();
    let stats = canvas.paint_frame_at(&mut surface, &placed, 0);
    assert_eq!(stats.errors, 0);
    assert_eq!(surface.texts(), vec!["Ada", "3.50"]);
    assert_eq!(surface.sprites(), vec!["heart"; 5]);
}
