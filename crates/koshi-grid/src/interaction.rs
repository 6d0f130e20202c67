//! Click dispatch and pointer cursor resolution.
//!
//! A click first goes to the renderer's hit-test. Only when the position is
//! on an interactive sub-region does `on_click` run; otherwise the click
//! selects the cell, or opens its editor when the cell asks for
//! edit-on-click.

use koshi_types::{Cell, CursorHint};

use crate::context::ClickContext;
use crate::renderer::CellRenderer;

/// What a click on a cell resulted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The renderer handled it (a link opened, a checkbox toggled).
    Handled,
    /// The cell wants its editor opened.
    StartEdit,
    /// Plain selection.
    Selected,
}

pub fn dispatch_click(renderer: &CellRenderer, cell: &Cell, ctx: &ClickContext<'_>) -> ClickOutcome {
    if renderer.click(cell, ctx) {
        return ClickOutcome::Handled;
    }
    let edit_on_click = cell.editable().is_some_and(|a| a.edit_when_clicked);
    if edit_on_click && cell.is_editable() {
        ClickOutcome::StartEdit
    } else {
        ClickOutcome::Selected
    }
}

/// Cursor to show with the pointer at `ctx.position`.
///
/// Clickable sub-regions get a pointer; elsewhere the cell's own hint
/// applies.
pub fn cursor_at(renderer: &CellRenderer, cell: &Cell, ctx: &ClickContext<'_>) -> CursorHint {
    if renderer.on_click.is_some() && renderer.is_within_bound(cell, ctx) {
        return CursorHint::Pointer;
    }
    cell.common().cursor.unwrap_or_default()
}
