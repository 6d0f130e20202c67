//! Cell model for the koshi canvas grid.
//!
//! This crate is the data foundation of the grid: the [`Cell`] tagged union,
//! its per-kind payloads, and the identifiers the grid uses to address cells
//! and edit sessions. It has **no internal koshi dependencies** and knows
//! nothing about drawing. Renderers live in `koshi-grid`.
//!
//! # Overview
//!
//! ```text
//! Cell (one of nine kinds, tag = CellKind)
//!     └── CellCommon      readonly, cursor, alignment, last_updated, theme override
//!     └── EditableAttrs   custom editor, editor position, edit-on-click   (not Loading)
//!     └── data            raw value, shape depends on the kind
//!     └── display_data    renderer-ready text, formatted upstream
//! ```
//!
//! # Key Types
//!
//! |--------------------|---------------------------------------------|
//! | Type               | Purpose                                     |
//! |--------------------|---------------------------------------------|
//! | [`Cell`]           | One grid cell, tagged by kind               |
//! | [`CellKind`]       | The discriminating tag                      |
//! | [`CellLocation`]   | Row/column address of a cell                |
//! | [`EditSessionId`]  | Identity of one edit session (UUIDv7)       |
//! | [`CellCallback`]   | Callback property reporting interactions    |
//! | [`ThemeOverride`]  | Per-cell partial theme                      |
//! | [`CellDataError`]  | Data present but malformed for its kind     |
//! |--------------------|---------------------------------------------|

pub mod callback;
pub mod cell;
pub mod content;
pub mod error;
pub mod ids;
pub mod theme;

// Re-export primary types at crate root for convenience.
pub use callback::CellCallback;
pub use cell::{
    BooleanCell, Cell, CellCommon, CellKind, ChartCell, EditableAttrs, ImageCell, LinkCell,
    LoadingCell, MAX_RATING_SCALE, NumberCell, RatingCell, SelectCell, TextCell,
};
pub use content::{
    ChartType, ContentAlign, CursorHint, CustomEditor, EditorPosition, ImageData,
    NumberDisplayType, NumberShowAs, SelectChoice,
};
pub use error::CellDataError;
pub use ids::{CellLocation, EditSessionId};
pub use theme::ThemeOverride;

/// Current time as Unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
