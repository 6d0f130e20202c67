//! Error types for renderer dispatch and edit sessions.

use koshi_types::{CellKind, CellLocation, EditSessionId};
use thiserror::Error;

/// Errors from the grid core.
///
/// `UnknownCellKind` and the registration errors are programming errors: the
/// built-in registry covers every kind, so seeing one at runtime means a
/// custom registry was assembled wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// No renderer registered for this kind.
    #[error("no renderer registered for cell kind {0}")]
    UnknownCellKind(CellKind),

    /// A renderer is already registered for this kind.
    #[error("renderer for cell kind {0} is already registered")]
    DuplicateRenderer(CellKind),

    /// Renderer registered under a key that isn't its own kind.
    #[error("renderer for {renderer} registered under {key}")]
    RendererKindMismatch { key: CellKind, renderer: CellKind },

    /// Edit requested on a cell that can't be edited.
    #[error("cell {location} ({kind}) is not editable")]
    NotEditable { location: CellLocation, kind: CellKind },

    /// Edit-session transition not allowed from the current state.
    #[error("cannot {action} while {state}")]
    InvalidEditTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Operation addressed to a session that is no longer current.
    #[error("edit session {0:?} is not the current session")]
    StaleEditSession(EditSessionId),

    /// Committed value has a different kind than the cell being edited.
    #[error("commit of a {got} value into a {expected} cell")]
    CommitKindMismatch { expected: CellKind, got: CellKind },
}

/// Errors loading a theme script.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("theme script error: {0}")]
    Script(String),
}
