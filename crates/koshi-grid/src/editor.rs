//! Editor provisioning and the edit-session state machine.
//!
//! Editors are never kept alive between cells. The grid holds one
//! [`EditController`] whose state moves through
//!
//! ```text
//! Idle ──begin──▶ Editing ──commit──▶ Committing ──finish──▶ Idle
//!                    │                                     ▲
//!                    └────cancel──▶ Cancelling ──finish────┘
//! ```
//!
//! `provide_editor` is queried exactly once per session, on the
//! Idle → Editing transition. The returned [`EditorDescriptor`] tells the
//! surrounding UI what to mount and where; unmounting happens when `finish`
//! hands back the [`EditOutcome`].

use koshi_types::{Cell, CellKind, CellLocation, CustomEditor, EditSessionId, EditorPosition};
use tracing::debug;

use crate::error::GridError;
use crate::registry::RendererRegistry;

/// Which editor component to mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorKind {
    Text,
    Number,
    Select,
    Custom(CustomEditor),
}

impl EditorKind {
    /// The grid's built-in editor for a kind, if it has one.
    ///
    /// Booleans toggle in place, and images and charts need an
    /// application-supplied custom editor.
    pub fn default_for(kind: CellKind) -> Option<Self> {
        match kind {
            CellKind::Text | CellKind::Link => Some(EditorKind::Text),
            CellKind::Number | CellKind::Rating => Some(EditorKind::Number),
            CellKind::Select => Some(EditorKind::Select),
            CellKind::Image | CellKind::Chart | CellKind::Boolean | CellKind::Loading => None,
        }
    }
}

/// Description of the editing UI for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorDescriptor {
    pub editor: EditorKind,
    pub position: EditorPosition,
}

impl EditorDescriptor {
    /// The custom editor a cell asks for, if any.
    pub fn custom_for(cell: &Cell) -> Option<Self> {
        let attrs = cell.editable()?;
        let custom = attrs.custom_editor.clone()?;
        Some(Self {
            editor: EditorKind::Custom(custom),
            position: attrs.editor_position.unwrap_or_default(),
        })
    }

    /// The built-in editor for a cell, honoring its requested position.
    pub fn builtin_for(cell: &Cell) -> Option<Self> {
        let editor = EditorKind::default_for(cell.kind())?;
        let position = cell
            .editable()
            .and_then(|a| a.editor_position)
            .unwrap_or_default();
        Some(Self { editor, position })
    }
}

/// One open edit session.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub id: EditSessionId,
    pub location: CellLocation,
    pub editor: EditorDescriptor,
    /// The cell as it was when editing began.
    pub original: Cell,
}

/// Current edit state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
    Committing { session: EditSession, value: Cell },
    Cancelling(EditSession),
}

impl EditState {
    fn name(&self) -> &'static str {
        match self {
            EditState::Idle => "idle",
            EditState::Editing(_) => "editing",
            EditState::Committing { .. } => "committing",
            EditState::Cancelling(_) => "cancelling",
        }
    }

    fn session(&self) -> Option<&EditSession> {
        match self {
            EditState::Idle => None,
            EditState::Editing(s) | EditState::Cancelling(s) => Some(s),
            EditState::Committing { session, .. } => Some(session),
        }
    }
}

/// How a finished session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    Committed { session: EditSession, value: Cell },
    Cancelled { session: EditSession },
}

/// Owner of the grid's single edit session.
#[derive(Debug, Default)]
pub struct EditController {
    state: EditState,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, EditState::Idle)
    }

    /// The open session, in any non-idle state.
    pub fn session(&self) -> Option<&EditSession> {
        self.state.session()
    }

    /// Check if `location` is the cell currently being edited.
    pub fn is_editing(&self, location: CellLocation) -> bool {
        matches!(&self.state, EditState::Editing(s) if s.location == location)
    }

    /// Idle → Editing. Queries the cell's renderer for an editor.
    pub fn begin(
        &mut self,
        registry: &RendererRegistry,
        location: CellLocation,
        cell: &Cell,
    ) -> Result<EditSession, GridError> {
        if !self.is_idle() {
            return Err(GridError::InvalidEditTransition {
                action: "begin editing",
                state: self.state.name(),
            });
        }
        let not_editable = || GridError::NotEditable {
            location,
            kind: cell.kind(),
        };
        if !cell.is_editable() {
            return Err(not_editable());
        }

        let renderer = registry.resolve(cell.kind())?;
        let editor = renderer
            .editor_for(cell)
            .or_else(|| EditorDescriptor::builtin_for(cell))
            .ok_or_else(not_editable)?;

        let session = EditSession {
            id: EditSessionId::new(),
            location,
            editor,
            original: cell.clone(),
        };
        debug!(session = ?session.id, %location, editor = ?session.editor.editor, "edit session started");
        self.state = EditState::Editing(session.clone());
        Ok(session)
    }

    /// Editing → Committing with the edited value.
    pub fn commit(&mut self, id: EditSessionId, value: Cell) -> Result<(), GridError> {
        let session = self.take_editing(id, "commit")?;
        if value.kind() != session.original.kind() {
            let err = GridError::CommitKindMismatch {
                expected: session.original.kind(),
                got: value.kind(),
            };
            self.state = EditState::Editing(session);
            return Err(err);
        }
        debug!(session = ?id, "edit session committing");
        self.state = EditState::Committing { session, value };
        Ok(())
    }

    /// Editing → Cancelling.
    pub fn cancel(&mut self, id: EditSessionId) -> Result<(), GridError> {
        let session = self.take_editing(id, "cancel")?;
        debug!(session = ?id, "edit session cancelling");
        self.state = EditState::Cancelling(session);
        Ok(())
    }

    /// Committing/Cancelling → Idle. The editor is unmounted by the caller.
    pub fn finish(&mut self, id: EditSessionId) -> Result<EditOutcome, GridError> {
        self.check_current(id)?;
        let outcome = match std::mem::take(&mut self.state) {
            EditState::Committing { session, value } => EditOutcome::Committed { session, value },
            EditState::Cancelling(session) => EditOutcome::Cancelled { session },
            other => {
                let state = other.name();
                self.state = other;
                return Err(GridError::InvalidEditTransition {
                    action: "finish",
                    state,
                });
            }
        };
        debug!(session = ?id, "edit session finished");
        Ok(outcome)
    }

    fn check_current(&self, id: EditSessionId) -> Result<(), GridError> {
        match self.state.session() {
            Some(s) if s.id == id => Ok(()),
            Some(_) => Err(GridError::StaleEditSession(id)),
            None => Err(GridError::InvalidEditTransition {
                action: "finish",
                state: "idle",
            }),
        }
    }

    fn take_editing(
        &mut self,
        id: EditSessionId,
        action: &'static str,
    ) -> Result<EditSession, GridError> {
        match std::mem::take(&mut self.state) {
            EditState::Editing(session) if session.id == id => Ok(session),
            EditState::Editing(session) => {
                self.state = EditState::Editing(session);
                Err(GridError::StaleEditSession(id))
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(GridError::InvalidEditTransition { action, state })
            }
        }
    }
}
