//! Identifiers for cells and edit sessions.
//!
//! Cells have no identity of their own (they are rebuilt every render pass),
//! so the grid addresses them by [`CellLocation`]. Edit sessions outlive a
//! single frame and get a time-ordered [`EditSessionId`] so a commit arriving
//! for a superseded session can be told apart from the current one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row/column address of a cell in the grid.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellLocation {
    pub row: usize,
    pub column: usize,
}

impl CellLocation {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.column)
    }
}

/// An edit session identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditSessionId(uuid::Uuid);

impl EditSessionId {
    /// Create a new time-ordered ID (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters, for human display only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for EditSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EditSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EditSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EditSessionId({})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = EditSessionId::new();
        let b = EditSessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_parse_roundtrip() {
        let id = EditSessionId::new();
        let parsed = EditSessionId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_session_id_debug_is_short() {
        let id = EditSessionId::new();
        let dbg = format!("{:?}", id);
        assert!(dbg.starts_with("EditSessionId("));
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_location_ordering_is_row_major() {
        let a = CellLocation::new(0, 5);
        let b = CellLocation::new(1, 0);
        assert!(a < b);
        assert_eq!(a.to_string(), "r0c5");
    }
}
