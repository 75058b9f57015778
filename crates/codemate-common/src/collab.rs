//! Collaborator roster records.
//!
//! The collaboration-state service owns these; the overlay engine only
//! reads them. A collaborator may or may not have a live cursor — only
//! those with one get a marker.

use serde::{Deserialize, Serialize};

/// A cursor position in the shared document, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPos {
    pub line: u32,
    pub column: u32,
}

/// A remote participant in a shared editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    /// Unique identifier assigned by the collaboration service.
    pub id: String,
    /// Display name shown on the marker label.
    pub name: String,
    /// Display color (CSS color string, e.g. `"#ff0000"`).
    pub color: String,
    /// Live cursor position, absent when the collaborator has no cursor
    /// on this surface.
    #[serde(default)]
    pub cursor: Option<CursorPos>,
}
