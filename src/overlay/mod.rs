//! Live cursor overlay engine.
//!
//! Projects a roster of remote collaborators' cursor positions onto a
//! host editing surface as positioned, colored, labeled markers. The
//! engine owns no cursor data — the collaboration service publishes the
//! roster, the engine reconciles markers against it.
//!
//! The reconciliation algorithm is a pure function
//! ([`reconcile::reconcile`]) from the previous marker set and a roster
//! snapshot to the next marker set plus the create/update/remove
//! operations that take the display there. The rendering side effect
//! lives behind the [`Surface`] adapter, which keeps the algorithm
//! testable without any rendering stack.

pub mod reconcile;
pub mod surface;

use std::collections::HashMap;

use codemate_common::{Collaborator, CursorPos};
use serde::{Deserialize, Serialize};

pub use reconcile::reconcile;
pub use surface::{Overlay, Surface};

/// Height of one text row on the host surface, in pixels.
pub const ROW_HEIGHT_PX: u32 = 20;
/// Width of one glyph cell on the host surface, in pixels.
pub const GLYPH_WIDTH_PX: u32 = 8;

/// A marker's screen position on the host surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: u32,
    pub y: u32,
}

impl ScreenPos {
    /// Fixed cell-size transform from a document position.
    pub fn from_cursor(cursor: CursorPos) -> Self {
        Self {
            x: cursor.column.saturating_mul(GLYPH_WIDTH_PX),
            y: cursor.line.saturating_mul(ROW_HEIGHT_PX),
        }
    }
}

/// The visual representation of one collaborator's cursor.
///
/// Exactly one marker exists per collaborator with a live cursor, keyed
/// by collaborator identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub collaborator_id: String,
    /// Display name shown on the attached label.
    pub label: String,
    pub color: String,
    pub position: ScreenPos,
}

impl Marker {
    /// Derive the marker for a collaborator's current cursor.
    pub fn for_collaborator(collab: &Collaborator, cursor: CursorPos) -> Self {
        Self {
            collaborator_id: collab.id.clone(),
            label: collab.name.clone(),
            color: collab.color.clone(),
            position: ScreenPos::from_cursor(cursor),
        }
    }
}

/// Markers currently on the surface, keyed by collaborator identifier.
pub type MarkerSet = HashMap<String, Marker>;

/// One rendering operation produced by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOp {
    Create(Marker),
    /// Position, color, or label changed; the marker element stays.
    Update(Marker),
    Remove(String),
}

impl MarkerOp {
    /// Identifier of the collaborator this operation concerns.
    pub fn collaborator_id(&self) -> &str {
        match self {
            Self::Create(m) | Self::Update(m) => &m.collaborator_id,
            Self::Remove(id) => id,
        }
    }
}
