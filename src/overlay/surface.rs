//! Overlay lifecycle and the rendering adapter seam.

use codemate_common::Collaborator;
use tracing::debug;

use super::{MarkerOp, MarkerSet, reconcile};

/// Rendering adapter the overlay drives.
///
/// Implementations own the visual layer: `mount_layer` establishes an
/// overlay exactly covering the host surface, transparent to pointer
/// input and stacked above normal content; `apply` realizes one marker
/// operation; `unmount_layer` removes the layer and everything on it.
/// The engine guarantees `apply` is only called between a mount and the
/// matching unmount.
pub trait Surface {
    fn mount_layer(&mut self);
    fn apply(&mut self, op: &MarkerOp);
    fn unmount_layer(&mut self);
}

/// Marker overlay bound to at most one host surface at a time.
///
/// `attach`/`detach` have scoped acquisition semantics: replacing the
/// surface or dropping the overlay releases the previous layer and all
/// markers, so repeated attach/detach cycles leak no visual state.
pub struct Overlay<S: Surface> {
    surface: Option<S>,
    markers: MarkerSet,
}

impl<S: Surface> Overlay<S> {
    pub fn new() -> Self {
        Self {
            surface: None,
            markers: MarkerSet::new(),
        }
    }

    /// Mount the overlay layer on `surface`.
    ///
    /// `None` is a silent no-op (nothing to anchor to). When a layer is
    /// already mounted, the old surface is released first — the layer is
    /// never duplicated.
    pub fn attach(&mut self, surface: Option<S>) {
        let Some(mut surface) = surface else {
            return;
        };
        self.detach();
        surface.mount_layer();
        self.surface = Some(surface);
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Markers currently tracked, keyed by collaborator identifier.
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Fully reconcile the display against a roster snapshot.
    ///
    /// Safe to call repeatedly and rapidly; each invocation reconciles
    /// from the snapshot alone, so no stale markers accumulate. Does
    /// nothing while detached.
    pub fn sync(&mut self, roster: &[Collaborator]) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let (next, ops) = reconcile(&self.markers, roster);
        if !ops.is_empty() {
            debug!(ops = ops.len(), markers = next.len(), "overlay sync");
        }
        for op in &ops {
            surface.apply(op);
        }
        self.markers = next;
    }

    /// Release the overlay layer and all markers.
    pub fn detach(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.unmount_layer();
        }
        self.markers.clear();
    }
}

impl<S: Surface> Default for Overlay<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> Drop for Overlay<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
