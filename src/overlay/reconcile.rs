//! Pure marker reconciliation.

use codemate_common::Collaborator;

use super::{Marker, MarkerOp, MarkerSet};

/// Reconcile the previous marker set against a roster snapshot.
///
/// Returns the next marker set and the operations that take the display
/// from `prev` to it:
/// - collaborators with a cursor and no marker yield `Create`
/// - existing markers whose position, color, or label changed yield
///   `Update` (unchanged markers yield nothing)
/// - markers whose identifier is absent from the snapshot (or whose
///   collaborator no longer has a cursor) yield `Remove`
///
/// Each invocation reconciles fully from the snapshot; there is no
/// dependency on intermediate updates beyond last-write-wins per
/// identifier. Runs in time proportional to `prev.len() + roster.len()`
/// — marker lookup is by identifier-keyed map, never a scan.
pub fn reconcile(prev: &MarkerSet, roster: &[Collaborator]) -> (MarkerSet, Vec<MarkerOp>) {
    let mut next = MarkerSet::with_capacity(roster.len());
    let mut ops: Vec<MarkerOp> = Vec::new();

    for collab in roster {
        let Some(cursor) = collab.cursor else {
            continue;
        };
        let marker = Marker::for_collaborator(collab, cursor);

        // A repeated identifier in one snapshot means the later entry
        // wins; drop the earlier entry's operation before re-deciding.
        if next.contains_key(&collab.id) {
            ops.retain(|op| op.collaborator_id() != collab.id);
        }

        match prev.get(&collab.id) {
            None => ops.push(MarkerOp::Create(marker.clone())),
            Some(existing) if *existing != marker => ops.push(MarkerOp::Update(marker.clone())),
            Some(_) => {}
        }
        next.insert(collab.id.clone(), marker);
    }

    let mut departed: Vec<&String> = prev.keys().filter(|id| !next.contains_key(*id)).collect();
    departed.sort();
    ops.extend(departed.into_iter().map(|id| MarkerOp::Remove(id.clone())));

    (next, ops)
}
