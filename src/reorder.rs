//! Reorder engine: single-item move plus dense reindex
//!
//! A drag relocates exactly one section (remove, reinsert at the target's
//! position), then the whole sequence is renumbered `0..n-1`. Every move
//! therefore produces a complete order document; fractional seed positions
//! disappear after the first reorder and never come back for that key.

use crate::overrides::OrderOverrides;
use crate::projection::ProjectedSection;

/// Relocate one element within the vector. `to` is the element's final index.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Apply a drag of `moved_key` onto `target_key` to the current ordered list.
///
/// Returns the complete replacement order document, or `None` when the drag
/// is a no-op (same key, or either key missing from the list).
pub fn reorder(
    current: &[ProjectedSection],
    moved_key: &str,
    target_key: &str,
) -> Option<OrderOverrides> {
    if moved_key == target_key {
        return None;
    }
    let from = current.iter().position(|s| s.key == moved_key)?;
    let to = current.iter().position(|s| s.key == target_key)?;
    reorder_by_index(current, from, to)
}

/// Index-based variant used by the drag-and-drop UI, which resolves drop
/// positions to indices itself. `to` is the moved section's final index.
pub fn reorder_by_index(
    current: &[ProjectedSection],
    from: usize,
    to: usize,
) -> Option<OrderOverrides> {
    if from == to || from >= current.len() || to >= current.len() {
        return None;
    }
    let mut keys: Vec<&str> = current.iter().map(|s| s.key).collect();
    array_move(&mut keys, from, to);
    Some(OrderOverrides::from_dense_sequence(keys))
}
