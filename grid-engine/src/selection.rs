//! FILENAME: grid-engine/src/selection.rs
//! Tri-state selection set.
//!
//! One selection set per page view, owned by the page and passed into the
//! engine's queries explicitly. The set never inspects record content,
//! only ids, so a selection can outlive a refetch; stale ids are inert
//! until `retain_known` prunes them.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use inventory_model::RecordId;

/// Membership summary for a set of ids relative to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriState {
    /// Every id in the group is selected.
    All,
    /// At least one id is selected, at least one is not.
    Some,
    /// No id in the group is selected.
    None,
}

/// Mutable membership set over record identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: FxHashSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet::default()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    /// Toggles a single leaf row.
    pub fn toggle_leaf(&mut self, id: RecordId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Tri-state query over an arbitrary id subset. An empty subset reads
    /// as `None`: a vacuous group has no selected descendant.
    pub fn query(&self, ids: &[RecordId]) -> TriState {
        if ids.is_empty() {
            return TriState::None;
        }
        let selected = ids.iter().filter(|id| self.ids.contains(id)).count();
        if selected == ids.len() {
            TriState::All
        } else if selected == 0 {
            TriState::None
        } else {
            TriState::Some
        }
    }

    /// Group toggle: selects every id unless the group is already fully
    /// selected, in which case it deselects every id. Always atomic over
    /// the whole subset, never a single leaf.
    pub fn toggle_group(&mut self, ids: &[RecordId]) {
        match self.query(ids) {
            TriState::All => {
                for id in ids {
                    self.ids.remove(id);
                }
            }
            TriState::Some | TriState::None => {
                for id in ids {
                    self.ids.insert(id.clone());
                }
            }
        }
    }

    /// Replaces the selection with exactly the given ids.
    pub fn select_all(&mut self, ids: &[RecordId]) {
        self.ids = ids.iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that are no longer part of the current record set. Called
    /// by pages after a refetch so stale selections cannot leak into
    /// exports.
    pub fn retain_known(&mut self, known: &[RecordId]) {
        let known: FxHashSet<&RecordId> = known.iter().collect();
        self.ids.retain(|id| known.contains(id));
    }
}
