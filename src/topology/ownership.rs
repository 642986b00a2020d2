//! Ownership metadata for patch cells.
//!
//! [`CellOwnership`] records, per cell, the rank that owns it and whether the
//! cell is a ghost on the current rank. Entries are stored densely by
//! [`EntityId::index`], so lookups are a bounds check away.

use crate::mesh_error::MeshError;
use crate::topology::id::EntityId;
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OwnershipEntry {
    pub owner: usize,
    pub is_ghost: bool,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CellOwnership {
    entries: Vec<Option<OwnershipEntry>>,
}

impl CellOwnership {
    /// Number of tracked slots (including empty ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Insert or update the entry of `cell`.
    pub fn set(&mut self, cell: EntityId, owner: usize, is_ghost: bool) {
        let idx = cell.index();
        if idx >= self.entries.len() {
            self.entries.resize(idx + 1, None);
        }
        self.entries[idx] = Some(OwnershipEntry { owner, is_ghost });
    }

    /// Insert or update the entry of `cell`, deriving ghostness from `my_rank`.
    pub fn set_from_owner(&mut self, cell: EntityId, owner: usize, my_rank: usize) {
        self.set(cell, owner, owner != my_rank);
    }

    /// Forget the entry of `cell`.
    pub fn unset(&mut self, cell: EntityId) -> Option<OwnershipEntry> {
        self.entries.get_mut(cell.index()).and_then(Option::take)
    }

    pub fn entry(&self, cell: EntityId) -> Option<OwnershipEntry> {
        self.entries.get(cell.index()).copied().flatten()
    }

    pub fn owner(&self, cell: EntityId) -> Option<usize> {
        self.entry(cell).map(|e| e.owner)
    }

    /// Owning rank, or an error when the cell is not tracked.
    pub fn owner_or_err(&self, cell: EntityId) -> Result<usize, MeshError> {
        self.owner(cell).ok_or(MeshError::MissingCell(cell))
    }

    pub fn is_ghost(&self, cell: EntityId) -> Option<bool> {
        self.entry(cell).map(|e| e.is_ghost)
    }

    /// Iterate ghost cells in id order.
    pub fn ghost_cells(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, entry)| {
            entry
                .filter(|e| e.is_ghost)
                .map(|_| EntityId::from_index(idx))
        })
    }

    /// Drop every ghost entry, keeping the owned ones.
    pub fn clear_ghosts(&mut self) {
        for entry in &mut self.entries {
            if entry.is_some_and(|e| e.is_ghost) {
                *entry = None;
            }
        }
        while matches!(self.entries.last(), Some(None)) {
            self.entries.pop();
        }
    }

    /// Ghost cells grouped by owning rank, each group in id order.
    pub fn ghosts_by_rank(&self) -> BTreeMap<usize, Vec<EntityId>> {
        let mut out: BTreeMap<usize, Vec<EntityId>> = BTreeMap::new();
        for cell in self.ghost_cells() {
            if let Some(owner) = self.owner(cell) {
                out.entry(owner).or_default().push(cell);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn ghosts_are_grouped_by_owner() {
        let mut own = CellOwnership::default();
        own.set_from_owner(id(1), 0, 0);
        own.set_from_owner(id(4), 2, 0);
        own.set_from_owner(id(3), 1, 0);
        own.set_from_owner(id(2), 2, 0);
        let groups = own.ghosts_by_rank();
        assert_eq!(groups[&1], vec![id(3)]);
        assert_eq!(groups[&2], vec![id(2), id(4)]);
        assert_eq!(own.is_ghost(id(1)), Some(false));
    }

    #[test]
    fn clear_ghosts_keeps_owned() {
        let mut own = CellOwnership::default();
        own.set(id(1), 0, false);
        own.set(id(5), 1, true);
        own.clear_ghosts();
        assert_eq!(own.len(), 1);
        assert_eq!(own.owner(id(1)), Some(0));
        assert_eq!(own.owner_or_err(id(5)), Err(MeshError::MissingCell(id(5))));
    }
}
