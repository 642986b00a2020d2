//! Bidirectional octant/cell index.
//!
//! [`OctantIndex`] keeps four hash maps: internal octant to cell, cell to
//! internal octant, ghost octant to cell and cell to ghost octant. Tree ids
//! are reassigned wholesale by every adapt or load balance, so the index is
//! rebuilt once per synchronization pass through [`OctantIndex::rebuild`];
//! outside a pass it is only read.

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::id::EntityId;
use crate::tree::OctantInfo;

/// A cell whose tree position changed without any content change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renumbering {
    pub cell: EntityId,
    pub tree_id: u32,
}

#[derive(Clone, Debug, Default)]
pub struct OctantIndex {
    octant_to_cell: HashMap<u32, EntityId>,
    cell_to_octant: HashMap<EntityId, u32>,
    ghost_to_cell: HashMap<u32, EntityId>,
    cell_to_ghost: HashMap<EntityId, u32>,
}

impl OctantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of internal entries.
    pub fn internal_count(&self) -> usize {
        self.octant_to_cell.len()
    }

    /// Number of ghost entries.
    pub fn ghost_count(&self) -> usize {
        self.ghost_to_cell.len()
    }

    /// Cell associated with an octant. A miss is not an error: the octant
    /// may not have been imported yet.
    pub fn resolve(&self, octant: OctantInfo) -> Option<EntityId> {
        let map = if octant.internal {
            &self.octant_to_cell
        } else {
            &self.ghost_to_cell
        };
        map.get(&octant.id).copied()
    }

    /// Octant associated with a cell, looked up in the half selected by the
    /// cell's interior flag. A miss means the index is corrupted.
    pub fn classify(&self, cell: EntityId, interior: bool) -> Result<OctantInfo, MeshError> {
        let map = if interior {
            &self.cell_to_octant
        } else {
            &self.cell_to_ghost
        };
        map.get(&cell)
            .map(|&id| OctantInfo {
                id,
                internal: interior,
            })
            .ok_or(MeshError::CellWithoutOctant(cell))
    }

    /// Internal cells in tree order.
    pub fn internal_cells(&self) -> Vec<(u32, EntityId)> {
        let mut cells: Vec<_> = self.octant_to_cell.iter().map(|(&o, &c)| (o, c)).collect();
        cells.sort_unstable();
        cells
    }

    /// Ghost cells in ghost tree order.
    pub fn ghost_cells(&self) -> Vec<(u32, EntityId)> {
        let mut cells: Vec<_> = self.ghost_to_cell.iter().map(|(&o, &c)| (o, c)).collect();
        cells.sort_unstable();
        cells
    }

    /// Rebuild the index after a tree mutation.
    ///
    /// Ghost maps are cleared, deleted internal cells are dropped, renumbered
    /// cells are moved (all stale entries are erased before any new one is
    /// inserted) and finally every added octant gets a cell id from
    /// `next_id`. Deletions and renumberings are applied before additions so
    /// a generated id can never collide with a cell that is still alive.
    ///
    /// Returns the ids assigned to `added`, in the same order.
    pub fn rebuild(
        &mut self,
        deleted: impl IntoIterator<Item = EntityId>,
        renumbered: &[Renumbering],
        added: &[OctantInfo],
        mut next_id: impl FnMut() -> EntityId,
    ) -> Vec<EntityId> {
        self.ghost_to_cell.clear();
        self.cell_to_ghost.clear();

        for cell in deleted {
            if let Some(octant) = self.cell_to_octant.remove(&cell) {
                if self.octant_to_cell.get(&octant) == Some(&cell) {
                    self.octant_to_cell.remove(&octant);
                }
            }
        }

        for r in renumbered {
            if let Some(previous) = self.cell_to_octant.get(&r.cell) {
                if self.octant_to_cell.get(previous) == Some(&r.cell) {
                    self.octant_to_cell.remove(previous);
                }
            }
        }
        for r in renumbered {
            self.cell_to_octant.insert(r.cell, r.tree_id);
            self.octant_to_cell.insert(r.tree_id, r.cell);
        }

        let mut assigned = Vec::with_capacity(added.len());
        for octant in added {
            let cell = next_id();
            self.insert(*octant, cell);
            assigned.push(cell);
        }
        assigned
    }

    fn insert(&mut self, octant: OctantInfo, cell: EntityId) {
        if octant.internal {
            self.octant_to_cell.insert(octant.id, cell);
            self.cell_to_octant.insert(cell, octant.id);
        } else {
            self.ghost_to_cell.insert(octant.id, cell);
            self.cell_to_ghost.insert(cell, octant.id);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl DebugInvariants for OctantIndex {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for (pair, forward, backward) in [
            ("internal", &self.octant_to_cell, &self.cell_to_octant),
            ("ghost", &self.ghost_to_cell, &self.cell_to_ghost),
        ] {
            if forward.len() != backward.len() {
                return Err(MeshError::InvariantViolation(format!(
                    "{pair} maps differ in size: {} octants, {} cells",
                    forward.len(),
                    backward.len()
                )));
            }
            for (octant, cell) in forward {
                if backward.get(cell) != Some(octant) {
                    return Err(MeshError::InvariantViolation(format!(
                        "{pair} octant {octant} maps to cell {cell} which does not map back"
                    )));
                }
            }
        }
        if let Some(cell) = self
            .cell_to_octant
            .keys()
            .find(|cell| self.cell_to_ghost.contains_key(*cell))
        {
            return Err(MeshError::InvariantViolation(format!(
                "cell {cell} is both internal and ghost"
            )));
        }
        Ok(())
    }
}
