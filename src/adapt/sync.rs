//! The synchronization pass.
//!
//! After the tree has been adapted or load balanced, one pass brings the mesh
//! back in line with the leaves:
//!
//! 1. every current leaf is classified ([`classify_leaf`]) and the octants
//!    to add, the cells to delete and the cells to renumber are collected;
//!    sent ranges and the whole previous ghost layer are scheduled too;
//! 2. the [`OctantIndex`](crate::topology::octant_index::OctantIndex) is
//!    rebuilt and the new cells get their ids;
//! 3. dead cells are removed, together with their interfaces and the
//!    vertices no surviving cell still uses;
//! 4. the added octants are imported, reusing the surviving vertices by node
//!    Morton key, then adjacencies and interfaces are rebuilt around them;
//! 5. the tracked records are finalized.
//!
//! A pass that fails leaves the patch in an unspecified state.

use std::collections::BTreeSet;
use std::ops::Range;

use hashbrown::{HashMap, HashSet};

use crate::adapt::classify::{LeafChange, LeafState, classify_leaf};
use crate::adapt::{AdaptionEntity, AdaptionInfo, AdaptionType, InfoCollection};
use crate::mesh_error::MeshError;
use crate::patch::OctreePatch;
use crate::topology::cell::Cell;
use crate::topology::id::EntityId;
use crate::topology::interface::{Interface, InterfaceSide};
use crate::topology::octant_index::Renumbering;
use crate::topology::vertex::Vertex;
use crate::tree::{self, OctantInfo, SpatialTree, TreeOperation};

/// A cell scheduled for deletion and the cause reported for it.
#[derive(Clone, Copy, Debug)]
struct Doomed {
    cell: EntityId,
    kind: AdaptionType,
    rank: usize,
}

/// Work collected while walking the leaves.
#[derive(Debug, Default)]
struct SyncPlan {
    added: Vec<OctantInfo>,
    renumbered: Vec<Renumbering>,
    deleted: Vec<Doomed>,
    /// Tracked batches: record handle and the slice of `added` it created.
    batches: Vec<(usize, Range<usize>)>,
    /// Cells already scheduled, to keep `deleted` free of repeats.
    scheduled: HashSet<EntityId>,
}

impl SyncPlan {
    fn delete(&mut self, cell: EntityId, kind: AdaptionType, rank: usize) {
        if self.scheduled.insert(cell) {
            self.deleted.push(Doomed { cell, kind, rank });
        }
    }
}

/// What the deletion step leaves behind for the import step.
#[derive(Debug, Default)]
struct Leftover {
    /// Node Morton key to surviving vertex.
    stitch: HashMap<u64, EntityId>,
    /// Surviving cells that lost a neighbour.
    dangling: BTreeSet<EntityId>,
}

impl<T: SpatialTree> OctreePatch<T> {
    /// Synchronize the mesh with the tree after `operation`.
    ///
    /// With `track` set, the returned records describe every cell created,
    /// deleted, refined, coarsened or migrated, and every interface created
    /// or deleted. Renumbered cells are not reported: they keep their id.
    pub fn sync_with(&mut self, operation: TreeOperation, track: bool) -> Result<Vec<AdaptionInfo>, MeshError> {
        log::info!("Synchronizing patch...");
        let import_all = self.cells.is_empty();
        if operation == TreeOperation::AdaptionUnmapped && !import_all {
            return Err(MeshError::UnmappedAdaption);
        }

        let rank = self.tree.rank();
        let n_octants = self.tree.octant_count();
        let n_ghosts = self.tree.ghost_count();
        let n_previous = self.index.internal_count();
        log::debug!(
            "{n_octants} octants, {n_ghosts} ghosts; previously {n_previous} internal and {} ghost cells",
            self.index.ghost_count()
        );

        let mut infos = InfoCollection::new();
        let mut plan = SyncPlan::default();
        let mut unmapped = self.plan_leaves(operation, import_all, track, &mut plan, &mut infos)?;
        self.plan_partition(operation, &mut plan, &mut unmapped)?;

        // previous octants no current leaf maps back to
        for (id, _) in unmapped.iter().enumerate().filter(|(_, flag)| **flag) {
            let cell = self.resolve_previous(OctantInfo::internal(id as u32))?;
            plan.delete(cell, AdaptionType::Deletion, rank);
        }

        for id in 0..n_ghosts as u32 {
            plan.added.push(OctantInfo::ghost(id));
        }

        log::debug!(
            "{} octants to import, {} cells to delete, {} to renumber",
            plan.added.len(),
            plan.deleted.len(),
            plan.renumbered.len()
        );

        let cells = &mut self.cells;
        let assigned = self.index.rebuild(
            plan.deleted.iter().map(|d| d.cell),
            &plan.renumbered,
            &plan.added,
            || cells.generate_id(),
        );

        if track && !plan.deleted.is_empty() {
            self.track_deletions(&plan.deleted, &mut infos)?;
        }

        log::info!("Deleting cells...");
        let doomed: Vec<EntityId> = plan.deleted.iter().map(|d| d.cell).collect();
        let mut leftover = self.delete_cells(&doomed)?;

        log::info!("Importing octants...");
        let mut created_interfaces = self.import_cells(&plan.added, &assigned, &mut leftover.stitch)?;
        created_interfaces.extend(self.repair_borders(&leftover.dangling)?);

        if track {
            self.finalize_records(&plan, &assigned, n_ghosts, &created_interfaces, &mut infos)?;
        }

        crate::debug_invariants!(&*self, "sync_with");
        log::info!(
            "Patch synchronized: {} cells, {} vertices, {} interfaces",
            self.cells.len(),
            self.vertices.len(),
            self.interfaces.len()
        );
        Ok(infos.dump())
    }

    /// Walk the current internal leaves and classify them.
    ///
    /// Returns, per previous internal octant, whether no leaf mapped back to it.
    fn plan_leaves(
        &mut self,
        operation: TreeOperation,
        import_all: bool,
        track: bool,
        plan: &mut SyncPlan,
        infos: &mut InfoCollection,
    ) -> Result<Vec<bool>, MeshError> {
        let rank = self.tree.rank();
        let n_octants = self.tree.octant_count() as u32;
        let n_previous = self.index.internal_count();
        let family = tree::node_count(self.tree.dimension()) as u32;
        let mut unmapped = vec![true; n_previous];

        let mut tree_id = 0u32;
        while tree_id < n_octants {
            let mapping = if import_all {
                Vec::new()
            } else {
                self.tree.mapping(tree_id)?
            };
            let leaf = LeafChange {
                tree_id,
                is_new_r: !import_all && self.tree.is_new_r(tree_id),
                is_new_c: !import_all && self.tree.is_new_c(tree_id),
                mapping: &mapping,
            };
            let state = classify_leaf(operation, import_all, rank, &leaf)?;

            match state {
                LeafState::Unchanged => {
                    if let Some(flag) = unmapped.get_mut(tree_id as usize) {
                        *flag = false;
                    }
                    tree_id += 1;
                    continue;
                }
                LeafState::Renumbering { previous } => {
                    let cell = self.resolve_previous(previous)?;
                    plan.renumbered.push(Renumbering { cell, tree_id });
                    if previous.internal {
                        if let Some(flag) = unmapped.get_mut(previous.id as usize) {
                            *flag = false;
                        }
                    }
                    tree_id += 1;
                    continue;
                }
                _ => {}
            }

            let kind = state.adaption_type();
            let batch = match state {
                LeafState::Creation => n_octants - tree_id,
                LeafState::Refinement => family.min(n_octants - tree_id),
                _ => 1,
            };
            let start = plan.added.len();
            plan.added.extend((tree_id..tree_id + batch).map(OctantInfo::internal));

            let mut previous_cells = Vec::with_capacity(mapping.len());
            for previous in &mapping {
                if previous.rank != rank {
                    previous_cells.push(None);
                    continue;
                }
                let info = previous.info();
                let cell = self.resolve_previous(info)?;
                plan.delete(cell, kind, rank);
                if info.internal {
                    if let Some(flag) = unmapped.get_mut(info.id as usize) {
                        *flag = false;
                    }
                }
                previous_cells.push(Some(cell));
            }

            if track {
                let record_rank = match state {
                    LeafState::PartitionRecv { rank: from } => from,
                    _ => rank,
                };
                let idx = infos.create(kind, AdaptionEntity::Cell, record_rank);
                infos[idx].previous.extend(previous_cells);
                plan.batches.push((idx, start..plan.added.len()));
            }
            tree_id += batch;
        }
        Ok(unmapped)
    }

    /// Schedule migrated-out cells and the previous ghost layer.
    fn plan_partition(
        &mut self,
        operation: TreeOperation,
        plan: &mut SyncPlan,
        unmapped: &mut [bool],
    ) -> Result<(), MeshError> {
        let rank = self.tree.rank();
        if operation == TreeOperation::LoadBalance {
            for (dest, ranges) in self.tree.sent_ranges() {
                let kind = if dest == rank {
                    AdaptionType::Deletion
                } else {
                    AdaptionType::PartitionSend
                };
                for id in ranges.into_iter().flatten() {
                    let cell = self.resolve_previous(OctantInfo::internal(id))?;
                    plan.delete(cell, kind, dest);
                    if let Some(flag) = unmapped.get_mut(id as usize) {
                        *flag = false;
                    }
                }
            }
        }

        let ghosts = self.index.ghost_cells();
        if !ghosts.is_empty() {
            self.ownership.clear_ghosts();
            for (_, cell) in ghosts {
                plan.delete(cell, AdaptionType::Deletion, rank);
            }
        }
        Ok(())
    }

    fn resolve_previous(&self, octant: OctantInfo) -> Result<EntityId, MeshError> {
        self.index.resolve(octant).ok_or(MeshError::OctantWithoutCell {
            id: octant.id,
            internal: octant.internal,
        })
    }

    /// Record the deleted cells and their interfaces.
    ///
    /// Cells sent to the same rank are ordered by position, matching the
    /// order used on the receiving side.
    fn track_deletions(&self, deleted: &[Doomed], infos: &mut InfoCollection) -> Result<(), MeshError> {
        let mut send_records = BTreeSet::new();
        let mut removed = Vec::new();
        let mut seen = HashSet::new();
        for doomed in deleted {
            if matches!(doomed.kind, AdaptionType::Deletion | AdaptionType::PartitionSend) {
                let idx = infos.create(doomed.kind, AdaptionEntity::Cell, doomed.rank);
                infos[idx].previous.push(Some(doomed.cell));
                if doomed.kind == AdaptionType::PartitionSend {
                    send_records.insert(idx);
                }
            }
            let cell = self.cell(doomed.cell)?;
            removed.extend(cell.interfaces().iter().copied().filter(|i| seen.insert(*i)));
        }

        for idx in send_records {
            let ids: Vec<EntityId> = infos[idx].previous_ids().collect();
            infos[idx].previous = self.sort_by_position(ids)?.into_iter().map(Some).collect();
        }

        let rank = self.tree.rank();
        let idx = infos.create(AdaptionType::Deletion, AdaptionEntity::Interface, rank);
        infos[idx].previous.extend(removed.into_iter().map(Some));
        Ok(())
    }

    /// Order cells lexicographically by the mean of their vertices.
    fn sort_by_position(&self, ids: Vec<EntityId>) -> Result<Vec<EntityId>, MeshError> {
        let mut keyed = ids
            .into_iter()
            .map(|id| Ok((self.cell_position(id)?, id)))
            .collect::<Result<Vec<_>, MeshError>>()?;
        keyed.sort_by(|(a, _), (b, _)| {
            a[0].total_cmp(&b[0])
                .then(a[1].total_cmp(&b[1]))
                .then(a[2].total_cmp(&b[2]))
        });
        Ok(keyed.into_iter().map(|(_, id)| id).collect())
    }

    /// Remove cells, their interfaces and the vertices left unused.
    ///
    /// Surviving cells that shared an interface with a dead cell lose that
    /// interface and adjacency; their vertices, and the owner-face vertices
    /// of their remaining interfaces, are kept and keyed by node Morton so
    /// the import step can stitch new cells onto them.
    /// Without neighbourhood storage every surviving vertex is keyed instead.
    fn delete_cells(&mut self, doomed: &[EntityId]) -> Result<Leftover, MeshError> {
        let mut leftover = Leftover::default();
        if doomed.is_empty() {
            return Ok(leftover);
        }
        let dead_cells: HashSet<EntityId> = doomed.iter().copied().collect();
        let mut dead_vertices: BTreeSet<EntityId> = BTreeSet::new();
        let mut dead_interfaces: BTreeSet<EntityId> = BTreeSet::new();

        for &cell_id in doomed {
            let cell = self.cells.get(cell_id).ok_or(MeshError::MissingCell(cell_id))?;
            dead_vertices.extend(cell.connect().iter().copied());
            let interfaces = cell.interfaces().to_vec();
            let adjacencies = cell.adjacencies().to_vec();

            for iface_id in interfaces {
                if !dead_interfaces.insert(iface_id) {
                    continue;
                }
                let iface = self
                    .interfaces
                    .get(iface_id)
                    .ok_or(MeshError::MissingInterface(iface_id))?;
                let Some(neigh) = iface.neigh() else {
                    continue;
                };
                let owner = iface.owner();
                let (survivor, gone) = if !dead_cells.contains(&owner.cell) {
                    (owner, neigh)
                } else if !dead_cells.contains(&neigh.cell) {
                    (neigh, owner)
                } else {
                    continue;
                };
                self.strip_side(survivor, iface_id, gone.cell)?;
                leftover.dangling.insert(survivor.cell);
            }

            // adjacencies not backed by an interface
            for neigh_id in adjacencies {
                if dead_cells.contains(&neigh_id) {
                    continue;
                }
                let neigh = self.cells.get_mut(neigh_id).ok_or(MeshError::MissingCell(neigh_id))?;
                for face in 0..neigh.face_count() {
                    if let Some(k) = neigh.find_adjacency(face, cell_id) {
                        neigh.delete_adjacency(face, k)?;
                    }
                }
                leftover.dangling.insert(neigh_id);
            }

            self.cells.mark_for_removal(cell_id);
            self.ownership.unset(cell_id);
        }
        self.cells.commit();
        for &iface_id in &dead_interfaces {
            self.interfaces.mark_for_removal(iface_id);
        }
        self.interfaces.commit();
        log::debug!("deleted {} cells and {} interfaces", doomed.len(), dead_interfaces.len());

        for &cell_id in &leftover.dangling {
            let cell = self.cells.get(cell_id).ok_or(MeshError::MissingCell(cell_id))?;
            let octant = self.index.classify(cell_id, cell.is_interior())?;
            for (k, &v) in cell.connect().iter().enumerate() {
                leftover.stitch.insert(self.tree.node_morton(octant, k)?, v);
                dead_vertices.remove(&v);
            }
            for &iface_id in cell.interfaces() {
                let iface = self
                    .interfaces
                    .get(iface_id)
                    .ok_or(MeshError::MissingInterface(iface_id))?;
                if iface.is_border() {
                    continue;
                }
                let owner = iface.owner();
                let owner_cell = self.cells.get(owner.cell).ok_or(MeshError::MissingCell(owner.cell))?;
                let owner_octant = self.index.classify(owner.cell, owner_cell.is_interior())?;
                let local = self
                    .cell_type
                    .face_connect(owner.face, owner_cell.vertex_count())
                    .ok_or(MeshError::FaceOutOfRange {
                        face: owner.face,
                        count: owner_cell.face_count(),
                    })?;
                for k in local {
                    let v = owner_cell.vertex(k).ok_or(MeshError::MissingCell(owner.cell))?;
                    leftover.stitch.insert(self.tree.node_morton(owner_octant, k)?, v);
                    dead_vertices.remove(&v);
                }
            }
        }

        // without neighbourhood data no survivor is known to be dangling
        if !self.store_neighbourhood {
            for (cell_id, cell) in self.cells.iter() {
                let octant = self.index.classify(cell_id, cell.is_interior())?;
                for (k, &v) in cell.connect().iter().enumerate() {
                    leftover.stitch.insert(self.tree.node_morton(octant, k)?, v);
                    dead_vertices.remove(&v);
                }
            }
        }

        for &v in &dead_vertices {
            self.vertices.mark_for_removal(v);
        }
        self.vertices.commit();
        log::debug!(
            "removed {} vertices, {} kept around {} dangling cells",
            dead_vertices.len(),
            leftover.stitch.len(),
            leftover.dangling.len()
        );
        Ok(leftover)
    }

    /// Drop one interface, and the adjacency it stood for, from a surviving side.
    fn strip_side(&mut self, side: InterfaceSide, iface: EntityId, gone: EntityId) -> Result<(), MeshError> {
        let cell = self.cells.get_mut(side.cell).ok_or(MeshError::MissingCell(side.cell))?;
        if let Some(k) = cell.find_interface(side.face, iface) {
            cell.delete_interface(side.face, k)?;
        }
        if let Some(k) = cell.find_adjacency(side.face, gone) {
            cell.delete_adjacency(side.face, k)?;
        }
        Ok(())
    }

    /// Create the cells of `added` under the ids in `ids`, then link them.
    ///
    /// Returns the interfaces created, in creation order.
    fn import_cells(
        &mut self,
        added: &[OctantInfo],
        ids: &[EntityId],
        stitch: &mut HashMap<u64, EntityId>,
    ) -> Result<Vec<EntityId>, MeshError> {
        if added.is_empty() {
            return Ok(Vec::new());
        }
        let n_nodes = tree::node_count(self.tree.dimension());
        let rank = self.tree.rank();
        let mut new_vertices = 0usize;

        for (&octant, &cell_id) in added.iter().zip(ids) {
            let mut connect = Vec::with_capacity(n_nodes);
            for k in 0..n_nodes {
                let key = self.tree.node_morton(octant, k)?;
                let vertex = match stitch.get(&key) {
                    Some(&v) => v,
                    None => {
                        let coords = self.tree.node_coords(octant, k)?;
                        let v = self.vertices.push(|id| Vertex::new(id, coords));
                        stitch.insert(key, v);
                        new_vertices += 1;
                        v
                    }
                };
                connect.push(vertex);
            }
            let cell = Cell::with_connect(
                cell_id,
                self.cell_type,
                connect,
                octant.internal,
                self.store_neighbourhood,
            )?;
            self.cells.insert(cell_id, cell)?;
            let owner = if octant.internal {
                rank
            } else {
                self.tree.ghost_owner(octant.id)?
            };
            self.ownership.set_from_owner(cell_id, owner, rank);
        }
        log::debug!("imported {} cells, {new_vertices} new vertices", added.len());

        if !self.store_neighbourhood {
            return Ok(Vec::new());
        }
        self.update_adjacencies(ids)?;
        self.update_interfaces(ids)
    }

    /// Link the new cells to their face neighbours.
    ///
    /// Cells are visited shallow first: a coarse cell finds all its finer
    /// neighbours on a face at once, and those faces are then skipped.
    fn update_adjacencies(&mut self, created: &[EntityId]) -> Result<(), MeshError> {
        let n_faces = tree::face_count(self.tree.dimension());
        let mut by_level: Vec<Vec<(EntityId, OctantInfo)>> =
            vec![Vec::new(); usize::from(self.tree.max_depth()) + 1];
        for &cell_id in created {
            let octant = self.cell_octant(cell_id)?;
            let level = usize::from(self.tree.level(octant)?);
            if level >= by_level.len() {
                by_level.resize(level + 1, Vec::new());
            }
            by_level[level].push((cell_id, octant));
        }

        let mut processed: HashSet<(EntityId, usize)> = HashSet::new();
        for (cell_id, octant) in by_level.into_iter().flatten() {
            for face in 0..n_faces {
                if processed.contains(&(cell_id, face)) {
                    continue;
                }
                let leaves = if octant.internal {
                    self.tree.find_neighbours(octant.id, face, 1)?
                } else {
                    self.tree.find_ghost_neighbours(octant.id, face, 1)?
                };
                let neigh_face = self.tree.opposite_face(face);
                for leaf in leaves {
                    let neigh_id = self.resolve_previous(leaf)?;
                    self.cells
                        .get_mut(cell_id)
                        .ok_or(MeshError::MissingCell(cell_id))?
                        .push_adjacency(face, neigh_id)?;
                    self.cells
                        .get_mut(neigh_id)
                        .ok_or(MeshError::MissingCell(neigh_id))?
                        .push_adjacency(neigh_face, cell_id)?;
                    processed.insert((neigh_id, neigh_face));
                }
            }
        }
        Ok(())
    }

    /// Create the interfaces of the new cells.
    ///
    /// The finer side owns an interface (ties go to the lower id); internal
    /// faces without neighbours get a border interface.
    fn update_interfaces(&mut self, created: &[EntityId]) -> Result<Vec<EntityId>, MeshError> {
        let mut out = Vec::new();
        for &cell_id in created {
            let cell = self.cell(cell_id)?;
            for face in 0..cell.face_count() {
                let neighbours = self.cell(cell_id)?.face_adjacencies(face).to_vec();
                if neighbours.is_empty() {
                    if let Some(id) = self.border_interface(cell_id, face)? {
                        out.push(id);
                    }
                    continue;
                }
                for neigh_id in neighbours {
                    if self.linking_interface(cell_id, face, neigh_id)?.is_some() {
                        continue;
                    }
                    let neigh_face = self.tree.opposite_face(face);
                    let cell_side = InterfaceSide { cell: cell_id, face };
                    let neigh_side = InterfaceSide {
                        cell: neigh_id,
                        face: neigh_face,
                    };
                    let cell_count = self.cell(cell_id)?.face_adjacency_count(face);
                    let neigh_count = self.cell(neigh_id)?.face_adjacency_count(neigh_face);
                    let (owner, other) = if cell_count > 1 {
                        (neigh_side, cell_side)
                    } else if neigh_count > 1 || cell_id < neigh_id {
                        (cell_side, neigh_side)
                    } else {
                        (neigh_side, cell_side)
                    };
                    out.push(self.create_interface(owner, Some(other))?);
                }
            }
        }
        Ok(out)
    }

    /// Interface on `face` of `cell` shared with `neigh`, if any.
    fn linking_interface(&self, cell: EntityId, face: usize, neigh: EntityId) -> Result<Option<EntityId>, MeshError> {
        for &iface_id in self.cell(cell)?.face_interfaces(face) {
            let iface = self.interface(iface_id)?;
            if iface.other_side(cell).is_some_and(|side| side.cell == neigh) {
                return Ok(Some(iface_id));
            }
        }
        Ok(None)
    }

    /// Border interface for an internal cell face with no neighbour and no
    /// interface yet.
    fn border_interface(&mut self, cell_id: EntityId, face: usize) -> Result<Option<EntityId>, MeshError> {
        let cell = self.cell(cell_id)?;
        if !cell.is_interior() || cell.face_adjacency_count(face) > 0 || cell.face_interface_count(face) > 0 {
            return Ok(None);
        }
        self.create_interface(InterfaceSide { cell: cell_id, face }, None)
            .map(Some)
    }

    fn create_interface(&mut self, owner: InterfaceSide, neigh: Option<InterfaceSide>) -> Result<EntityId, MeshError> {
        let connect = self.cell(owner.cell)?.face_vertices(owner.face)?;
        let ty = self.interface_type;
        let id = self
            .interfaces
            .push(|id| Interface::new(id, ty, connect, owner, neigh));
        for side in std::iter::once(owner).chain(neigh) {
            self.cells
                .get_mut(side.cell)
                .ok_or(MeshError::MissingCell(side.cell))?
                .push_interface(side.face, id)?;
        }
        Ok(id)
    }

    /// Close the faces of surviving cells left without any neighbour.
    fn repair_borders(&mut self, dangling: &BTreeSet<EntityId>) -> Result<Vec<EntityId>, MeshError> {
        let mut out = Vec::new();
        if !self.store_neighbourhood {
            return Ok(out);
        }
        for &cell_id in dangling {
            let Some(cell) = self.cells.get(cell_id) else {
                continue;
            };
            for face in 0..cell.face_count() {
                if let Some(id) = self.border_interface(cell_id, face)? {
                    out.push(id);
                }
            }
        }
        Ok(out)
    }

    /// Fill in the current ids and the creation records.
    fn finalize_records(
        &self,
        plan: &SyncPlan,
        assigned: &[EntityId],
        n_ghosts: usize,
        created_interfaces: &[EntityId],
        infos: &mut InfoCollection,
    ) -> Result<(), MeshError> {
        for (idx, range) in &plan.batches {
            infos[*idx].current.extend_from_slice(&assigned[range.clone()]);
        }

        let received: Vec<usize> = infos
            .iter()
            .enumerate()
            .filter(|(_, info)| info.kind == AdaptionType::PartitionRecv && info.entity == AdaptionEntity::Cell)
            .map(|(idx, _)| idx)
            .collect();
        for idx in received {
            let ids = std::mem::take(&mut infos[idx].current);
            infos[idx].current = self.sort_by_position(ids)?;
        }

        let rank = self.tree.rank();
        if n_ghosts > 0 {
            let idx = infos.create(AdaptionType::Creation, AdaptionEntity::Cell, rank);
            infos[idx]
                .current
                .extend_from_slice(&assigned[assigned.len() - n_ghosts..]);
        }

        let idx = infos.create(AdaptionType::Creation, AdaptionEntity::Interface, rank);
        infos[idx].current.extend_from_slice(created_interfaces);
        Ok(())
    }
}
