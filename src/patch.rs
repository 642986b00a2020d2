//! Octree patches: an unstructured mesh view kept in sync with a spatial tree.
//!
//! [`OctreePatch`] owns the vertices, cells and interfaces of the mesh, the
//! spatial tree they mirror and the [`OctantIndex`] tying the two together.
//! Every tree mutation ([`OctreePatch::update`], [`OctreePatch::partition`])
//! is followed by one synchronization pass (see [`crate::adapt::sync`]) that
//! returns what changed.
//!
//! A failed pass leaves the patch in an unspecified state: drop it or
//! rebuild it.

use hashbrown::HashSet;

use crate::adapt::AdaptionInfo;
use crate::data::entity_store::EntityStore;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::cell::Cell;
use crate::topology::element_type::ElementType;
use crate::topology::id::EntityId;
use crate::topology::interface::Interface;
use crate::topology::octant_index::OctantIndex;
use crate::topology::ownership::CellOwnership;
use crate::topology::vertex::Vertex;
use crate::tree::linear::{LinearTree, MAX_LEVEL};
use crate::tree::{self, OctantInfo, SpatialTree, TreeOperation};

/// Construction parameters of a patch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Space dimension, 2 or 3.
    pub dimension: usize,
    /// Lower corner of the domain.
    pub origin: [f64; 3],
    /// Edge length of the (square or cubic) domain.
    pub length: f64,
    /// Maximum cell size of the initial uniform refinement.
    pub dh: f64,
    /// Deepest level a cell may reach.
    pub max_level: u8,
    /// Geometric tolerance; the tree default when unset.
    pub tolerance: Option<f64>,
    /// Whether cells store adjacencies and interfaces.
    pub store_neighbourhood: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            dimension: 3,
            origin: [0.0; 3],
            length: 1.0,
            dh: 1.0,
            max_level: MAX_LEVEL,
            tolerance: None,
            store_neighbourhood: true,
        }
    }
}

impl PatchConfig {
    /// Level of the initial uniform refinement: `ceil(log2(length / dh))`.
    pub fn initial_level(&self) -> u8 {
        let ratio = (self.length / self.dh).max(1.0);
        (ratio.log2().ceil() as u8).min(self.max_level)
    }
}

/// Per-level cell size, face area and cell volume.
#[derive(Clone, Debug, Default)]
struct LevelGeometry {
    dh: Vec<f64>,
    area: Vec<f64>,
    volume: Vec<f64>,
}

impl LevelGeometry {
    fn new(length: f64, dimension: usize, max_level: u8) -> Self {
        let mut levels = Self::default();
        for level in 0..=i32::from(max_level) {
            let dh = length / 2f64.powi(level);
            levels.dh.push(dh);
            levels.area.push(dh.powi(dimension as i32 - 1));
            levels.volume.push(dh.powi(dimension as i32));
        }
        levels
    }

    fn get(table: &[f64], level: u8) -> Result<f64, MeshError> {
        table
            .get(usize::from(level))
            .copied()
            .ok_or_else(|| MeshError::Tree(format!("level {level} above the maximum")))
    }
}

/// An adaptive mesh mirroring the leaves of a spatial tree.
#[derive(Clone, Debug)]
pub struct OctreePatch<T: SpatialTree> {
    pub(crate) tree: T,
    pub(crate) vertices: EntityStore<Vertex>,
    pub(crate) cells: EntityStore<Cell>,
    pub(crate) interfaces: EntityStore<Interface>,
    pub(crate) index: OctantIndex,
    pub(crate) ownership: CellOwnership,
    pub(crate) last_operation: TreeOperation,
    pub(crate) store_neighbourhood: bool,
    pub(crate) cell_type: ElementType,
    pub(crate) interface_type: ElementType,
    levels: LevelGeometry,
}

impl<const D: usize> OctreePatch<LinearTree<D>> {
    /// Single-process patch over a [`LinearTree`].
    ///
    /// The mesh starts empty; the first [`OctreePatch::update`] imports the
    /// initial uniform refinement.
    pub fn new(config: &PatchConfig) -> Result<Self, MeshError> {
        Self::distributed(config, 0, 1)
    }

    /// Patch for `rank` out of `n_procs` replicated ranks.
    pub fn distributed(config: &PatchConfig, rank: usize, n_procs: usize) -> Result<Self, MeshError> {
        if config.dimension != D {
            return Err(MeshError::UnsupportedDimension(config.dimension));
        }
        let mut tree = LinearTree::<D>::distributed(
            config.origin,
            config.length,
            config.max_level,
            rank,
            n_procs,
        )?;
        if let Some(tolerance) = config.tolerance {
            tree.set_tolerance(tolerance);
        }
        let initial = config.initial_level();
        if initial > 0 {
            tree.set_global_marker(0, initial as i8)?;
        }
        Self::with_tree(tree, config.store_neighbourhood)
    }
}

impl<T: SpatialTree> OctreePatch<T> {
    /// Wrap an existing tree. The mesh starts empty.
    pub fn with_tree(tree: T, store_neighbourhood: bool) -> Result<Self, MeshError> {
        let dimension = tree.dimension();
        let cell_type =
            ElementType::octant_cell(dimension).ok_or(MeshError::UnsupportedDimension(dimension))?;
        let levels = LevelGeometry::new(tree.length(), dimension, tree.max_level());
        log::info!("Initializing octree mesh ({dimension}D)");
        Ok(Self {
            tree,
            vertices: EntityStore::new(),
            cells: EntityStore::new(),
            interfaces: EntityStore::new(),
            index: OctantIndex::new(),
            ownership: CellOwnership::default(),
            last_operation: TreeOperation::Initialization,
            store_neighbourhood,
            cell_type,
            interface_type: cell_type.face_type(),
            levels,
        })
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable access to the tree.
    ///
    /// Leaves changed through this handle are only picked up by the next
    /// synchronization; markers are the intended use.
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn dimension(&self) -> usize {
        self.tree.dimension()
    }

    pub fn rank(&self) -> usize {
        self.tree.rank()
    }

    /// Last operation applied to the tree.
    pub fn last_operation(&self) -> TreeOperation {
        self.last_operation
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn internal_count(&self) -> usize {
        self.index.internal_count()
    }

    pub fn ghost_count(&self) -> usize {
        self.index.ghost_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn cell(&self, id: EntityId) -> Result<&Cell, MeshError> {
        self.cells.get(id).ok_or(MeshError::MissingCell(id))
    }

    pub fn vertex(&self, id: EntityId) -> Result<&Vertex, MeshError> {
        self.vertices.get(id).ok_or(MeshError::MissingVertex(id))
    }

    pub fn interface(&self, id: EntityId) -> Result<&Interface, MeshError> {
        self.interfaces.get(id).ok_or(MeshError::MissingInterface(id))
    }

    /// Cells in id order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().map(|(_, c)| c)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().map(|(_, v)| v)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> + '_ {
        self.interfaces.iter().map(|(_, i)| i)
    }

    /// Adapt the tree according to the markers, then synchronize.
    ///
    /// The change mapping is requested whenever the mesh is not empty. An
    /// empty mesh is always synchronized, so the first call imports the
    /// tree even when no marker was set. Otherwise no record is returned
    /// when the tree was already up to date.
    pub fn update(&mut self, track: bool) -> Result<Vec<AdaptionInfo>, MeshError> {
        log::info!("Adapting tree...");
        let mapping = !self.cells.is_empty();
        let updated = self.tree.adapt(mapping)?;
        self.last_operation = if mapping {
            TreeOperation::AdaptionMapped
        } else {
            TreeOperation::AdaptionUnmapped
        };
        if !updated && mapping {
            log::info!("Tree already updated");
            return Ok(Vec::new());
        }
        self.sync(track)
    }

    /// Redistribute the leaves among processes, then synchronize.
    pub fn partition(&mut self, track: bool) -> Result<Vec<AdaptionInfo>, MeshError> {
        log::info!("Partitioning tree...");
        let updated = self.tree.load_balance()?;
        self.last_operation = TreeOperation::LoadBalance;
        if !updated {
            log::info!("Partition already balanced");
            return Ok(Vec::new());
        }
        self.sync(track)
    }

    /// Synchronize with the tree after its last operation.
    pub fn sync(&mut self, track: bool) -> Result<Vec<AdaptionInfo>, MeshError> {
        self.sync_with(self.last_operation, track)
    }

    /// Octant of a cell.
    pub fn cell_octant(&self, id: EntityId) -> Result<OctantInfo, MeshError> {
        let cell = self.cell(id)?;
        self.index.classify(id, cell.is_interior())
    }

    /// Cell of an octant, `None` when it has not been imported.
    pub fn octant_cell(&self, octant: OctantInfo) -> Option<EntityId> {
        self.index.resolve(octant)
    }

    pub fn cell_level(&self, id: EntityId) -> Result<u8, MeshError> {
        self.tree.level(self.cell_octant(id)?)
    }

    pub fn mark_cell_for_refinement(&mut self, id: EntityId) -> Result<bool, MeshError> {
        self.set_marker(id, 1)
    }

    pub fn mark_cell_for_coarsening(&mut self, id: EntityId) -> Result<bool, MeshError> {
        self.set_marker(id, -1)
    }

    /// Returns `false` for ghost cells, which cannot be marked.
    fn set_marker(&mut self, id: EntityId, marker: i8) -> Result<bool, MeshError> {
        let octant = self.cell_octant(id)?;
        if !octant.internal {
            return Ok(false);
        }
        self.tree.set_marker(octant.id, marker)?;
        Ok(true)
    }

    /// Enable or disable 2:1 balancing for a cell. `false` for ghosts.
    pub fn enable_cell_balancing(&mut self, id: EntityId, enabled: bool) -> Result<bool, MeshError> {
        let octant = self.cell_octant(id)?;
        if !octant.internal {
            return Ok(false);
        }
        self.tree.set_balance(octant.id, enabled)?;
        Ok(true)
    }

    pub fn eval_cell_volume(&self, id: EntityId) -> Result<f64, MeshError> {
        LevelGeometry::get(&self.levels.volume, self.cell_level(id)?)
    }

    pub fn eval_cell_size(&self, id: EntityId) -> Result<f64, MeshError> {
        LevelGeometry::get(&self.levels.dh, self.cell_level(id)?)
    }

    pub fn eval_cell_centroid(&self, id: EntityId) -> Result<[f64; 3], MeshError> {
        self.tree.centre(self.cell_octant(id)?)
    }

    /// Area of an interface: the face area of its (finer) owner.
    pub fn eval_interface_area(&self, id: EntityId) -> Result<f64, MeshError> {
        let owner = self.interface(id)?.owner();
        LevelGeometry::get(&self.levels.area, self.cell_level(owner.cell)?)
    }

    /// Unit normal of an interface, pointing out of its owner.
    pub fn eval_interface_normal(&self, id: EntityId) -> Result<[f64; 3], MeshError> {
        let face = self.interface(id)?.owner().face;
        let mut normal = [0.0; 3];
        normal[face / 2] = if face % 2 == 0 { -1.0 } else { 1.0 };
        Ok(normal)
    }

    /// Mean of the vertex coordinates of a cell.
    ///
    /// Unlike [`OctreePatch::eval_cell_centroid`] this needs no octant, so it
    /// still works on cells whose octant left the tree.
    pub fn cell_position(&self, id: EntityId) -> Result<[f64; 3], MeshError> {
        let cell = self.cell(id)?;
        let mut position = [0.0; 3];
        for &v in cell.connect() {
            let coords = self.vertex(v)?.coords();
            for (p, c) in position.iter_mut().zip(coords) {
                *p += c;
            }
        }
        let n = cell.connect().len().max(1) as f64;
        Ok(position.map(|p| p / n))
    }

    /// Lower and upper corner of a cell.
    fn cell_box(&self, id: EntityId) -> Result<([f64; 3], [f64; 3]), MeshError> {
        let cell = self.cell(id)?;
        let last = cell.vertex_count().saturating_sub(1);
        let lower = cell.vertex(0).ok_or(MeshError::MissingCell(id))?;
        let upper = cell.vertex(last).ok_or(MeshError::MissingCell(id))?;
        Ok((self.vertex(lower)?.coords(), self.vertex(upper)?.coords()))
    }

    pub fn is_point_inside(&self, point: [f64; 3]) -> bool {
        self.tree.point_owner(point).is_some()
    }

    pub fn is_point_inside_cell(&self, id: EntityId, point: [f64; 3]) -> Result<bool, MeshError> {
        let (lower, upper) = self.cell_box(id)?;
        let tol = self.tree.tolerance();
        Ok((0..self.dimension()).all(|d| point[d] >= lower[d] - tol && point[d] <= upper[d] + tol))
    }

    /// Internal cell containing `point`.
    pub fn locate_point(&self, point: [f64; 3]) -> Option<EntityId> {
        let id = self.tree.point_owner(point)?;
        self.index.resolve(OctantInfo::internal(id))
    }

    pub fn tolerance(&self) -> f64 {
        self.tree.tolerance()
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tree.set_tolerance(tolerance);
    }

    pub fn reset_tolerance(&mut self) {
        self.tree.reset_tolerance();
    }

    /// Move the whole patch by `offset`.
    pub fn translate(&mut self, offset: [f64; 3]) {
        let mut origin = self.tree.origin();
        for (o, d) in origin.iter_mut().zip(offset) {
            *o += d;
        }
        self.tree.set_origin(origin);
        for (_, vertex) in self.vertices.iter_mut() {
            vertex.translate(offset);
        }
    }

    /// Scale the patch about `center`.
    ///
    /// Only uniform scaling keeps the cells octants: non-uniform factors are
    /// refused and the patch is left untouched.
    pub fn scale(&mut self, factors: [f64; 3], center: [f64; 3]) -> Result<(), MeshError> {
        let dimension = self.dimension();
        let factor = factors[0];
        if factors[..dimension].iter().any(|&f| f != factor) {
            log::warn!("octree patch only allows uniform scaling, ignoring {factors:?}");
            return Err(MeshError::NonUniformScaling(factors));
        }
        let mut origin = self.tree.origin();
        for (o, c) in origin.iter_mut().zip(center).take(dimension) {
            *o = c + (*o - c) * factor;
        }
        self.tree.set_origin(origin);
        self.tree.set_length(self.tree.length() * factor);
        let mut center = center;
        if dimension == 2 {
            center[2] = 0.0;
        }
        for (_, vertex) in self.vertices.iter_mut() {
            vertex.scale(factor, center);
        }
        self.levels = LevelGeometry::new(self.tree.length(), dimension, self.tree.max_level());
        Ok(())
    }

    /// Owning rank of a cell.
    pub fn cell_owner(&self, id: EntityId) -> Result<usize, MeshError> {
        self.ownership.owner_or_err(id)
    }

    /// Ghost cells grouped by owning rank.
    pub fn ghosts_by_rank(&self) -> std::collections::BTreeMap<usize, Vec<EntityId>> {
        self.ownership.ghosts_by_rank()
    }

    /// Leaves touching entity `entity` of codimension `codim` of a cell.
    fn tree_neighbours(&self, id: EntityId, entity: usize, codim: usize) -> Result<Vec<EntityId>, MeshError> {
        let octant = self.cell_octant(id)?;
        let leaves = if octant.internal {
            self.tree.find_neighbours(octant.id, entity, codim)?
        } else {
            self.tree.find_ghost_neighbours(octant.id, entity, codim)?
        };
        leaves
            .into_iter()
            .map(|leaf| {
                self.index.resolve(leaf).ok_or(MeshError::OctantWithoutCell {
                    id: leaf.id,
                    internal: leaf.internal,
                })
            })
            .collect()
    }

    /// Cells sharing face `face` of cell `id`, skipping `black_list`.
    pub fn find_cell_face_neighs(
        &self,
        id: EntityId,
        face: usize,
        black_list: &[EntityId],
    ) -> Result<Vec<EntityId>, MeshError> {
        let count = tree::face_count(self.dimension());
        if face >= count {
            return Err(MeshError::FaceOutOfRange { face, count });
        }
        let mut out = Vec::new();
        collect_unique(&mut out, self.tree_neighbours(id, face, 1)?, black_list);
        Ok(out)
    }

    /// Cells sharing part of edge `edge` of cell `id` (3D only).
    ///
    /// Includes the face neighbours touching the edge.
    pub fn find_cell_edge_neighs(
        &self,
        id: EntityId,
        edge: usize,
        black_list: &[EntityId],
    ) -> Result<Vec<EntityId>, MeshError> {
        let faces = match (self.dimension(), tree::faces_on_edge(edge)) {
            (3, Some(faces)) => faces,
            (dimension, _) => {
                return Err(MeshError::FaceOutOfRange {
                    face: edge,
                    count: tree::edge_count(dimension),
                });
            }
        };
        let (a, b) = self.edge_endpoints(id, faces)?;
        let tol = self.tolerance();
        let mut out = Vec::new();
        for face in faces {
            let mut touching = Vec::new();
            for neigh in self.tree_neighbours(id, face, 1)? {
                let (lower, upper) = self.cell_box(neigh)?;
                if shares_segment(lower, upper, a, b, tol) {
                    touching.push(neigh);
                }
            }
            collect_unique(&mut out, touching, black_list);
        }
        collect_unique(&mut out, self.tree_neighbours(id, edge, 2)?, black_list);
        Ok(out)
    }

    /// Cells sharing vertex `vertex` of cell `id`.
    ///
    /// Includes the face and edge neighbours touching the vertex.
    pub fn find_cell_vertex_neighs(
        &self,
        id: EntityId,
        vertex: usize,
        black_list: &[EntityId],
    ) -> Result<Vec<EntityId>, MeshError> {
        let dimension = self.dimension();
        let count = tree::node_count(dimension);
        if vertex >= count {
            return Err(MeshError::FaceOutOfRange { face: vertex, count });
        }
        let point_id = self.cell(id)?.vertex(vertex).ok_or(MeshError::MissingCell(id))?;
        let point = self.vertex(point_id)?.coords();
        let tol = self.tolerance();

        let mut candidates = Vec::new();
        for face in tree::faces_on_node(dimension, vertex) {
            candidates.extend(self.tree_neighbours(id, face, 1)?);
        }
        if dimension == 3 {
            for edge in tree::edges_on_node(vertex) {
                candidates.extend(self.tree_neighbours(id, edge, 2)?);
            }
        }
        let mut touching = Vec::new();
        for neigh in candidates {
            let (lower, upper) = self.cell_box(neigh)?;
            if (0..dimension).all(|d| point[d] >= lower[d] - tol && point[d] <= upper[d] + tol) {
                touching.push(neigh);
            }
        }
        let mut out = Vec::new();
        collect_unique(&mut out, touching, black_list);
        collect_unique(&mut out, self.tree_neighbours(id, vertex, dimension)?, black_list);
        Ok(out)
    }

    fn edge_endpoints(&self, id: EntityId, faces: [usize; 2]) -> Result<([f64; 3], [f64; 3]), MeshError> {
        let cell = self.cell(id)?;
        let n = cell.vertex_count();
        let on_edge: Vec<usize> = (0..n)
            .filter(|&k| faces.iter().all(|&f| (k >> (f / 2)) & 1 == f % 2))
            .collect();
        let coords = |k: usize| -> Result<[f64; 3], MeshError> {
            let v = cell.vertex(k).ok_or(MeshError::MissingCell(id))?;
            Ok(self.vertex(v)?.coords())
        };
        match on_edge.as_slice() {
            [a, b] => Ok((coords(*a)?, coords(*b)?)),
            _ => Err(MeshError::InvalidConnectivity {
                expected: 2,
                found: on_edge.len(),
            }),
        }
    }
}

fn collect_unique(out: &mut Vec<EntityId>, found: Vec<EntityId>, black_list: &[EntityId]) {
    for id in found {
        if !black_list.contains(&id) && !out.contains(&id) {
            out.push(id);
        }
    }
}

/// Whether an axis-aligned box shares a stretch of positive length with the
/// axis-aligned segment `a`-`b`.
fn shares_segment(lower: [f64; 3], upper: [f64; 3], a: [f64; 3], b: [f64; 3], tol: f64) -> bool {
    (0..3).all(|d| {
        let (s0, s1) = (a[d].min(b[d]), a[d].max(b[d]));
        let lo = lower[d].max(s0);
        let hi = upper[d].min(s1);
        if s1 - s0 > tol {
            hi - lo > tol
        } else {
            lo <= hi + tol
        }
    })
}

impl<T: SpatialTree> DebugInvariants for OctreePatch<T> {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.index.validate_invariants()?;
        let violation = |msg: String| Err(MeshError::InvariantViolation(msg));

        if self.index.internal_count() != self.tree.octant_count() {
            return violation(format!(
                "{} internal cells for {} octants",
                self.index.internal_count(),
                self.tree.octant_count()
            ));
        }
        if self.index.ghost_count() != self.tree.ghost_count() {
            return violation(format!(
                "{} ghost cells for {} ghost octants",
                self.index.ghost_count(),
                self.tree.ghost_count()
            ));
        }
        for id in 0..self.tree.octant_count() as u32 {
            let cell = self.index.resolve(OctantInfo::internal(id));
            if !cell.is_some_and(|c| self.cells.contains(c)) {
                return Err(MeshError::OctantWithoutCell { id, internal: true });
            }
        }

        let known: HashSet<EntityId> = self.cells.ids().collect();
        for (id, cell) in self.cells.iter() {
            self.index.classify(id, cell.is_interior())?;
            for &v in cell.connect() {
                if !self.vertices.contains(v) {
                    return violation(format!("cell {id} references missing vertex {v}"));
                }
            }
            for face in 0..cell.face_count() {
                for &neigh in cell.face_adjacencies(face) {
                    if !known.contains(&neigh) {
                        return violation(format!("cell {id} face {face} references missing cell {neigh}"));
                    }
                    let back = self.cell(neigh)?;
                    if back.find_adjacency_any(id).is_none() {
                        return violation(format!("adjacency {id} -> {neigh} is not symmetric"));
                    }
                }
                for &iface in cell.face_interfaces(face) {
                    let interface = self.interface(iface)?;
                    if interface.side_of(id).map(|s| s.face) != Some(face) {
                        return violation(format!(
                            "cell {id} face {face} lists interface {iface} that does not reference it"
                        ));
                    }
                }
            }
        }
        for (id, interface) in self.interfaces.iter() {
            for side in std::iter::once(interface.owner()).chain(interface.neigh()) {
                let cell = self.cell(side.cell)?;
                if cell.find_interface(side.face, id).is_none() {
                    return violation(format!(
                        "interface {id} is not listed by cell {} face {}",
                        side.cell, side.face
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::QuadTree;

    fn quad_patch() -> OctreePatch<QuadTree> {
        let config = PatchConfig {
            dimension: 2,
            dh: 0.5,
            max_level: 8,
            ..PatchConfig::default()
        };
        let mut patch = OctreePatch::<QuadTree>::new(&config).unwrap();
        patch.update(false).unwrap();
        patch
    }

    #[test]
    fn initial_level_from_dh() {
        let config = PatchConfig {
            length: 2.0,
            dh: 0.3,
            ..PatchConfig::default()
        };
        assert_eq!(config.initial_level(), 3);
        let coarse = PatchConfig {
            dh: 4.0,
            ..PatchConfig::default()
        };
        assert_eq!(coarse.initial_level(), 0);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PatchConfig {
            dimension: 2,
            tolerance: Some(1e-10),
            ..PatchConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        let partial: PatchConfig = serde_json::from_str(r#"{"dimension":2}"#).unwrap();
        assert_eq!(partial.length, 1.0);
    }

    #[test]
    fn dimension_must_match_tree() {
        let config = PatchConfig::default();
        assert_eq!(
            OctreePatch::<QuadTree>::new(&config).err(),
            Some(MeshError::UnsupportedDimension(3))
        );
    }

    #[test]
    fn geometry_queries() {
        let patch = quad_patch();
        assert_eq!(patch.cell_count(), 4);
        let id = patch.locate_point([0.75, 0.25, 0.0]).unwrap();
        assert_eq!(patch.eval_cell_centroid(id).unwrap(), [0.75, 0.25, 0.0]);
        assert_eq!(patch.cell_position(id).unwrap(), [0.75, 0.25, 0.0]);
        assert_eq!(patch.eval_cell_volume(id).unwrap(), 0.25);
        assert_eq!(patch.eval_cell_size(id).unwrap(), 0.5);
        assert!(patch.is_point_inside_cell(id, [0.5, 0.0, 0.0]).unwrap());
        assert!(!patch.is_point_inside_cell(id, [0.25, 0.25, 0.0]).unwrap());
        assert!(patch.is_point_inside([0.1, 0.9, 0.0]));
        assert!(!patch.is_point_inside([1.1, 0.9, 0.0]));
        assert_eq!(patch.locate_point([2.0, 0.0, 0.0]), None);
    }

    #[test]
    fn interface_geometry() {
        let patch = quad_patch();
        for interface in patch.interfaces() {
            assert_eq!(patch.eval_interface_area(interface.id()).unwrap(), 0.5);
            let normal = patch.eval_interface_normal(interface.id()).unwrap();
            assert_eq!(normal.iter().map(|n| n.abs()).sum::<f64>(), 1.0);
        }
        // 4 inner + 8 border
        assert_eq!(patch.interface_count(), 12);
    }

    #[test]
    fn non_uniform_scaling_is_refused() {
        let mut patch = quad_patch();
        let before: Vec<_> = patch.vertices().map(|v| v.coords()).collect();
        assert_eq!(
            patch.scale([2.0, 1.0, 1.0], [0.0; 3]),
            Err(MeshError::NonUniformScaling([2.0, 1.0, 1.0]))
        );
        let after: Vec<_> = patch.vertices().map(|v| v.coords()).collect();
        assert_eq!(before, after);
        let id = patch.locate_point([0.25, 0.25, 0.0]).unwrap();
        assert_eq!(patch.eval_cell_size(id).unwrap(), 0.5);
    }

    #[test]
    fn uniform_scaling_and_translation() {
        let mut patch = quad_patch();
        patch.scale([2.0, 2.0, 1.0], [0.0; 3]).unwrap();
        patch.translate([1.0, 0.0, 0.0]);
        let id = patch.locate_point([2.5, 0.5, 0.0]).unwrap();
        assert_eq!(patch.eval_cell_size(id).unwrap(), 1.0);
        assert_eq!(patch.eval_cell_centroid(id).unwrap(), [2.5, 0.5, 0.0]);
        assert_eq!(patch.cell_position(id).unwrap(), [2.5, 0.5, 0.0]);
    }

    #[test]
    fn neighbour_queries_with_black_list() {
        let patch = quad_patch();
        let lower_left = patch.locate_point([0.25, 0.25, 0.0]).unwrap();
        let lower_right = patch.locate_point([0.75, 0.25, 0.0]).unwrap();
        let upper_left = patch.locate_point([0.25, 0.75, 0.0]).unwrap();
        let upper_right = patch.locate_point([0.75, 0.75, 0.0]).unwrap();

        assert_eq!(patch.find_cell_face_neighs(lower_left, 1, &[]).unwrap(), vec![lower_right]);
        assert!(patch.find_cell_face_neighs(lower_left, 0, &[]).unwrap().is_empty());
        let mut around = patch.find_cell_vertex_neighs(lower_left, 3, &[]).unwrap();
        around.sort();
        let mut expected = vec![lower_right, upper_left, upper_right];
        expected.sort();
        assert_eq!(around, expected);
        let filtered = patch.find_cell_vertex_neighs(lower_left, 3, &[upper_right]).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(matches!(
            patch.find_cell_edge_neighs(lower_left, 0, &[]),
            Err(MeshError::FaceOutOfRange { .. })
        ));
    }

    #[test]
    fn ghost_marking_is_refused_and_owner_reported() {
        let patch = quad_patch();
        let id = patch.cells().next().unwrap().id();
        assert_eq!(patch.cell_owner(id).unwrap(), 0);
        assert!(patch.ghosts_by_rank().is_empty());
    }

    #[test]
    fn segment_contact() {
        let lower = [0.0, 0.0, 0.0];
        let upper = [1.0, 1.0, 1.0];
        // along an edge of the box
        assert!(shares_segment(lower, upper, [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], 1e-12));
        // touching at a single end point only
        assert!(!shares_segment(lower, upper, [1.0, 1.0, 1.0], [1.0, 1.0, 2.0], 1e-12));
    }
}
