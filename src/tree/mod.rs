//! Spatial tree service consumed by octree patches.
//!
//! The synchronization engine never walks a tree directly: it talks to a
//! [`SpatialTree`], which exposes leaf geometry, neighbour searches, the
//! change mapping produced by the last adapt, and partition bookkeeping.
//! [`LinearTree`] is the in-crate implementation.
//!
//! # Local entity numbering
//!
//! Octant nodes follow the bit order of [`ElementType::Voxel`]: node `k` sits
//! at the upper end of axis `a` when bit `a` of `k` is set. Face `2a` is the
//! lower face along axis `a`, face `2a + 1` the upper one. Edges (3D only)
//! are numbered by the pair of faces they lie on, see [`faces_on_edge`].
//!
//! [`ElementType::Voxel`]: crate::topology::element_type::ElementType::Voxel

pub mod linear;

use std::collections::BTreeMap;
use std::ops::Range;

use crate::mesh_error::MeshError;

pub use linear::{LinearTree, OcTree, QuadTree};

/// Address of a tree leaf: a tree-local index plus the internal/ghost flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OctantInfo {
    pub id: u32,
    pub internal: bool,
}

impl OctantInfo {
    #[inline]
    pub fn internal(id: u32) -> Self {
        Self { id, internal: true }
    }

    #[inline]
    pub fn ghost(id: u32) -> Self {
        Self {
            id,
            internal: false,
        }
    }
}

/// One previous leaf a current leaf descends from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MappedOctant {
    /// Previous tree-local index (internal or ghost numbering).
    pub id: u32,
    /// Whether the previous leaf was a ghost.
    pub ghost: bool,
    /// Rank that owned the previous leaf.
    pub rank: usize,
}

impl MappedOctant {
    /// The previous leaf as an index address.
    #[inline]
    pub fn info(&self) -> OctantInfo {
        OctantInfo {
            id: self.id,
            internal: !self.ghost,
        }
    }
}

/// The last mutation applied to the tree.
///
/// Passed explicitly to the synchronization so each pass knows how the
/// current leaves relate to the previous ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TreeOperation {
    /// Freshly built tree, nothing imported yet.
    #[default]
    Initialization,
    /// Adapt that recorded the change mapping.
    AdaptionMapped,
    /// Adapt that did not record the change mapping.
    AdaptionUnmapped,
    /// Repartition across processes.
    LoadBalance,
}

/// Leaves sent away by the last load balance: rank to previous local ranges.
pub type SentRanges = BTreeMap<usize, Vec<Range<u32>>>;

/// Operations an octree patch needs from its spatial index.
pub trait SpatialTree {
    /// Space dimension (2 or 3).
    fn dimension(&self) -> usize;

    /// Rank of this process.
    fn rank(&self) -> usize;

    /// Number of processes sharing the tree.
    fn n_procs(&self) -> usize;

    /// Number of internal (locally owned) leaves.
    fn octant_count(&self) -> usize;

    /// Number of ghost leaves.
    fn ghost_count(&self) -> usize;

    /// Maximum refinement level a leaf may reach.
    fn max_level(&self) -> u8;

    /// Deepest level among the current leaves.
    fn max_depth(&self) -> u8;

    fn level(&self, octant: OctantInfo) -> Result<u8, MeshError>;

    /// Morton code of the leaf anchor on the finest grid.
    fn morton(&self, octant: OctantInfo) -> Result<u64, MeshError>;

    fn centre(&self, octant: OctantInfo) -> Result<[f64; 3], MeshError>;

    fn node_coords(&self, octant: OctantInfo, node: usize) -> Result<[f64; 3], MeshError>;

    /// Quantized identity of a leaf node, equal for every leaf sharing it.
    fn node_morton(&self, octant: OctantInfo, node: usize) -> Result<u64, MeshError>;

    /// Previous leaves the internal leaf `id` descends from.
    ///
    /// Only available after an adapt that recorded the mapping or after a
    /// load balance.
    fn mapping(&self, id: u32) -> Result<Vec<MappedOctant>, MeshError>;

    /// Whether internal leaf `id` was created by the last refinement.
    fn is_new_r(&self, id: u32) -> bool;

    /// Whether internal leaf `id` was created by the last coarsening.
    fn is_new_c(&self, id: u32) -> bool;

    /// Face opposite to `face`.
    fn opposite_face(&self, face: usize) -> usize {
        face ^ 1
    }

    /// Internal and ghost leaves touching the given entity of internal leaf `id`.
    ///
    /// `codim` is 1 for faces, `dimension - 1` for edges in 3D and
    /// `dimension` for vertices.
    fn find_neighbours(&self, id: u32, entity: usize, codim: usize) -> Result<Vec<OctantInfo>, MeshError>;

    /// Internal leaves touching the given entity of ghost leaf `id`.
    fn find_ghost_neighbours(&self, id: u32, entity: usize, codim: usize) -> Result<Vec<OctantInfo>, MeshError>;

    /// Refinement (positive) or coarsening (negative) request for leaf `id`.
    fn set_marker(&mut self, id: u32, marker: i8) -> Result<(), MeshError>;

    fn marker(&self, id: u32) -> Result<i8, MeshError>;

    /// Whether leaf `id` takes part in 2:1 balancing.
    fn set_balance(&mut self, id: u32, enabled: bool) -> Result<(), MeshError>;

    /// Apply the pending markers. Returns `false` when nothing changed.
    fn adapt(&mut self, mapping: bool) -> Result<bool, MeshError>;

    /// Redistribute leaves evenly among processes. Returns `false` when the
    /// partition did not change.
    fn load_balance(&mut self) -> Result<bool, MeshError>;

    /// Previous local ranges sent to other ranks by the last load balance.
    fn sent_ranges(&self) -> SentRanges;

    /// Rank owning ghost leaf `id`.
    fn ghost_owner(&self, id: u32) -> Result<usize, MeshError>;

    /// Internal leaf containing `point`, if any.
    fn point_owner(&self, point: [f64; 3]) -> Option<u32>;

    fn tolerance(&self) -> f64;

    fn set_tolerance(&mut self, tolerance: f64);

    /// Restore the default tolerance.
    fn reset_tolerance(&mut self);

    fn origin(&self) -> [f64; 3];

    fn set_origin(&mut self, origin: [f64; 3]);

    /// Edge length of the root octant.
    fn length(&self) -> f64;

    fn set_length(&mut self, length: f64);
}

const FACES_ON_EDGE: [[usize; 2]; 12] = [
    [0, 4],
    [1, 4],
    [2, 4],
    [3, 4],
    [0, 2],
    [1, 2],
    [0, 3],
    [1, 3],
    [0, 5],
    [1, 5],
    [2, 5],
    [3, 5],
];

/// Number of local faces of an octant.
#[inline]
pub fn face_count(dimension: usize) -> usize {
    2 * dimension
}

/// Number of local nodes of an octant.
#[inline]
pub fn node_count(dimension: usize) -> usize {
    1 << dimension
}

/// Number of local edges of an octant (0 in 2D, where edges are faces).
#[inline]
pub fn edge_count(dimension: usize) -> usize {
    if dimension == 3 { 12 } else { 0 }
}

/// Number of local entities of the given codimension.
pub fn entity_count(dimension: usize, codim: usize) -> usize {
    match (dimension, codim) {
        (_, 1) => face_count(dimension),
        (3, 2) => edge_count(3),
        (d, c) if c == d => node_count(d),
        _ => 0,
    }
}

/// The two faces an edge lies on (3D).
pub fn faces_on_edge(edge: usize) -> Option<[usize; 2]> {
    FACES_ON_EDGE.get(edge).copied()
}

/// Faces incident to a node, one per axis.
pub fn faces_on_node(dimension: usize, node: usize) -> Vec<usize> {
    (0..dimension)
        .map(|axis| 2 * axis + ((node >> axis) & 1))
        .collect()
}

/// Edges incident to a node (3D), one per axis.
pub fn edges_on_node(node: usize) -> Vec<usize> {
    let faces = faces_on_node(3, node);
    FACES_ON_EDGE
        .iter()
        .enumerate()
        .filter(|(_, pair)| pair.iter().all(|f| faces.contains(f)))
        .map(|(edge, _)| edge)
        .collect()
}

/// Offset from an octant to the box across one of its entities, per axis
/// in `{-1, 0, 1}`.
pub fn entity_offset(dimension: usize, codim: usize, entity: usize) -> Option<[i32; 3]> {
    let mut offset = [0i32; 3];
    let mut apply_face = |face: usize| {
        offset[face / 2] = if face % 2 == 0 { -1 } else { 1 };
    };
    if codim == dimension {
        if entity >= node_count(dimension) {
            return None;
        }
        faces_on_node(dimension, entity).into_iter().for_each(&mut apply_face);
    } else if codim == 1 {
        if entity >= face_count(dimension) {
            return None;
        }
        apply_face(entity);
    } else if dimension == 3 && codim == 2 {
        faces_on_edge(entity)?.into_iter().for_each(&mut apply_face);
    } else {
        return None;
    }
    Some(offset)
}
