//! MeshError: unified error type for octree-patch public APIs
//!
//! Every fallible operation of the crate reports through this enum. Variants
//! documented as *fatal* leave the patch in an unspecified state: the caller
//! must drop or rebuild the patch rather than retry the operation.

use crate::topology::id::EntityId;
use thiserror::Error;

/// Unified error type for patch, index and synchronization operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Attempted to construct an [`EntityId`] with a zero value.
    #[error("EntityId must be non-zero (0 is reserved as the null id)")]
    InvalidEntityId,

    /// A synchronization was requested after an adaption that did not build
    /// the change mapping, while the mesh still holds cells. Fatal.
    #[error("unable to sync the patch after an unmapped adaption")]
    UnmappedAdaption,

    /// A live cell has no entry in the octant index. Fatal.
    #[error("index corrupted: cell {0} has no associated octant")]
    CellWithoutOctant(EntityId),

    /// An octant that must be imported has no cell assigned. Fatal.
    #[error("index corrupted: octant {id} (internal: {internal}) has no associated cell")]
    OctantWithoutCell { id: u32, internal: bool },

    /// The requested cell is not stored in the patch.
    #[error("cell {0} not found")]
    MissingCell(EntityId),

    /// The requested interface is not stored in the patch.
    #[error("interface {0} not found")]
    MissingInterface(EntityId),

    /// The requested vertex is not stored in the patch.
    #[error("vertex {0} not found")]
    MissingVertex(EntityId),

    /// An entity with the given id already exists.
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    /// Face index outside the face range of an element.
    #[error("face {face} out of range (element has {count} faces)")]
    FaceOutOfRange { face: usize, count: usize },

    /// Entry index outside the list stored for a face.
    #[error("entry {index} out of range for face {face} (face holds {count} entries)")]
    EntryOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    /// Neighbourhood data was requested on a cell that does not store it.
    #[error("neighbourhood storage is disabled for this cell")]
    NeighbourhoodDisabled,

    /// Connectivity does not match what the element type requires.
    #[error("invalid connectivity: expected {expected} entries, found {found}")]
    InvalidConnectivity { expected: usize, found: usize },

    /// Only uniform scaling is supported by octree patches. Not fatal: the
    /// patch is left untouched.
    #[error("octree patch only allows uniform scaling, got {0:?}")]
    NonUniformScaling([f64; 3]),

    /// Only two- and three-dimensional patches are supported.
    #[error("unsupported dimension {0} (expected 2 or 3)")]
    UnsupportedDimension(usize),

    /// Tree-level request that cannot be honoured (index out of range,
    /// marker on a ghost, level above the maximum, ...).
    #[error("tree error: {0}")]
    Tree(String),

    /// A structural invariant does not hold. Fatal.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
