#![cfg_attr(docsrs, feature(doc_cfg))]
//! # octree-patch
//!
//! octree-patch keeps an unstructured mesh (vertices, cells, interfaces and
//! face adjacencies) in sync with the leaves of an adaptive quadtree or
//! octree. After every refinement, coarsening or repartitioning of the tree,
//! one synchronization pass updates the mesh incrementally and reports what
//! changed as a list of [`AdaptionInfo`](adapt::AdaptionInfo) records, ready
//! to drive data remapping and cross-process exchange.
//!
//! ## Features
//! - [`OctreePatch`](patch::OctreePatch): the mesh container and its geometry
//!   and neighbour queries
//! - A pluggable [`SpatialTree`](tree::SpatialTree) service, with the
//!   in-crate [`LinearTree`](tree::LinearTree) (Morton-ordered leaves, 2:1
//!   balance, replicated-partition load balancing)
//! - Change tracking with identical partition-transfer ordering on the
//!   sending and the receiving rank
//! - Opt-in structural checks through [`DebugInvariants`]
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! octree-patch = "0.1"
//! # Optional features:
//! # features = ["mpi-support", "check-invariants"]
//! ```
//!
//! ```
//! use octree_patch::prelude::*;
//!
//! let config = PatchConfig { dimension: 2, dh: 0.25, ..PatchConfig::default() };
//! let mut patch = OctreePatch::<QuadTree>::new(&config)?;
//! patch.update(false)?;
//! assert_eq!(patch.cell_count(), 16);
//!
//! let cell = patch.locate_point([0.1, 0.1, 0.0]).unwrap();
//! patch.mark_cell_for_refinement(cell)?;
//! let infos = patch.update(true)?;
//! assert!(infos.iter().any(|i| i.kind == AdaptionType::Refinement));
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Invariants
//!
//! Passes validate the patch on exit in debug builds, or with the
//! `check-invariants` / `strict-invariants` features in release builds. A
//! pass that returns an error leaves the patch in an unspecified state.

pub mod adapt;
pub mod data;
pub mod debug_invariants;
pub mod mesh_error;
pub mod patch;
pub mod topology;
pub mod tree;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::adapt::{AdaptionEntity, AdaptionInfo, AdaptionType};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshError;
    pub use crate::patch::{OctreePatch, PatchConfig};
    pub use crate::topology::cell::Cell;
    pub use crate::topology::element_type::ElementType;
    pub use crate::topology::id::EntityId;
    pub use crate::topology::interface::{Interface, InterfaceSide};
    pub use crate::topology::vertex::Vertex;
    pub use crate::tree::{LinearTree, OcTree, OctantInfo, QuadTree, SpatialTree, TreeOperation};
}
