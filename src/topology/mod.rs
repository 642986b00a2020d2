//! Mesh entities and the bookkeeping tying them to tree leaves.
//!
//! This module provides:
//! - [`EntityId`](id::EntityId), the non-zero id shared by cells, interfaces
//!   and vertices
//! - element types and their local face numbering
//! - per-face neighbourhood storage and the [`Cell`](cell::Cell),
//!   [`Interface`](interface::Interface) and [`Vertex`](vertex::Vertex)
//!   entities
//! - cell ownership across ranks and the octant/cell index

pub mod cell;
pub mod element_type;
pub mod id;
pub mod interface;
pub mod neighbourhood;
pub mod octant_index;
pub mod ownership;
pub mod vertex;

pub use cell::Cell;
pub use element_type::ElementType;
pub use id::EntityId;
pub use interface::{Interface, InterfaceSide};
pub use octant_index::OctantIndex;
pub use vertex::Vertex;
