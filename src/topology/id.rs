//! `EntityId`: a strong, zero-cost handle for patch entities
//!
//! Cells, interfaces and vertices of a patch are addressed by a unique,
//! opaque identifier. `EntityId` wraps a nonzero `u64` so that 0 is reserved
//! as the null sentinel; `Option<EntityId>` is the nullable form and has the
//! same size as the id itself.
//!
//! Ids are dense per entity kind (the patch hands out the lowest free id) and
//! are reused once the entity that held them has been removed and the store
//! committed.

use crate::mesh_error::MeshError;
use std::{fmt, num::NonZeroU64};

/// Identifier of a cell, interface or vertex of a patch.
///
/// # Memory layout
/// `repr(transparent)` over `NonZeroU64`: the id has the ABI of a `u64` and
/// can be exchanged with peers as one.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    bytemuck::NoUninit,
)]
#[repr(transparent)]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    ///
    /// Returns [`MeshError::InvalidEntityId`] if `raw == 0`.
    ///
    /// ```rust
    /// # use octree_patch::topology::id::EntityId;
    /// let id = EntityId::new(1).unwrap();
    /// assert_eq!(id.get(), 1);
    /// assert!(EntityId::new(0).is_err());
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshError> {
        NonZeroU64::new(raw)
            .map(EntityId)
            .ok_or(MeshError::InvalidEntityId)
    }

    /// Returns the inner `u64` value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Zero-based slot of the id, for dense arrays indexed by entity.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Inverse of [`EntityId::index`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        // index + 1 never wraps to zero for any usize that fits in memory
        EntityId(NonZeroU64::MIN.saturating_add(index as u64))
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.get()).finish()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u64> for EntityId {
    type Error = MeshError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        EntityId::new(raw)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.get()
    }
}

/// Peers exchange ids as plain `u64` values.
#[cfg(feature = "mpi-support")]
unsafe impl mpi::datatype::Equivalence for EntityId {
    type Out = <u64 as mpi::datatype::Equivalence>::Out;

    fn equivalent_datatype() -> Self::Out {
        u64::equivalent_datatype()
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(EntityId, u64);
    assert_eq_size!(Option<EntityId>, u64);
    assert_eq_align!(EntityId, u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(EntityId::new(0), Err(MeshError::InvalidEntityId));
    }

    #[test]
    fn index_round_trip() {
        for raw in [1u64, 2, 17, 1 << 40] {
            let id = EntityId::new(raw).unwrap();
            assert_eq!(EntityId::from_index(id.index()), id);
        }
        assert_eq!(EntityId::from_index(0).get(), 1);
    }

    #[test]
    fn debug_and_display() {
        let id = EntityId::new(7).unwrap();
        assert_eq!(format!("{:?}", id), "EntityId(7)");
        assert_eq!(format!("{}", id), "7");
    }

    #[test]
    fn json_roundtrip() {
        let id = EntityId::new(123).unwrap();
        let s = serde_json::to_string(&id).unwrap();
        let back: EntityId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn bincode_roundtrip() {
        let id = EntityId::new(456).unwrap();
        let bytes = bincode::serialize(&id).unwrap();
        let back: EntityId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, id);
    }
}
