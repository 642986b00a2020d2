//! Per-face lists of linked entities.
//!
//! [`NeighbourhoodStorage`] is a flat two-level container: for every local
//! face of an element it stores an ordered, duplicate-free list of entity ids
//! (adjacent cells or bounding interfaces). The lists live in a single buffer
//! addressed by an offset table, so a cell with six faces costs two
//! allocations no matter how many neighbours it has.
//!
//! A *disabled* storage has no slot at all and rejects writes; an *enabled*
//! one has exactly one slot per face. A slot with no entries is the
//! placeholder of an unlinked face.

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use crate::topology::id::EntityId;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NeighbourhoodStorage {
    /// `offsets[f]..offsets[f + 1]` is the range of face `f` in `items`.
    /// Empty when the storage is disabled.
    offsets: Vec<usize>,
    items: Vec<EntityId>,
}

impl NeighbourhoodStorage {
    /// A storage that holds no slots.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// An enabled storage with `n_faces` empty slots.
    pub fn with_faces(n_faces: usize) -> Self {
        if n_faces == 0 {
            return Self::disabled();
        }
        Self {
            offsets: vec![0; n_faces + 1],
            items: Vec::new(),
        }
    }

    /// Storage sized for an element.
    ///
    /// Disabled when `store` is false, the type is undefined or the element
    /// has no faces; otherwise one empty slot per face.
    pub fn for_element(element_type: ElementType, connect_len: usize, store: bool) -> Self {
        if !store || element_type == ElementType::Undefined {
            return Self::disabled();
        }
        Self::with_faces(element_type.face_count(connect_len))
    }

    /// Whether the storage has slots.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// Number of face slots.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of entries over all faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no face holds an entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries stored for `face`; 0 for a missing slot.
    pub fn count(&self, face: usize) -> usize {
        self.range(face).map_or(0, |r| r.len())
    }

    /// Entries of `face`, empty for a missing slot.
    pub fn face(&self, face: usize) -> &[EntityId] {
        match self.range(face) {
            Some(r) => &self.items[r],
            None => &[],
        }
    }

    /// All entries, face after face.
    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    /// Iterate `(face, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, EntityId)> + '_ {
        (0..self.face_count()).flat_map(move |f| self.face(f).iter().map(move |&id| (f, id)))
    }

    /// The `index`-th entry of `face`.
    pub fn get(&self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        let entries = self.checked_face(face)?;
        entries
            .get(index)
            .copied()
            .ok_or(MeshError::EntryOutOfRange {
                face,
                index,
                count: entries.len(),
            })
    }

    /// Position of `id` within `face`.
    pub fn find(&self, face: usize, id: EntityId) -> Option<usize> {
        self.face(face).iter().position(|&e| e == id)
    }

    /// Position of the first occurrence of `id` in the flattened entries.
    pub fn find_any(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|&e| e == id)
    }

    /// Face holding the first occurrence of `id`.
    pub fn face_of(&self, id: EntityId) -> Option<usize> {
        let pos = self.find_any(id)?;
        // offsets are non-decreasing; the face is the last one starting at or before pos
        Some(self.offsets.partition_point(|&o| o <= pos) - 1)
    }

    /// Append `id` to `face` unless it is already there.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn push(&mut self, face: usize, id: EntityId) -> Result<bool, MeshError> {
        if self.checked_face(face)?.contains(&id) {
            return Ok(false);
        }
        let at = self.offsets[face + 1];
        self.items.insert(at, id);
        for offset in &mut self.offsets[face + 1..] {
            *offset += 1;
        }
        Ok(true)
    }

    /// Overwrite the `index`-th entry of `face`.
    pub fn set(&mut self, face: usize, index: usize, id: EntityId) -> Result<(), MeshError> {
        let count = self.checked_face(face)?.len();
        if index >= count {
            return Err(MeshError::EntryOutOfRange { face, index, count });
        }
        let at = self.offsets[face] + index;
        self.items[at] = id;
        Ok(())
    }

    /// Remove the `index`-th entry of `face`. The slot may become empty.
    pub fn erase(&mut self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        let count = self.checked_face(face)?.len();
        if index >= count {
            return Err(MeshError::EntryOutOfRange { face, index, count });
        }
        let removed = self.items.remove(self.offsets[face] + index);
        for offset in &mut self.offsets[face + 1..] {
            *offset -= 1;
        }
        Ok(removed)
    }

    /// Remove `id` from `face` if present.
    pub fn remove(&mut self, face: usize, id: EntityId) -> Result<bool, MeshError> {
        match self.find(face, id) {
            Some(index) => self.erase(face, index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Replace the content of every slot. Duplicates inside a face are dropped.
    pub fn set_all(&mut self, lists: &[Vec<EntityId>]) -> Result<(), MeshError> {
        if lists.len() != self.face_count() {
            return Err(MeshError::InvalidConnectivity {
                expected: self.face_count(),
                found: lists.len(),
            });
        }
        self.items.clear();
        for face in 0..lists.len() {
            self.offsets[face + 1] = self.offsets[face];
        }
        for (face, list) in lists.iter().enumerate() {
            for &id in list {
                self.push(face, id)?;
            }
        }
        Ok(())
    }

    /// Empty every slot, keeping the slot count.
    pub fn clear_entries(&mut self) {
        self.items.clear();
        self.offsets.iter_mut().for_each(|o| *o = 0);
    }

    /// Size in bytes of the raw payload (offsets plus entries).
    pub fn binary_size(&self) -> usize {
        std::mem::size_of::<u64>() * (1 + self.offsets.len() + self.items.len())
    }

    /// Raw byte view of the entries, for interop with exchange buffers.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.items)
    }

    fn range(&self, face: usize) -> Option<std::ops::Range<usize>> {
        if face + 1 < self.offsets.len() {
            Some(self.offsets[face]..self.offsets[face + 1])
        } else {
            None
        }
    }

    fn checked_face(&self, face: usize) -> Result<&[EntityId], MeshError> {
        if !self.is_enabled() {
            return Err(MeshError::NeighbourhoodDisabled);
        }
        match self.range(face) {
            Some(r) => Ok(&self.items[r]),
            None => Err(MeshError::FaceOutOfRange {
                face,
                count: self.face_count(),
            }),
        }
    }
}
