//! Patch vertices.

use crate::topology::id::EntityId;

/// A vertex of a patch: an id and its coordinates (`z = 0` in 2D).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    id: EntityId,
    coords: [f64; 3],
}

impl Vertex {
    pub fn new(id: EntityId, coords: [f64; 3]) -> Self {
        Self { id, coords }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    pub(crate) fn translate(&mut self, offset: [f64; 3]) {
        for (c, o) in self.coords.iter_mut().zip(offset) {
            *c += o;
        }
    }

    pub(crate) fn scale(&mut self, factor: f64, center: [f64; 3]) {
        for (c, o) in self.coords.iter_mut().zip(center) {
            *c = o + (*c - o) * factor;
        }
    }
}
