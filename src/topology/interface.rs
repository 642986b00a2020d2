//! Interfaces: the entities separating two cells (or one cell from the
//! domain border).

use crate::topology::element_type::ElementType;
use crate::topology::id::EntityId;

/// One side of an interface: a cell and the local face it is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct InterfaceSide {
    pub cell: EntityId,
    pub face: usize,
}

/// An interface of a patch.
///
/// The owner side always exists; the neighbour side is absent for border
/// interfaces. The connectivity is the owner face's vertices.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interface {
    id: EntityId,
    element_type: ElementType,
    connect: Vec<EntityId>,
    owner: InterfaceSide,
    neigh: Option<InterfaceSide>,
}

impl Interface {
    pub fn new(
        id: EntityId,
        element_type: ElementType,
        connect: Vec<EntityId>,
        owner: InterfaceSide,
        neigh: Option<InterfaceSide>,
    ) -> Self {
        Self {
            id,
            element_type,
            connect,
            owner,
            neigh,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[inline]
    pub fn connect(&self) -> &[EntityId] {
        &self.connect
    }

    #[inline]
    pub fn owner(&self) -> InterfaceSide {
        self.owner
    }

    #[inline]
    pub fn neigh(&self) -> Option<InterfaceSide> {
        self.neigh
    }

    /// An interface with no neighbour lies on the border.
    #[inline]
    pub fn is_border(&self) -> bool {
        self.neigh.is_none()
    }

    /// The side attached to `cell`, if any.
    pub fn side_of(&self, cell: EntityId) -> Option<InterfaceSide> {
        if self.owner.cell == cell {
            Some(self.owner)
        } else {
            self.neigh.filter(|n| n.cell == cell)
        }
    }

    /// The side facing `cell` from across the interface.
    pub fn other_side(&self, cell: EntityId) -> Option<InterfaceSide> {
        if self.owner.cell == cell {
            self.neigh
        } else if self.neigh.is_some_and(|n| n.cell == cell) {
            Some(self.owner)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn sides_are_resolved_from_either_cell() {
        let owner = InterfaceSide { cell: id(1), face: 1 };
        let neigh = InterfaceSide { cell: id(2), face: 0 };
        let iface = Interface::new(id(5), ElementType::Line, vec![id(3), id(4)], owner, Some(neigh));
        assert!(!iface.is_border());
        assert_eq!(iface.side_of(id(2)), Some(neigh));
        assert_eq!(iface.other_side(id(2)), Some(owner));
        assert_eq!(iface.other_side(id(1)), Some(neigh));
        assert_eq!(iface.other_side(id(9)), None);
    }

    #[test]
    fn border_has_no_other_side() {
        let owner = InterfaceSide { cell: id(1), face: 3 };
        let iface = Interface::new(id(5), ElementType::Line, vec![id(3), id(4)], owner, None);
        assert!(iface.is_border());
        assert_eq!(iface.other_side(id(1)), None);
    }
}
