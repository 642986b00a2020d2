//! Cells: typed elements with per-face adjacency and interface lists.
//!
//! A cell owns its connectivity (vertex ids) and two
//! [`NeighbourhoodStorage`]s indexed by local face: the adjacent cells and
//! the bounding interfaces. Both lists are ordered and duplicate-free.
//!
//! The interior/ghost flag decides which half of the octant index a cell
//! lives in. It is fixed at construction: a cell that changes owner is
//! deleted and imported again.

use std::fmt;

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use crate::topology::id::EntityId;
use crate::topology::neighbourhood::NeighbourhoodStorage;

/// A cell of a patch.
///
/// The serialized form is the element state (id, type, connectivity,
/// interior flag) followed by the interfaces and then the adjacencies.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    id: EntityId,
    element_type: ElementType,
    connect: Vec<EntityId>,
    interior: bool,
    interfaces: NeighbourhoodStorage,
    adjacencies: NeighbourhoodStorage,
}

impl Cell {
    /// Create a cell without connectivity.
    ///
    /// Fixed-size types get their neighbourhood slots right away; run-time
    /// polytopes get them once connectivity is assigned.
    pub fn new(id: EntityId, element_type: ElementType, interior: bool, store: bool) -> Self {
        let mut cell = Self {
            id,
            element_type,
            connect: Vec::new(),
            interior,
            interfaces: NeighbourhoodStorage::disabled(),
            adjacencies: NeighbourhoodStorage::disabled(),
        };
        cell.init_neighbourhood(store);
        cell
    }

    /// Create a cell with the given connectivity.
    ///
    /// Fails when a fixed-size type receives the wrong number of vertices.
    pub fn with_connect(
        id: EntityId,
        element_type: ElementType,
        connect: Vec<EntityId>,
        interior: bool,
        store: bool,
    ) -> Result<Self, MeshError> {
        check_connect(element_type, connect.len())?;
        let mut cell = Self {
            id,
            element_type,
            connect,
            interior,
            interfaces: NeighbourhoodStorage::disabled(),
            adjacencies: NeighbourhoodStorage::disabled(),
        };
        cell.init_neighbourhood(store);
        Ok(cell)
    }

    /// Re-initialize the cell in place, dropping its connectivity.
    pub fn initialize(&mut self, id: EntityId, element_type: ElementType, interior: bool, store: bool) {
        self.id = id;
        self.element_type = element_type;
        self.connect.clear();
        self.interior = interior;
        self.init_neighbourhood(store);
    }

    /// Re-initialize the cell in place with new connectivity.
    pub fn initialize_with_connect(
        &mut self,
        id: EntityId,
        element_type: ElementType,
        connect: Vec<EntityId>,
        interior: bool,
        store: bool,
    ) -> Result<(), MeshError> {
        check_connect(element_type, connect.len())?;
        self.id = id;
        self.element_type = element_type;
        self.connect = connect;
        self.interior = interior;
        self.init_neighbourhood(store);
        Ok(())
    }

    /// Single entry point for (re)building the neighbourhood storages.
    ///
    /// Storages whose slot count already matches the face count are only
    /// emptied, the others are reallocated.
    fn init_neighbourhood(&mut self, store: bool) {
        let element_type = self.element_type;
        let connect_len = self.connect.len();
        let n_faces = element_type.face_count(connect_len);
        let keep = store && element_type != ElementType::Undefined && n_faces > 0;
        for storage in [&mut self.interfaces, &mut self.adjacencies] {
            if keep && storage.is_enabled() && storage.face_count() == n_faces {
                storage.clear_entries();
            } else {
                *storage = NeighbourhoodStorage::for_element(element_type, connect_len, store);
            }
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

    /// Whether the cell is owned by this process (as opposed to a ghost).
    #[inline]
    pub fn is_interior(&self) -> bool {
        self.interior
    }

    /// Vertex ids in local vertex order.
    #[inline]
    pub fn connect(&self) -> &[EntityId] {
        &self.connect
    }

    /// Replace the connectivity; neighbourhood slots follow the new face count.
    pub fn set_connect(&mut self, connect: Vec<EntityId>, store: bool) -> Result<(), MeshError> {
        check_connect(self.element_type, connect.len())?;
        let before = self.face_count();
        self.connect = connect;
        if self.face_count() != before {
            self.init_neighbourhood(store);
        }
        Ok(())
    }

    /// The `k`-th vertex.
    pub fn vertex(&self, k: usize) -> Option<EntityId> {
        self.connect.get(k).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.connect.len()
    }

    pub fn face_count(&self) -> usize {
        self.element_type.face_count(self.connect.len())
    }

    /// Vertex ids of `face`, in the element's local face order.
    pub fn face_vertices(&self, face: usize) -> Result<Vec<EntityId>, MeshError> {
        let local = self
            .element_type
            .face_connect(face, self.connect.len())
            .ok_or(MeshError::FaceOutOfRange {
                face,
                count: self.face_count(),
            })?;
        local
            .into_iter()
            .map(|k| {
                self.connect.get(k).copied().ok_or(MeshError::InvalidConnectivity {
                    expected: k + 1,
                    found: self.connect.len(),
                })
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Interfaces
    // ---------------------------------------------------------------------

    /// Raw interface storage.
    pub fn interface_storage(&self) -> &NeighbourhoodStorage {
        &self.interfaces
    }

    /// Re-create the interface slots (`store == false` disables them).
    pub fn reset_interfaces(&mut self, store: bool) {
        self.interfaces =
            NeighbourhoodStorage::for_element(self.element_type, self.connect.len(), store);
    }

    /// Drop interface storage altogether.
    pub fn delete_interfaces(&mut self) {
        self.reset_interfaces(false);
    }

    pub fn set_interfaces(&mut self, lists: &[Vec<EntityId>]) -> Result<(), MeshError> {
        if self.element_type == ElementType::Undefined {
            return Ok(());
        }
        self.interfaces.set_all(lists)
    }

    pub fn set_interface(&mut self, face: usize, index: usize, interface: EntityId) -> Result<(), MeshError> {
        self.interfaces.set(face, index, interface)
    }

    /// Link `interface` to `face`; no-op if already linked.
    pub fn push_interface(&mut self, face: usize, interface: EntityId) -> Result<bool, MeshError> {
        self.interfaces.push(face, interface)
    }

    pub fn delete_interface(&mut self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        self.interfaces.erase(face, index)
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn face_interface_count(&self, face: usize) -> usize {
        self.interfaces.count(face)
    }

    pub fn interface(&self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        self.interfaces.get(face, index)
    }

    pub fn interfaces(&self) -> &[EntityId] {
        self.interfaces.items()
    }

    pub fn face_interfaces(&self, face: usize) -> &[EntityId] {
        self.interfaces.face(face)
    }

    pub fn find_interface(&self, face: usize, interface: EntityId) -> Option<usize> {
        self.interfaces.find(face, interface)
    }

    pub fn find_interface_any(&self, interface: EntityId) -> Option<usize> {
        self.interfaces.find_any(interface)
    }

    // ---------------------------------------------------------------------
    // Adjacencies
    // ---------------------------------------------------------------------

    /// Raw adjacency storage.
    pub fn adjacency_storage(&self) -> &NeighbourhoodStorage {
        &self.adjacencies
    }

    /// Re-create the adjacency slots (`store == false` disables them).
    pub fn reset_adjacencies(&mut self, store: bool) {
        self.adjacencies =
            NeighbourhoodStorage::for_element(self.element_type, self.connect.len(), store);
    }

    /// Drop adjacency storage altogether.
    pub fn delete_adjacencies(&mut self) {
        self.reset_adjacencies(false);
    }

    pub fn set_adjacencies(&mut self, lists: &[Vec<EntityId>]) -> Result<(), MeshError> {
        if self.element_type == ElementType::Undefined {
            return Ok(());
        }
        self.adjacencies.set_all(lists)
    }

    pub fn set_adjacency(&mut self, face: usize, index: usize, adjacency: EntityId) -> Result<(), MeshError> {
        self.adjacencies.set(face, index, adjacency)
    }

    /// Link the neighbour `adjacency` to `face`; no-op if already linked.
    pub fn push_adjacency(&mut self, face: usize, adjacency: EntityId) -> Result<bool, MeshError> {
        self.adjacencies.push(face, adjacency)
    }

    pub fn delete_adjacency(&mut self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        self.adjacencies.erase(face, index)
    }

    pub fn adjacency_count(&self) -> usize {
        self.adjacencies.len()
    }

    pub fn face_adjacency_count(&self, face: usize) -> usize {
        self.adjacencies.count(face)
    }

    pub fn adjacency(&self, face: usize, index: usize) -> Result<EntityId, MeshError> {
        self.adjacencies.get(face, index)
    }

    pub fn adjacencies(&self) -> &[EntityId] {
        self.adjacencies.items()
    }

    pub fn face_adjacencies(&self, face: usize) -> &[EntityId] {
        self.adjacencies.face(face)
    }

    pub fn find_adjacency(&self, face: usize, adjacency: EntityId) -> Option<usize> {
        self.adjacencies.find(face, adjacency)
    }

    pub fn find_adjacency_any(&self, adjacency: EntityId) -> Option<usize> {
        self.adjacencies.find_any(adjacency)
    }

    /// A face is a border when no cell is linked to it.
    pub fn is_face_border(&self, face: usize) -> bool {
        self.adjacencies.count(face) == 0
    }

    /// Size in bytes of the serialized payload.
    pub fn binary_size(&self) -> usize {
        let element = std::mem::size_of::<u64>() * (3 + self.connect.len()) + 1;
        element + self.interfaces.binary_size() + self.adjacencies.binary_size()
    }
}

fn check_connect(element_type: ElementType, len: usize) -> Result<(), MeshError> {
    match element_type.vertex_count() {
        Some(expected) if expected != len => Err(MeshError::InvalidConnectivity {
            expected,
            found: len,
        }),
        _ => Ok(()),
    }
}

fn write_lists(f: &mut fmt::Formatter<'_>, storage: &NeighbourhoodStorage) -> fmt::Result {
    write!(f, "[")?;
    for face in 0..storage.face_count() {
        let entries = storage.face(face);
        if entries.is_empty() {
            write!(f, " [n.a.]")?;
        } else {
            let joined: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
            write!(f, " [{}]", joined.join(", "))?;
        }
    }
    write!(f, " ]")
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.element_type == ElementType::Undefined {
            return writeln!(f, "cell type:    (unknown)");
        }
        writeln!(f, "cell type:    {:?}", self.element_type)?;
        writeln!(f, "ID:           {}", self.id)?;
        writeln!(f, "is ghost:     ({})", !self.interior)?;
        let connect: Vec<String> = self.connect.iter().map(|v| v.to_string()).collect();
        writeln!(f, "connectivity: [ {} ]", connect.join(", "))?;
        if self.adjacencies.is_enabled() {
            write!(f, "neighbors:    ")?;
            write_lists(f, &self.adjacencies)?;
            writeln!(f)?;
        }
        if self.interfaces.is_enabled() {
            write!(f, "interfaces:   ")?;
            write_lists(f, &self.interfaces)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
