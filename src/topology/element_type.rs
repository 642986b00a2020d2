//! Element type metadata for patch entities.
//!
//! Tensor-product elements (`Pixel`, `Voxel`) follow the tree node order:
//! local vertex `k` sits at the `x` end selected by bit 0 of `k`, the `y` end
//! selected by bit 1 and, in 3D, the `z` end selected by bit 2. Face `2 * axis`
//! is the lower face along `axis` and face `2 * axis + 1` the upper one, so
//! the face opposite to `f` is always `f ^ 1`.

/// Geometric element types known to the patch.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize,
)]
pub enum ElementType {
    /// Placeholder for a cell whose shape is not known yet.
    #[default]
    Undefined,
    /// 0D point.
    Vertex,
    /// 1D segment.
    Line,
    /// 2D simplex.
    Triangle,
    /// 2D quadrilateral with counter-clockwise vertices.
    Quad,
    /// 2D axis-aligned quadrilateral in tree node order.
    Pixel,
    /// 3D simplex.
    Tetra,
    /// 3D hexahedron with VTK vertex order.
    Hexahedron,
    /// 3D axis-aligned hexahedron in tree node order.
    Voxel,
    /// 2D polygon whose vertex count is given by its connectivity.
    Polygon,
}

const LINE_FACES: &[&[usize]] = &[&[0], &[1]];
const TRIANGLE_FACES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 0]];
const QUAD_FACES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const PIXEL_FACES: &[&[usize]] = &[&[0, 2], &[1, 3], &[0, 1], &[2, 3]];
const TETRA_FACES: &[&[usize]] = &[&[1, 0, 2], &[0, 3, 2], &[3, 1, 2], &[0, 1, 3]];
const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[1, 0, 3, 2],
    &[4, 5, 6, 7],
    &[7, 3, 0, 4],
    &[5, 1, 2, 6],
    &[4, 0, 1, 5],
    &[6, 2, 3, 7],
];
const VOXEL_FACES: &[&[usize]] = &[
    &[0, 2, 4, 6],
    &[1, 3, 5, 7],
    &[0, 1, 4, 5],
    &[2, 3, 6, 7],
    &[0, 1, 2, 3],
    &[4, 5, 6, 7],
];

impl ElementType {
    /// Topological dimension, `None` for [`ElementType::Undefined`].
    pub fn dimension(self) -> Option<usize> {
        match self {
            ElementType::Undefined => None,
            ElementType::Vertex => Some(0),
            ElementType::Line => Some(1),
            ElementType::Triangle
            | ElementType::Quad
            | ElementType::Pixel
            | ElementType::Polygon => Some(2),
            ElementType::Tetra | ElementType::Hexahedron | ElementType::Voxel => Some(3),
        }
    }

    /// Fixed vertex count, `None` when the count is only known at run time.
    pub fn vertex_count(self) -> Option<usize> {
        match self {
            ElementType::Undefined | ElementType::Polygon => None,
            ElementType::Vertex => Some(1),
            ElementType::Line => Some(2),
            ElementType::Triangle => Some(3),
            ElementType::Quad | ElementType::Pixel | ElementType::Tetra => Some(4),
            ElementType::Hexahedron | ElementType::Voxel => Some(8),
        }
    }

    /// Whether the connectivity length is decided by the caller.
    pub fn has_dynamic_connectivity(self) -> bool {
        matches!(self, ElementType::Polygon | ElementType::Undefined)
    }

    /// Number of faces for an element with `connect_len` vertices.
    ///
    /// Returns 0 for [`ElementType::Undefined`] and [`ElementType::Vertex`].
    pub fn face_count(self, connect_len: usize) -> usize {
        match self {
            ElementType::Undefined | ElementType::Vertex => 0,
            ElementType::Polygon => connect_len,
            other => other.fixed_faces().len(),
        }
    }

    /// Local vertex indices of `face`, `None` when the face does not exist.
    pub fn face_connect(self, face: usize, connect_len: usize) -> Option<Vec<usize>> {
        match self {
            ElementType::Undefined | ElementType::Vertex => None,
            ElementType::Polygon => {
                (face < connect_len).then(|| vec![face, (face + 1) % connect_len])
            }
            other => other.fixed_faces().get(face).map(|local| local.to_vec()),
        }
    }

    /// Type of the entity bounding a face of this element.
    pub fn face_type(self) -> ElementType {
        match self {
            ElementType::Line => ElementType::Vertex,
            ElementType::Triangle
            | ElementType::Quad
            | ElementType::Pixel
            | ElementType::Polygon => ElementType::Line,
            ElementType::Tetra => ElementType::Triangle,
            ElementType::Hexahedron => ElementType::Quad,
            ElementType::Voxel => ElementType::Pixel,
            ElementType::Undefined | ElementType::Vertex => ElementType::Undefined,
        }
    }

    /// Tensor-product cell type used by octree patches of `dimension`.
    pub fn octant_cell(dimension: usize) -> Option<ElementType> {
        match dimension {
            2 => Some(ElementType::Pixel),
            3 => Some(ElementType::Voxel),
            _ => None,
        }
    }

    fn fixed_faces(self) -> &'static [&'static [usize]] {
        match self {
            ElementType::Line => LINE_FACES,
            ElementType::Triangle => TRIANGLE_FACES,
            ElementType::Quad => QUAD_FACES,
            ElementType::Pixel => PIXEL_FACES,
            ElementType::Tetra => TETRA_FACES,
            ElementType::Hexahedron => HEXAHEDRON_FACES,
            ElementType::Voxel => VOXEL_FACES,
            ElementType::Undefined | ElementType::Vertex | ElementType::Polygon => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensor_faces_follow_node_bits() {
        for (ty, dim) in [(ElementType::Pixel, 2usize), (ElementType::Voxel, 3)] {
            let n = ty.vertex_count().unwrap();
            assert_eq!(ty.face_count(n), 2 * dim);
            for face in 0..2 * dim {
                let axis = face / 2;
                let side = face % 2;
                let local = ty.face_connect(face, n).unwrap();
                assert_eq!(local.len(), 1 << (dim - 1));
                assert!(local.iter().all(|&k| (k >> axis) & 1 == side));
            }
        }
    }

    #[test]
    fn polygon_faces_wrap_around() {
        let ty = ElementType::Polygon;
        assert_eq!(ty.face_count(5), 5);
        assert_eq!(ty.face_connect(4, 5), Some(vec![4, 0]));
        assert_eq!(ty.face_connect(5, 5), None);
    }

    #[test]
    fn undefined_has_no_faces() {
        assert_eq!(ElementType::Undefined.face_count(12), 0);
        assert_eq!(ElementType::Undefined.dimension(), None);
        assert_eq!(ElementType::default(), ElementType::Undefined);
    }
}
