#![allow(dead_code)]
use octree_patch::prelude::*;

/// Uniform quadtree patch over the unit square, already imported.
pub fn quad_patch(level: u8) -> OctreePatch<QuadTree> {
    let config = PatchConfig {
        dimension: 2,
        dh: 1.0 / f64::from(1u32 << level),
        max_level: 8,
        ..PatchConfig::default()
    };
    let mut patch = OctreePatch::<QuadTree>::new(&config).unwrap();
    patch.update(false).unwrap();
    patch
}

/// Uniform octree patch over the unit cube, already imported.
pub fn oct_patch(level: u8) -> OctreePatch<OcTree> {
    let config = PatchConfig {
        dimension: 3,
        dh: 1.0 / f64::from(1u32 << level),
        max_level: 6,
        ..PatchConfig::default()
    };
    let mut patch = OctreePatch::<OcTree>::new(&config).unwrap();
    patch.update(false).unwrap();
    patch
}

/// Records of one kind.
pub fn records(infos: &[AdaptionInfo], kind: AdaptionType, entity: AdaptionEntity) -> Vec<&AdaptionInfo> {
    infos
        .iter()
        .filter(|i| i.kind == kind && i.entity == entity)
        .collect()
}

/// Per cell, keyed by centroid, the neighbour count on every face.
pub fn face_signature<T: SpatialTree>(patch: &OctreePatch<T>) -> Vec<([i64; 3], Vec<usize>)> {
    let mut out: Vec<_> = patch
        .cells()
        .map(|cell| {
            let centre = patch.cell_position(cell.id()).unwrap();
            let key = centre.map(|c| (c * 1.0e6).round() as i64);
            let counts = (0..cell.face_count())
                .map(|f| cell.face_adjacency_count(f))
                .collect();
            (key, counts)
        })
        .collect();
    out.sort();
    out
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
