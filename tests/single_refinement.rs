use octree_patch::prelude::*;

mod util;
use util::{oct_patch, quad_patch, records};

#[test]
fn one_octant_becomes_eight() {
    let mut patch = oct_patch(1);
    let target = patch.locate_point([0.25, 0.25, 0.25]).unwrap();
    let target_interfaces = patch.cell(target).unwrap().interfaces().to_vec();
    assert!(patch.mark_cell_for_refinement(target).unwrap());
    let infos = patch.update(true).unwrap();

    let refined = records(&infos, AdaptionType::Refinement, AdaptionEntity::Cell);
    assert_eq!(refined.len(), 1);
    assert_eq!(refined[0].previous, vec![Some(target)]);
    assert_eq!(refined[0].current.len(), 8);
    assert!(records(&infos, AdaptionType::Deletion, AdaptionEntity::Cell).is_empty());

    let removed = records(&infos, AdaptionType::Deletion, AdaptionEntity::Interface);
    util::assert_permutation(
        &removed[0].previous_ids().collect::<Vec<_>>(),
        &target_interfaces,
    );

    assert_eq!(patch.cell_count(), 15);
    assert_eq!(patch.vertex_count(), 46);
    assert_eq!(patch.interface_count(), 66);
    assert!(patch.cell(target).is_err());
    patch.validate_invariants().unwrap();
}

#[test]
fn children_are_linked_across_shared_faces() {
    let mut patch = oct_patch(1);
    let target = patch.locate_point([0.25, 0.25, 0.25]).unwrap();
    patch.mark_cell_for_refinement(target).unwrap();
    let infos = patch.update(true).unwrap();
    let children = &records(&infos, AdaptionType::Refinement, AdaptionEntity::Cell)[0].current;

    for (k, &child) in children.iter().enumerate() {
        assert_eq!(patch.cell_level(child).unwrap(), 2);
        let cell = patch.cell(child).unwrap();
        for face in 0..6 {
            let axis = face / 2;
            let upper = face % 2 == 1;
            let bit = (k >> axis) & 1 == 1;
            if upper != bit {
                // face inside the former parent
                let sibling = children[k ^ (1 << axis)];
                assert_eq!(cell.face_adjacencies(face), &[sibling]);
                let back = patch.cell(sibling).unwrap();
                assert_eq!(back.face_adjacencies(face ^ 1), &[child]);
            }
        }
    }
}

#[test]
fn coarse_neighbour_sees_four_children() {
    let mut patch = oct_patch(1);
    let target = patch.locate_point([0.25, 0.25, 0.25]).unwrap();
    let east = patch.locate_point([0.75, 0.25, 0.25]).unwrap();
    patch.mark_cell_for_refinement(target).unwrap();
    patch.update(false).unwrap();

    // the east neighbour survived and kept its id
    let cell = patch.cell(east).unwrap();
    assert_eq!(cell.face_adjacency_count(0), 4);
    assert_eq!(cell.face_interface_count(0), 4);
    for &iface in cell.face_interfaces(0) {
        let iface = patch.interface(iface).unwrap();
        assert_ne!(iface.owner().cell, east);
        assert_eq!(iface.neigh().map(|s| s.cell), Some(east));
        assert_eq!(patch.eval_interface_area(iface.id()).unwrap(), 0.0625);
        assert_eq!(patch.eval_interface_normal(iface.id()).unwrap(), [1.0, 0.0, 0.0]);
    }
    assert_eq!(cell.face_adjacency_count(1), 0);
}

#[test]
fn balance_keeps_neighbours_within_one_level() {
    let mut patch = quad_patch(2);
    for _ in 0..3 {
        let corner = patch.locate_point([0.01, 0.01, 0.0]).unwrap();
        patch.mark_cell_for_refinement(corner).unwrap();
        patch.update(false).unwrap();
    }
    let corner = patch.locate_point([0.01, 0.01, 0.0]).unwrap();
    assert_eq!(patch.cell_level(corner).unwrap(), 5);

    for cell in patch.cells() {
        let level = i32::from(patch.cell_level(cell.id()).unwrap());
        for &neigh in cell.adjacencies() {
            let other = i32::from(patch.cell_level(neigh).unwrap());
            assert!((level - other).abs() <= 1, "{} next to {}", cell.id(), neigh);
        }
    }
    patch.validate_invariants().unwrap();
}

#[test]
fn lone_coarsening_marker_changes_nothing() {
    let mut patch = quad_patch(1);
    let id = patch.locate_point([0.75, 0.75, 0.0]).unwrap();
    assert!(patch.enable_cell_balancing(id, false).unwrap());
    assert!(patch.mark_cell_for_coarsening(id).unwrap());
    // a lone coarsening marker cannot merge an incomplete family
    assert!(patch.update(true).unwrap().is_empty());
    assert_eq!(patch.cell_count(), 4);
}
