use octree_patch::prelude::*;

mod util;
use util::records;

fn bootstrap(level: u8) -> (OctreePatch<OcTree>, Vec<AdaptionInfo>) {
    let config = PatchConfig {
        dimension: 3,
        dh: 1.0 / f64::from(1u32 << level),
        max_level: 6,
        ..PatchConfig::default()
    };
    let mut patch = OctreePatch::<OcTree>::new(&config).unwrap();
    assert!(patch.is_empty());
    let infos = patch.update(true).unwrap();
    (patch, infos)
}

#[test]
fn empty_mesh_imports_every_leaf() {
    let (patch, infos) = bootstrap(2);
    let created = records(&infos, AdaptionType::Creation, AdaptionEntity::Cell);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].current.len(), 64);
    assert_eq!(created[0].rank, 0);
    assert!(infos.iter().all(|i| i.kind != AdaptionType::Deletion));

    assert_eq!(patch.cell_count(), 64);
    assert_eq!(patch.internal_count(), 64);
    assert_eq!(patch.ghost_count(), 0);
    assert_eq!(patch.vertex_count(), 125);
    // 144 shared faces + 96 on the border
    assert_eq!(patch.interface_count(), 240);
    let created_interfaces = records(&infos, AdaptionType::Creation, AdaptionEntity::Interface);
    assert_eq!(created_interfaces[0].current.len(), 240);
    patch.validate_invariants().unwrap();
}

#[test]
fn shared_faces_are_linked_and_border_faces_are_not() {
    let (patch, _) = bootstrap(2);
    for cell in patch.cells() {
        let centre = patch.eval_cell_centroid(cell.id()).unwrap();
        let half = patch.eval_cell_size(cell.id()).unwrap() / 2.0;
        for face in 0..cell.face_count() {
            let axis = face / 2;
            let boundary = if face % 2 == 0 {
                centre[axis] - half
            } else {
                centre[axis] + half
            };
            let on_border = boundary.abs() < 1e-12 || (boundary - 1.0).abs() < 1e-12;
            assert_eq!(cell.is_face_border(face), on_border, "cell {} face {face}", cell.id());
            let expected = usize::from(!on_border);
            assert_eq!(cell.face_adjacency_count(face), expected);
            assert_eq!(cell.face_interface_count(face), 1);
        }
    }
}

#[test]
fn created_cells_sit_on_their_octants() {
    let (patch, infos) = bootstrap(1);
    let created = records(&infos, AdaptionType::Creation, AdaptionEntity::Cell);
    for &id in &created[0].current {
        let octant = patch.cell_octant(id).unwrap();
        assert!(octant.internal);
        assert_eq!(patch.octant_cell(octant), Some(id));
        assert_eq!(patch.cell_level(id).unwrap(), 1);
        assert_eq!(patch.eval_cell_volume(id).unwrap(), 0.125);
        let centre = patch.eval_cell_centroid(id).unwrap();
        assert!(patch.is_point_inside_cell(id, centre).unwrap());
        assert_eq!(patch.locate_point(centre), Some(id));
    }
}

#[test]
fn default_config_is_a_single_cell() {
    let (patch, infos) = bootstrap(0);
    assert_eq!(patch.cell_count(), 1);
    assert_eq!(patch.vertex_count(), 8);
    assert_eq!(patch.interface_count(), 6);
    assert_eq!(infos.len(), 2);
}
