use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use octree_patch::prelude::*;

mod util;
use util::{oct_patch, quad_patch};

fn assert_symmetric<T: SpatialTree>(patch: &OctreePatch<T>) {
    for cell in patch.cells() {
        for face in 0..cell.face_count() {
            for &neigh in cell.face_adjacencies(face) {
                let other = patch.cell(neigh).unwrap();
                assert!(
                    other.face_adjacencies(face ^ 1).contains(&cell.id()),
                    "{} -> {neigh} on face {face} has no way back",
                    cell.id()
                );
            }
        }
    }
    for iface in patch.interfaces() {
        let owner = iface.owner();
        let cell = patch.cell(owner.cell).unwrap();
        assert!(cell.face_interfaces(owner.face).contains(&iface.id()));
        if let Some(side) = iface.neigh() {
            assert_eq!(side.face, owner.face ^ 1);
            let neigh = patch.cell(side.cell).unwrap();
            assert!(neigh.face_interfaces(side.face).contains(&iface.id()));
            assert!(cell.face_adjacencies(owner.face).contains(&side.cell));
        }
    }
}

fn refine_randomly<T: SpatialTree>(patch: &mut OctreePatch<T>, seed: u64, rounds: usize, max_level: u8) {
    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..rounds {
        let ids: Vec<EntityId> = patch.cells().map(|c| c.id()).collect();
        for id in ids {
            if rng.gen_bool(0.25) && patch.cell_level(id).unwrap() < max_level {
                patch.mark_cell_for_refinement(id).unwrap();
            }
        }
        patch.update(true).unwrap();
        assert_symmetric(patch);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn quadtree_adjacency_is_symmetric(seed in any::<u64>(), rounds in 1usize..4) {
        let mut patch = quad_patch(2);
        refine_randomly(&mut patch, seed, rounds, 6);
        prop_assert!(patch.validate_invariants().is_ok());
    }

    #[test]
    fn octree_adjacency_is_symmetric(seed in any::<u64>()) {
        let mut patch = oct_patch(1);
        refine_randomly(&mut patch, seed, 2, 3);
        prop_assert!(patch.validate_invariants().is_ok());
    }
}

#[test]
fn bootstrap_is_symmetric() {
    assert_symmetric(&quad_patch(3));
    assert_symmetric(&oct_patch(2));
}
