//! Two replicated ranks driven side by side.

use hashbrown::HashMap;
use octree_patch::prelude::*;

mod util;
use util::records;

fn ranks() -> (OctreePatch<QuadTree>, OctreePatch<QuadTree>) {
    let config = PatchConfig {
        dimension: 2,
        dh: 0.25,
        max_level: 8,
        ..PatchConfig::default()
    };
    let mut p0 = OctreePatch::<QuadTree>::distributed(&config, 0, 2).unwrap();
    let mut p1 = OctreePatch::<QuadTree>::distributed(&config, 1, 2).unwrap();
    p0.update(true).unwrap();
    p1.update(true).unwrap();
    assert_eq!(p0.cell_count(), 16);
    assert!(p1.is_empty());
    (p0, p1)
}

fn positions<T: SpatialTree>(patch: &OctreePatch<T>) -> HashMap<EntityId, [f64; 3]> {
    patch
        .cells()
        .map(|c| (c.id(), patch.cell_position(c.id()).unwrap()))
        .collect()
}

#[test]
fn first_partition_splits_the_leaves() {
    let (mut p0, mut p1) = ranks();
    let i0 = p0.partition(true).unwrap();
    let i1 = p1.partition(true).unwrap();

    let sent = records(&i0, AdaptionType::PartitionSend, AdaptionEntity::Cell);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].rank, 1);
    assert_eq!(sent[0].previous.len(), 8);
    assert!(sent[0].current.is_empty());

    // rank 1 started empty: everything it holds is new
    let created = records(&i1, AdaptionType::Creation, AdaptionEntity::Cell);
    assert_eq!(created[0].current.len(), 8 + p1.ghost_count());

    for patch in [&p0, &p1] {
        assert_eq!(patch.internal_count(), 8);
        assert_eq!(patch.ghost_count(), 4);
        patch.validate_invariants().unwrap();
    }
    let ghosts = p0.ghosts_by_rank();
    assert_eq!(ghosts.len(), 1);
    assert_eq!(ghosts[&1].len(), 4);
    for &ghost in &ghosts[&1] {
        let cell = p0.cell(ghost).unwrap();
        assert!(!cell.is_interior());
        assert_eq!(p0.cell_owner(ghost).unwrap(), 1);
        // ghosts only link to internal cells
        for &neigh in cell.adjacencies() {
            assert!(p0.cell(neigh).unwrap().is_interior());
        }
        assert!(!p0.mark_cell_for_refinement(ghost).unwrap());
    }
}

#[test]
fn sender_and_receiver_agree_on_order() {
    let (mut p0, mut p1) = ranks();
    p0.partition(false).unwrap();
    p1.partition(false).unwrap();

    // refine the first leaf on both replicas: rank 0 grows to 11 leaves
    for patch in [&mut p0, &mut p1] {
        patch.tree_mut().set_global_marker(0, 1).unwrap();
        patch.update(true).unwrap();
    }
    assert_eq!(p0.internal_count(), 11);
    assert_eq!(p1.internal_count(), 8);

    let before = positions(&p0);
    let i0 = p0.partition(true).unwrap();
    let i1 = p1.partition(true).unwrap();

    let sent = records(&i0, AdaptionType::PartitionSend, AdaptionEntity::Cell);
    let received = records(&i1, AdaptionType::PartitionRecv, AdaptionEntity::Cell);
    assert_eq!(sent.len(), 1);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].rank, 0);
    assert!(received[0].previous.iter().all(Option::is_none));

    let sent_positions: Vec<[f64; 3]> = sent[0].previous_ids().map(|id| before[&id]).collect();
    let after = positions(&p1);
    let received_positions: Vec<[f64; 3]> = received[0].current.iter().map(|id| after[id]).collect();
    assert_eq!(sent_positions.len(), 2);
    assert_eq!(sent_positions, received_positions);

    assert_eq!(p0.internal_count(), 9);
    assert_eq!(p1.internal_count(), 10);
    p0.validate_invariants().unwrap();
    p1.validate_invariants().unwrap();
}

#[test]
fn balanced_partition_is_a_no_op() {
    let (mut p0, mut p1) = ranks();
    p0.partition(false).unwrap();
    p1.partition(false).unwrap();
    assert!(p0.partition(true).unwrap().is_empty());
    assert!(p1.partition(true).unwrap().is_empty());
    assert_eq!(p0.last_operation(), TreeOperation::LoadBalance);
}

#[test]
fn family_split_across_ranks_coarsens_on_the_first_owner() {
    let config = PatchConfig {
        dimension: 2,
        dh: 0.25,
        max_level: 8,
        ..PatchConfig::default()
    };
    let mut patches: Vec<OctreePatch<QuadTree>> = (0..3)
        .map(|rank| OctreePatch::<QuadTree>::distributed(&config, rank, 3).unwrap())
        .collect();
    for patch in &mut patches {
        patch.update(false).unwrap();
        patch.partition(false).unwrap();
    }
    // 16 leaves split 5 / 5 / 6: the family 4..8 straddles ranks 0 and 1
    let counts: Vec<usize> = patches.iter().map(|p| p.internal_count()).collect();
    assert_eq!(counts, vec![5, 5, 6]);
    let kept_on_0 = patches[0].octant_cell(OctantInfo::internal(4)).unwrap();
    let orphans: Vec<EntityId> = (0..3)
        .map(|id| patches[1].octant_cell(OctantInfo::internal(id)).unwrap())
        .collect();

    let infos: Vec<Vec<AdaptionInfo>> = patches
        .iter_mut()
        .map(|patch| {
            for global in 4..8 {
                patch.tree_mut().set_global_marker(global, -1).unwrap();
            }
            patch.update(true).unwrap()
        })
        .collect();

    // the parent lands on rank 0, which only knew one of the children
    let coarsened = records(&infos[0], AdaptionType::Coarsening, AdaptionEntity::Cell);
    assert_eq!(coarsened.len(), 1);
    assert_eq!(coarsened[0].previous, vec![Some(kept_on_0), None, None, None]);
    assert_eq!(coarsened[0].current.len(), 1);

    // rank 1 maps no leaf back to its three children and drops them
    assert!(records(&infos[1], AdaptionType::Coarsening, AdaptionEntity::Cell).is_empty());
    let deleted: Vec<EntityId> = records(&infos[1], AdaptionType::Deletion, AdaptionEntity::Cell)
        .iter()
        .flat_map(|i| i.previous_ids())
        .collect();
    for orphan in &orphans {
        assert!(deleted.contains(orphan), "{orphan} not reported");
        assert!(patches[1].cell(*orphan).is_err());
    }

    let total: usize = patches.iter().map(|p| p.internal_count()).sum();
    assert_eq!(total, 13);
    for patch in &patches {
        patch.validate_invariants().unwrap();
    }
}
