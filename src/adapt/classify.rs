//! Per-leaf change classification.
//!
//! During a pass every current leaf is classified once against the previous
//! mesh, from the last tree operation and the tree's change mapping. The
//! states are decided in priority order: creation, refinement, coarsening,
//! partition receive, renumbering, unchanged.

use crate::adapt::AdaptionType;
use crate::mesh_error::MeshError;
use crate::tree::{MappedOctant, OctantInfo, TreeOperation};

/// What happened to a current leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafState {
    /// The previous mesh was empty: every leaf is new.
    Creation,
    /// First of the `2^dim` children replacing one previous leaf.
    Refinement,
    /// Parent replacing several previous leaves.
    Coarsening,
    /// Leaf migrated in from `rank`.
    PartitionRecv { rank: usize },
    /// Same leaf, new tree position.
    Renumbering { previous: OctantInfo },
    /// Untouched.
    Unchanged,
}

impl LeafState {
    /// Adaption type reported for the leaf.
    pub fn adaption_type(self) -> AdaptionType {
        match self {
            LeafState::Creation => AdaptionType::Creation,
            LeafState::Refinement => AdaptionType::Refinement,
            LeafState::Coarsening => AdaptionType::Coarsening,
            LeafState::PartitionRecv { .. } => AdaptionType::PartitionRecv,
            LeafState::Renumbering { .. } => AdaptionType::Renumbering,
            LeafState::Unchanged => AdaptionType::None,
        }
    }
}

/// What the tree reports about one current leaf.
#[derive(Clone, Copy, Debug)]
pub struct LeafChange<'a> {
    pub tree_id: u32,
    pub is_new_r: bool,
    pub is_new_c: bool,
    /// Previous leaves the current one descends from.
    pub mapping: &'a [MappedOctant],
}

/// Classify a leaf.
///
/// `import_all` is set when the previous mesh was empty; the mapping is not
/// looked at in that case.
pub fn classify_leaf(
    operation: TreeOperation,
    import_all: bool,
    rank: usize,
    leaf: &LeafChange<'_>,
) -> Result<LeafState, MeshError> {
    if import_all {
        return Ok(LeafState::Creation);
    }
    let first = || {
        leaf.mapping.first().copied().ok_or_else(|| {
            MeshError::Tree(format!("octant {} has no change mapping", leaf.tree_id))
        })
    };
    let moved = |previous: MappedOctant| previous.ghost || previous.id != leaf.tree_id;

    match operation {
        TreeOperation::AdaptionMapped => {
            if leaf.is_new_r {
                Ok(LeafState::Refinement)
            } else if leaf.is_new_c {
                Ok(LeafState::Coarsening)
            } else {
                let previous = first()?;
                if moved(previous) {
                    Ok(LeafState::Renumbering {
                        previous: previous.info(),
                    })
                } else {
                    Ok(LeafState::Unchanged)
                }
            }
        }
        TreeOperation::LoadBalance => {
            let previous = first()?;
            if previous.rank != rank {
                Ok(LeafState::PartitionRecv {
                    rank: previous.rank,
                })
            } else if moved(previous) {
                Ok(LeafState::Renumbering {
                    previous: previous.info(),
                })
            } else {
                Ok(LeafState::Unchanged)
            }
        }
        TreeOperation::AdaptionUnmapped => Err(MeshError::UnmappedAdaption),
        TreeOperation::Initialization => Ok(LeafState::Unchanged),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(id: u32) -> MappedOctant {
        MappedOctant {
            id,
            ghost: false,
            rank: 0,
        }
    }

    fn change(tree_id: u32, mapping: &[MappedOctant]) -> LeafChange<'_> {
        LeafChange {
            tree_id,
            is_new_r: false,
            is_new_c: false,
            mapping,
        }
    }

    #[test]
    fn import_all_wins() {
        let leaf = LeafChange {
            is_new_r: true,
            ..change(0, &[])
        };
        let state = classify_leaf(TreeOperation::AdaptionMapped, true, 0, &leaf).unwrap();
        assert_eq!(state, LeafState::Creation);
    }

    #[test]
    fn refinement_before_coarsening_before_renumbering() {
        let map = [local(4)];
        let both = LeafChange {
            is_new_r: true,
            is_new_c: true,
            ..change(2, &map)
        };
        let op = TreeOperation::AdaptionMapped;
        assert_eq!(classify_leaf(op, false, 0, &both).unwrap(), LeafState::Refinement);
        let coarse = LeafChange {
            is_new_c: true,
            ..change(2, &map)
        };
        assert_eq!(classify_leaf(op, false, 0, &coarse).unwrap(), LeafState::Coarsening);
        assert_eq!(
            classify_leaf(op, false, 0, &change(2, &map)).unwrap(),
            LeafState::Renumbering {
                previous: OctantInfo::internal(4)
            }
        );
        assert_eq!(
            classify_leaf(op, false, 0, &change(4, &map)).unwrap(),
            LeafState::Unchanged
        );
    }

    #[test]
    fn load_balance_detects_migration() {
        let remote = [MappedOctant {
            id: 9,
            ghost: true,
            rank: 1,
        }];
        let op = TreeOperation::LoadBalance;
        assert_eq!(
            classify_leaf(op, false, 0, &change(0, &remote)).unwrap(),
            LeafState::PartitionRecv { rank: 1 }
        );
        assert_eq!(
            classify_leaf(op, false, 0, &change(3, &[local(5)])).unwrap(),
            LeafState::Renumbering {
                previous: OctantInfo::internal(5)
            }
        );
    }

    #[test]
    fn unmapped_adaption_is_refused() {
        let map = [local(0)];
        assert_eq!(
            classify_leaf(TreeOperation::AdaptionUnmapped, false, 0, &change(0, &map)),
            Err(MeshError::UnmappedAdaption)
        );
    }

    #[test]
    fn missing_mapping_is_reported() {
        let result = classify_leaf(TreeOperation::LoadBalance, false, 0, &change(0, &[]));
        assert!(matches!(result, Err(MeshError::Tree(_))));
    }
}
