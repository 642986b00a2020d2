//! Adaption tracking: what a synchronization pass changed.
//!
//! A pass reports its effect as a list of [`AdaptionInfo`] records. Each
//! record is tagged by cause ([`AdaptionType`]), entity kind
//! ([`AdaptionEntity`]) and owning rank, and holds the ids before
//! (`previous`) and after (`current`) the change. Records are accumulated in
//! an [`InfoCollection`] and handed out with [`InfoCollection::dump`].
//!
//! Partition transfers are ordered identically on the sending and the
//! receiving rank, so the two sides can exchange cell data without agreeing
//! on an order first.

pub mod classify;
pub mod sync;

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use crate::topology::id::EntityId;

pub use classify::{LeafState, classify_leaf};

/// Cause of a change.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum AdaptionType {
    #[default]
    None,
    Creation,
    Refinement,
    Coarsening,
    Renumbering,
    Deletion,
    PartitionSend,
    PartitionRecv,
}

impl AdaptionType {
    /// Whether records of this type are merged per `(type, entity, rank)`.
    ///
    /// Refinements and coarsenings keep one record per batch so that the
    /// parent/children correspondence survives.
    pub fn is_merged(self) -> bool {
        !matches!(self, AdaptionType::Refinement | AdaptionType::Coarsening)
    }
}

/// Kind of entity a record refers to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum AdaptionEntity {
    Cell,
    Interface,
}

/// One tracked change.
///
/// `previous` may hold `None` where the previous entity lived on another
/// rank (the cells of a partition receive, or remote cells merged by a
/// coarsening).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdaptionInfo {
    pub kind: AdaptionType,
    pub entity: AdaptionEntity,
    pub rank: usize,
    pub previous: Vec<Option<EntityId>>,
    pub current: Vec<EntityId>,
}

impl AdaptionInfo {
    pub fn new(kind: AdaptionType, entity: AdaptionEntity, rank: usize) -> Self {
        Self {
            kind,
            entity,
            rank,
            previous: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Known previous ids, skipping remote placeholders.
    pub fn previous_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.previous.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty() && self.current.is_empty()
    }
}

/// Records of one pass, in creation order.
#[derive(Clone, Debug, Default)]
pub struct InfoCollection {
    infos: Vec<AdaptionInfo>,
    merged: BTreeMap<(AdaptionType, AdaptionEntity, usize), usize>,
}

impl InfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the record for `(kind, entity, rank)`.
    ///
    /// Merged types return the existing record when there is one; the other
    /// types always get a fresh record.
    pub fn create(&mut self, kind: AdaptionType, entity: AdaptionEntity, rank: usize) -> usize {
        if kind.is_merged() {
            if let Some(&idx) = self.merged.get(&(kind, entity, rank)) {
                return idx;
            }
        }
        let idx = self.infos.len();
        self.infos.push(AdaptionInfo::new(kind, entity, rank));
        if kind.is_merged() {
            self.merged.insert((kind, entity, rank), idx);
        }
        idx
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdaptionInfo> {
        self.infos.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, AdaptionInfo> {
        self.infos.iter_mut()
    }

    /// Finalized records in creation order; records left empty are dropped.
    pub fn dump(self) -> Vec<AdaptionInfo> {
        self.infos.into_iter().filter(|info| !info.is_empty()).collect()
    }
}

impl Index<usize> for InfoCollection {
    type Output = AdaptionInfo;

    fn index(&self, idx: usize) -> &AdaptionInfo {
        &self.infos[idx]
    }
}

impl IndexMut<usize> for InfoCollection {
    fn index_mut(&mut self, idx: usize) -> &mut AdaptionInfo {
        &mut self.infos[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn merged_types_share_a_record() {
        let mut infos = InfoCollection::new();
        let a = infos.create(AdaptionType::Deletion, AdaptionEntity::Cell, 0);
        let b = infos.create(AdaptionType::Deletion, AdaptionEntity::Interface, 0);
        let c = infos.create(AdaptionType::Deletion, AdaptionEntity::Cell, 0);
        let d = infos.create(AdaptionType::PartitionSend, AdaptionEntity::Cell, 1);
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(d, 2);
    }

    #[test]
    fn batches_get_their_own_record() {
        let mut infos = InfoCollection::new();
        let a = infos.create(AdaptionType::Refinement, AdaptionEntity::Cell, 0);
        let b = infos.create(AdaptionType::Refinement, AdaptionEntity::Cell, 0);
        assert_ne!(a, b);
        infos[a].previous.push(Some(id(1)));
        infos[b].previous.push(None);
        infos[b].current.push(id(7));
        let dumped = infos.dump();
        assert_eq!(dumped.len(), 2);
        assert_eq!(dumped[1].previous_ids().count(), 0);
    }

    #[test]
    fn dump_drops_empty_records_and_keeps_order() {
        let mut infos = InfoCollection::new();
        infos.create(AdaptionType::Deletion, AdaptionEntity::Interface, 0);
        let c = infos.create(AdaptionType::Creation, AdaptionEntity::Cell, 0);
        infos[c].current.push(id(3));
        let dumped = infos.dump();
        assert_eq!(dumped.len(), 1);
        assert_eq!(dumped[0].kind, AdaptionType::Creation);
    }

    #[test]
    fn info_serializes() {
        let mut info = AdaptionInfo::new(AdaptionType::PartitionRecv, AdaptionEntity::Cell, 2);
        info.previous.push(None);
        info.current.push(id(4));
        let json = serde_json::to_string(&info).unwrap();
        let back: AdaptionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
