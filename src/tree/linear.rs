//! Linear (leaf-only) quadtree/octree.
//!
//! Leaves are kept in a single Morton-ordered vector together with a hash
//! lookup keyed by `(level, coords)`. Distributed execution follows a
//! replicated-partition model: every rank holds the whole leaf sequence and
//! a table of contiguous ownership ranges. Internal octants are the leaves
//! owned by the local rank, ghosts are the non-owned leaves touching them by
//! a face, an edge or a node.
//!
//! Adapting a multi-rank tree expects every rank to apply the same markers
//! (see [`LinearTree::set_global_marker`]) so the replicated sequences stay
//! identical.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use super::{MappedOctant, OctantInfo, SentRanges, SpatialTree, entity_offset};
use crate::mesh_error::MeshError;

/// Finest level supported by the integer grid.
pub const MAX_LEVEL: u8 = 20;

const DEFAULT_TOLERANCE: f64 = 1.0e-14;

/// A leaf (or a virtual box) of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Octant<const D: usize> {
    /// Refinement level (0 is root).
    pub level: u8,
    /// Integer coordinates at the given level.
    pub coords: [u32; D],
}

impl<const D: usize> Octant<D> {
    pub fn root() -> Self {
        Self {
            level: 0,
            coords: [0; D],
        }
    }

    /// Returns the parent box, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.level == 0 {
            return None;
        }
        Some(Self {
            level: self.level - 1,
            coords: self.coords.map(|c| c / 2),
        })
    }

    /// Returns the `2^D` children in node order.
    pub fn children(&self) -> Vec<Self> {
        (0..1usize << D)
            .map(|idx| {
                let mut coords = [0u32; D];
                for axis in 0..D {
                    let bit = ((idx >> axis) & 1) as u32;
                    coords[axis] = self.coords[axis] * 2 + bit;
                }
                Self {
                    level: self.level + 1,
                    coords,
                }
            })
            .collect()
    }

    /// Edge length on the finest grid.
    #[inline]
    pub fn size(&self) -> u32 {
        1 << (MAX_LEVEL - self.level)
    }

    /// Lower corner on the finest grid.
    #[inline]
    pub fn anchor(&self) -> [u32; D] {
        self.coords.map(|c| c << (MAX_LEVEL - self.level))
    }

    /// Node `k` on the finest grid.
    pub fn node(&self, k: usize) -> [u32; D] {
        let mut node = self.anchor();
        let size = self.size();
        for (axis, c) in node.iter_mut().enumerate() {
            if (k >> axis) & 1 == 1 {
                *c += size;
            }
        }
        node
    }

    /// Morton code of the anchor.
    #[inline]
    pub fn morton(&self) -> u64 {
        interleave(self.anchor())
    }

    /// Box shifted by `offset` at the same level, `None` outside the root.
    fn shifted(&self, offset: [i32; 3]) -> Option<Self> {
        let extent = 1i64 << self.level;
        let mut coords = [0u32; D];
        for axis in 0..D {
            let c = i64::from(self.coords[axis]) + i64::from(offset[axis]);
            if c < 0 || c >= extent {
                return None;
            }
            coords[axis] = c as u32;
        }
        Some(Self {
            level: self.level,
            coords,
        })
    }
}

/// Interleave the bits of finest-grid coordinates, axis 0 least significant.
pub fn interleave<const D: usize>(point: [u32; D]) -> u64 {
    let mut key = 0u64;
    for bit in 0..=usize::from(MAX_LEVEL) {
        for (axis, c) in point.iter().enumerate() {
            key |= u64::from((c >> bit) & 1) << (bit * D + axis);
        }
    }
    key
}

/// Linear tree of dimension `D`.
#[derive(Debug, Clone)]
pub struct LinearTree<const D: usize> {
    leaves: Vec<Octant<D>>,
    lookup: HashMap<Octant<D>, usize>,
    markers: Vec<i8>,
    balance: Vec<bool>,
    /// `partition[r]..partition[r + 1]` is the global range owned by rank `r`.
    partition: Vec<usize>,
    /// Global indices of the ghost leaves, increasing.
    ghosts: Vec<usize>,
    rank: usize,
    n_procs: usize,
    max_level: u8,
    origin: [f64; 3],
    length: f64,
    tolerance: f64,
    new_r: Vec<bool>,
    new_c: Vec<bool>,
    mapping: Option<Vec<Vec<MappedOctant>>>,
    sent: SentRanges,
}

/// A quadtree (`D = 2`).
pub type QuadTree = LinearTree<2>;
/// An octree (`D = 3`).
pub type OcTree = LinearTree<3>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Change {
    Kept,
    Refined,
    Coarsened,
}

impl<const D: usize> LinearTree<D> {
    /// Single-process tree made of the root octant.
    pub fn new(origin: [f64; 3], length: f64, max_level: u8) -> Result<Self, MeshError> {
        Self::distributed(origin, length, max_level, 0, 1)
    }

    /// Tree replicated over `n_procs` ranks; the root starts on rank 0.
    pub fn distributed(
        origin: [f64; 3],
        length: f64,
        max_level: u8,
        rank: usize,
        n_procs: usize,
    ) -> Result<Self, MeshError> {
        if D != 2 && D != 3 {
            return Err(MeshError::UnsupportedDimension(D));
        }
        if max_level > MAX_LEVEL {
            return Err(MeshError::Tree(format!(
                "maximum level {max_level} exceeds the supported {MAX_LEVEL}"
            )));
        }
        if n_procs == 0 || rank >= n_procs {
            return Err(MeshError::Tree(format!("rank {rank} invalid for {n_procs} processes")));
        }
        if !(length > 0.0) {
            return Err(MeshError::Tree(format!("invalid domain length {length}")));
        }
        let mut partition = vec![1; n_procs + 1];
        partition[0] = 0;
        let mut tree = Self {
            leaves: vec![Octant::root()],
            lookup: HashMap::new(),
            markers: vec![0],
            balance: vec![true],
            partition,
            ghosts: Vec::new(),
            rank,
            n_procs,
            max_level,
            origin,
            length,
            tolerance: DEFAULT_TOLERANCE,
            new_r: Vec::new(),
            new_c: Vec::new(),
            mapping: None,
            sent: SentRanges::new(),
        };
        tree.rebuild_lookup();
        tree.rebuild_ghosts();
        tree.reset_flags();
        Ok(tree)
    }

    /// Total number of leaves over all ranks.
    pub fn global_count(&self) -> usize {
        self.leaves.len()
    }

    /// Global index of internal leaf `id`.
    pub fn global_index(&self, id: u32) -> Result<usize, MeshError> {
        self.locate(OctantInfo::internal(id))
    }

    /// Leaf behind an address.
    pub fn octant(&self, octant: OctantInfo) -> Result<Octant<D>, MeshError> {
        Ok(self.leaves[self.locate(octant)?])
    }

    /// Set a marker by global index, on any rank.
    pub fn set_global_marker(&mut self, global: usize, marker: i8) -> Result<(), MeshError> {
        let slot = self
            .markers
            .get_mut(global)
            .ok_or_else(|| MeshError::Tree(format!("global octant {global} out of range")))?;
        *slot = marker;
        Ok(())
    }

    /// Global range owned by `rank`.
    pub fn owned_range(&self, rank: usize) -> std::ops::Range<usize> {
        self.partition[rank]..self.partition[rank + 1]
    }

    fn first(&self) -> usize {
        self.partition[self.rank]
    }

    fn owner_of(partition: &[usize], global: usize) -> usize {
        partition.partition_point(|&start| start <= global) - 1
    }

    fn is_owned(&self, global: usize) -> bool {
        self.owned_range(self.rank).contains(&global)
    }

    fn locate(&self, octant: OctantInfo) -> Result<usize, MeshError> {
        let found = if octant.internal {
            let global = self.first() + octant.id as usize;
            self.is_owned(global).then_some(global)
        } else {
            self.ghosts.get(octant.id as usize).copied()
        };
        found.ok_or_else(|| {
            MeshError::Tree(format!(
                "no {} octant {}",
                if octant.internal { "internal" } else { "ghost" },
                octant.id
            ))
        })
    }

    fn address_of(&self, global: usize) -> Option<OctantInfo> {
        if self.is_owned(global) {
            Some(OctantInfo::internal((global - self.first()) as u32))
        } else {
            self.ghosts
                .binary_search(&global)
                .ok()
                .map(|pos| OctantInfo::ghost(pos as u32))
        }
    }

    fn rebuild_lookup(&mut self) {
        self.lookup = self
            .leaves
            .iter()
            .enumerate()
            .map(|(idx, leaf)| (*leaf, idx))
            .collect();
    }

    fn reset_flags(&mut self) {
        let n = self.octant_count();
        self.new_r = vec![false; n];
        self.new_c = vec![false; n];
    }

    /// Leaves touching `octant` across the box at `offset`, in global order.
    fn neighbours_of(&self, octant: &Octant<D>, offset: [i32; 3]) -> Vec<usize> {
        let Some(target) = octant.shifted(offset) else {
            return Vec::new();
        };
        // same size or coarser
        let mut cursor = Some(target);
        while let Some(candidate) = cursor {
            if let Some(&global) = self.lookup.get(&candidate) {
                return vec![global];
            }
            cursor = candidate.parent();
        }
        // finer: only children on the side facing the octant
        let mut found = Vec::new();
        let mut stack = vec![target];
        while let Some(parent) = stack.pop() {
            if parent.level >= self.max_level {
                continue;
            }
            for (k, child) in parent.children().into_iter().enumerate() {
                let facing = (0..D).all(|axis| match offset[axis] {
                    1 => (k >> axis) & 1 == 0,
                    -1 => (k >> axis) & 1 == 1,
                    _ => true,
                });
                if !facing {
                    continue;
                }
                match self.lookup.get(&child) {
                    Some(&global) => found.push(global),
                    None => stack.push(child),
                }
            }
        }
        found.sort_unstable();
        found
    }

    fn all_offsets() -> Vec<[i32; 3]> {
        (0..D)
            .map(|_| -1i32..=1)
            .multi_cartesian_product()
            .filter(|o| o.iter().any(|&c| c != 0))
            .map(|o| {
                let mut offset = [0i32; 3];
                offset[..D].copy_from_slice(&o);
                offset
            })
            .collect()
    }

    fn rebuild_ghosts(&mut self) {
        let offsets = Self::all_offsets();
        let mut ghosts = HashSet::new();
        for global in self.owned_range(self.rank) {
            let leaf = self.leaves[global];
            for offset in &offsets {
                ghosts.extend(
                    self.neighbours_of(&leaf, *offset)
                        .into_iter()
                        .filter(|&g| !self.is_owned(g)),
                );
            }
        }
        self.ghosts = ghosts.into_iter().sorted_unstable().collect();
    }

    fn to_coords(&self, point: [u32; D]) -> [f64; 3] {
        let scale = self.length / f64::from(1u32 << MAX_LEVEL);
        let mut coords = self.origin;
        for axis in 0..D {
            coords[axis] += f64::from(point[axis]) * scale;
        }
        coords
    }

    /// Effective level of a leaf once the pending refinements are applied.
    fn effective_level(&self, global: usize, refine: &HashSet<usize>) -> u8 {
        self.leaves[global].level + u8::from(refine.contains(&global))
    }

    fn finest_face_neighbour(&self, octant: &Octant<D>, refine: &HashSet<usize>) -> Option<u8> {
        (0..2 * D)
            .filter_map(|face| entity_offset(D, 1, face))
            .flat_map(|offset| self.neighbours_of(octant, offset))
            .map(|g| self.effective_level(g, refine))
            .max()
    }

    /// One adapt sweep. Updates `origin`/`change` to follow the new leaves.
    fn adapt_step(
        &mut self,
        owners: &mut Vec<usize>,
        origin: &mut Vec<Vec<usize>>,
        change: &mut Vec<Change>,
    ) -> bool {
        let mut refine: HashSet<usize> = (0..self.leaves.len())
            .filter(|&g| self.markers[g] > 0 && self.leaves[g].level < self.max_level)
            .collect();

        // 2:1 balance across faces, one level per sweep
        loop {
            let extra: Vec<usize> = (0..self.leaves.len())
                .filter(|g| self.balance[*g] && !refine.contains(g))
                .filter(|&g| self.leaves[g].level < self.max_level)
                .filter(|&g| {
                    let level = self.leaves[g].level;
                    self.finest_face_neighbour(&self.leaves[g], &refine)
                        .is_some_and(|finest| finest > level + 1)
                })
                .collect();
            if extra.is_empty() {
                break;
            }
            refine.extend(extra);
        }

        let family = 1usize << D;
        let mut coarsen: HashMap<usize, Octant<D>> = HashMap::new();
        for (g, leaf) in self.leaves.iter().enumerate() {
            if coarsen.contains_key(&g) || self.markers[g] >= 0 || refine.contains(&g) {
                continue;
            }
            let Some(parent) = leaf.parent() else {
                continue;
            };
            let siblings: Option<Vec<usize>> = parent
                .children()
                .iter()
                .map(|child| self.lookup.get(child).copied())
                .collect();
            let Some(siblings) = siblings else {
                continue;
            };
            if siblings.len() != family
                || siblings
                    .iter()
                    .any(|s| self.markers[*s] >= 0 || refine.contains(s))
            {
                continue;
            }
            if siblings.iter().any(|s| self.balance[*s])
                && self
                    .finest_face_neighbour(&parent, &refine)
                    .is_some_and(|finest| finest > parent.level + 1)
            {
                continue;
            }
            for s in siblings {
                coarsen.insert(s, parent);
            }
        }

        if refine.is_empty() && coarsen.is_empty() {
            return false;
        }

        let n = self.leaves.len();
        let mut leaves = Vec::with_capacity(n + refine.len() * family);
        let mut markers = Vec::with_capacity(leaves.capacity());
        let mut balance = Vec::with_capacity(leaves.capacity());
        let mut new_owners = Vec::with_capacity(leaves.capacity());
        let mut new_origin = Vec::with_capacity(leaves.capacity());
        let mut new_change = Vec::with_capacity(leaves.capacity());
        let mut g = 0;
        while g < n {
            if refine.contains(&g) {
                for child in self.leaves[g].children() {
                    leaves.push(child);
                    markers.push((self.markers[g] - 1).max(0));
                    balance.push(self.balance[g]);
                    new_owners.push(owners[g]);
                    new_origin.push(origin[g].clone());
                    new_change.push(Change::Refined);
                }
                g += 1;
            } else if let Some(parent) = coarsen.get(&g) {
                let members = g..g + family;
                leaves.push(*parent);
                markers.push((self.markers[g] + 1).min(0));
                balance.push(members.clone().any(|m| self.balance[m]));
                new_owners.push(owners[g]);
                new_origin.push(members.clone().flat_map(|m| origin[m].clone()).collect());
                new_change.push(Change::Coarsened);
                g += family;
            } else {
                leaves.push(self.leaves[g]);
                markers.push(self.markers[g]);
                balance.push(self.balance[g]);
                new_owners.push(owners[g]);
                new_origin.push(std::mem::take(&mut origin[g]));
                new_change.push(change[g]);
                g += 1;
            }
        }
        debug_assert!(leaves.windows(2).all(|w| w[0].morton() < w[1].morton()));

        self.leaves = leaves;
        self.markers = markers;
        self.balance = balance;
        *owners = new_owners;
        *origin = new_origin;
        *change = new_change;
        self.rebuild_lookup();
        true
    }

    fn partition_from_owners(&self, owners: &[usize]) -> Vec<usize> {
        (0..=self.n_procs)
            .map(|rank| owners.partition_point(|&o| o < rank))
            .collect()
    }

    /// Express a previous global index as seen by this rank before the change.
    fn previous_address(
        &self,
        global: usize,
        prev_partition: &[usize],
        prev_ghosts: &[usize],
    ) -> MappedOctant {
        let rank = Self::owner_of(prev_partition, global);
        if rank == self.rank {
            MappedOctant {
                id: (global - prev_partition[rank]) as u32,
                ghost: false,
                rank,
            }
        } else {
            match prev_ghosts.binary_search(&global) {
                Ok(pos) => MappedOctant {
                    id: pos as u32,
                    ghost: true,
                    rank,
                },
                Err(_) => MappedOctant {
                    id: global as u32,
                    ghost: false,
                    rank,
                },
            }
        }
    }
}

impl<const D: usize> SpatialTree for LinearTree<D> {
    fn dimension(&self) -> usize {
        D
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn n_procs(&self) -> usize {
        self.n_procs
    }

    fn octant_count(&self) -> usize {
        self.owned_range(self.rank).len()
    }

    fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    fn max_level(&self) -> u8 {
        self.max_level
    }

    fn max_depth(&self) -> u8 {
        self.leaves.iter().map(|l| l.level).max().unwrap_or(0)
    }

    fn level(&self, octant: OctantInfo) -> Result<u8, MeshError> {
        Ok(self.octant(octant)?.level)
    }

    fn morton(&self, octant: OctantInfo) -> Result<u64, MeshError> {
        Ok(self.octant(octant)?.morton())
    }

    fn centre(&self, octant: OctantInfo) -> Result<[f64; 3], MeshError> {
        let leaf = self.octant(octant)?;
        let half = f64::from(leaf.size()) / 2.0;
        let scale = self.length / f64::from(1u32 << MAX_LEVEL);
        let mut centre = self.to_coords(leaf.anchor());
        for c in centre.iter_mut().take(D) {
            *c += half * scale;
        }
        Ok(centre)
    }

    fn node_coords(&self, octant: OctantInfo, node: usize) -> Result<[f64; 3], MeshError> {
        let leaf = self.octant(octant)?;
        Ok(self.to_coords(leaf.node(node)))
    }

    fn node_morton(&self, octant: OctantInfo, node: usize) -> Result<u64, MeshError> {
        Ok(interleave(self.octant(octant)?.node(node)))
    }

    fn mapping(&self, id: u32) -> Result<Vec<MappedOctant>, MeshError> {
        self.mapping
            .as_ref()
            .ok_or_else(|| MeshError::Tree("the last adapt did not record the mapping".into()))?
            .get(id as usize)
            .cloned()
            .ok_or_else(|| MeshError::Tree(format!("no mapping for octant {id}")))
    }

    fn is_new_r(&self, id: u32) -> bool {
        self.new_r.get(id as usize).copied().unwrap_or(false)
    }

    fn is_new_c(&self, id: u32) -> bool {
        self.new_c.get(id as usize).copied().unwrap_or(false)
    }

    fn find_neighbours(&self, id: u32, entity: usize, codim: usize) -> Result<Vec<OctantInfo>, MeshError> {
        let global = self.locate(OctantInfo::internal(id))?;
        let offset = entity_offset(D, codim, entity)
            .ok_or_else(|| MeshError::Tree(format!("no entity {entity} of codimension {codim}")))?;
        Ok(self
            .neighbours_of(&self.leaves[global], offset)
            .into_iter()
            .filter_map(|g| self.address_of(g))
            .collect())
    }

    fn find_ghost_neighbours(&self, id: u32, entity: usize, codim: usize) -> Result<Vec<OctantInfo>, MeshError> {
        let global = self.locate(OctantInfo::ghost(id))?;
        let offset = entity_offset(D, codim, entity)
            .ok_or_else(|| MeshError::Tree(format!("no entity {entity} of codimension {codim}")))?;
        Ok(self
            .neighbours_of(&self.leaves[global], offset)
            .into_iter()
            .filter(|&g| self.is_owned(g))
            .filter_map(|g| self.address_of(g))
            .collect())
    }

    fn set_marker(&mut self, id: u32, marker: i8) -> Result<(), MeshError> {
        let global = self.locate(OctantInfo::internal(id))?;
        self.markers[global] = marker;
        Ok(())
    }

    fn marker(&self, id: u32) -> Result<i8, MeshError> {
        Ok(self.markers[self.locate(OctantInfo::internal(id))?])
    }

    fn set_balance(&mut self, id: u32, enabled: bool) -> Result<(), MeshError> {
        let global = self.locate(OctantInfo::internal(id))?;
        self.balance[global] = enabled;
        Ok(())
    }

    fn adapt(&mut self, mapping: bool) -> Result<bool, MeshError> {
        let prev_partition = self.partition.clone();
        let prev_ghosts = self.ghosts.clone();
        let n = self.leaves.len();
        let mut owners: Vec<usize> = (0..n).map(|g| Self::owner_of(&prev_partition, g)).collect();
        let mut origin: Vec<Vec<usize>> = (0..n).map(|g| vec![g]).collect();
        let mut change = vec![Change::Kept; n];

        // a mapped adapt changes each leaf by one level at most
        if mapping {
            self.markers.iter_mut().for_each(|m| *m = (*m).clamp(-1, 1));
        }
        let mut updated = false;
        while self.adapt_step(&mut owners, &mut origin, &mut change) {
            updated = true;
            if mapping {
                break;
            }
        }
        self.markers.iter_mut().for_each(|m| *m = 0);
        self.sent.clear();
        if !updated {
            self.reset_flags();
            self.mapping = mapping.then(|| {
                (0..self.octant_count())
                    .map(|id| {
                        vec![MappedOctant {
                            id: id as u32,
                            ghost: false,
                            rank: self.rank,
                        }]
                    })
                    .collect()
            });
            return Ok(false);
        }

        self.partition = self.partition_from_owners(&owners);
        self.rebuild_ghosts();
        let local = self.owned_range(self.rank);
        self.new_r = change[local.clone()].iter().map(|c| *c == Change::Refined).collect();
        self.new_c = change[local.clone()].iter().map(|c| *c == Change::Coarsened).collect();
        self.mapping = mapping.then(|| {
            origin[local]
                .iter()
                .map(|prev| {
                    prev.iter()
                        .map(|&g| self.previous_address(g, &prev_partition, &prev_ghosts))
                        .collect()
                })
                .collect()
        });
        log::debug!(
            "tree adapted: {} leaves ({} internal, {} ghosts)",
            self.leaves.len(),
            self.octant_count(),
            self.ghost_count()
        );
        Ok(true)
    }

    fn load_balance(&mut self) -> Result<bool, MeshError> {
        let n = self.leaves.len();
        let p = self.n_procs;
        let partition: Vec<usize> = (0..=p).map(|rank| rank * n / p).collect();
        let prev_partition = std::mem::replace(&mut self.partition, partition);
        let prev_ghosts = self.ghosts.clone();

        let mut sent = SentRanges::new();
        for global in prev_partition[self.rank]..prev_partition[self.rank + 1] {
            let dest = Self::owner_of(&self.partition, global);
            if dest == self.rank {
                continue;
            }
            let id = (global - prev_partition[self.rank]) as u32;
            let ranges = sent.entry(dest).or_default();
            match ranges.last_mut() {
                Some(last) if last.end == id => last.end = id + 1,
                _ => ranges.push(id..id + 1),
            }
        }
        self.sent = sent;

        self.rebuild_ghosts();
        self.reset_flags();
        let local = self.owned_range(self.rank);
        self.mapping = Some(
            local
                .map(|g| vec![self.previous_address(g, &prev_partition, &prev_ghosts)])
                .collect(),
        );
        let changed = prev_partition != self.partition;
        if changed {
            log::debug!(
                "tree load balanced: rank {} owns {} of {} leaves",
                self.rank,
                self.octant_count(),
                n
            );
        }
        Ok(changed)
    }

    fn sent_ranges(&self) -> SentRanges {
        self.sent.clone()
    }

    fn ghost_owner(&self, id: u32) -> Result<usize, MeshError> {
        let global = self.locate(OctantInfo::ghost(id))?;
        Ok(Self::owner_of(&self.partition, global))
    }

    fn point_owner(&self, point: [f64; 3]) -> Option<u32> {
        let cells = f64::from(1u32 << MAX_LEVEL);
        let mut grid = [0u32; D];
        for axis in 0..D {
            let local = point[axis] - self.origin[axis];
            if local < -self.tolerance || local > self.length + self.tolerance {
                return None;
            }
            let scaled = (local / self.length * cells).floor();
            grid[axis] = scaled.clamp(0.0, cells - 1.0) as u32;
        }
        (0..=self.max_level)
            .map(|level| Octant {
                level,
                coords: grid.map(|c| c >> (MAX_LEVEL - level)),
            })
            .find_map(|ancestor| self.lookup.get(&ancestor).copied())
            .and_then(|global| self.address_of(global))
            .filter(|info| info.internal)
            .map(|info| info.id)
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    fn reset_tolerance(&mut self) {
        self.tolerance = DEFAULT_TOLERANCE;
    }

    fn origin(&self) -> [f64; 3] {
        self.origin
    }

    fn set_origin(&mut self, origin: [f64; 3]) {
        self.origin = origin;
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn set_length(&mut self, length: f64) {
        self.length = length;
    }
}
