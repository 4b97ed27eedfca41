use std::mem;

use tracing::trace;

use crate::collision::ColliderRef;
use crate::error::{PhysicsError, Result};
use crate::geometry::Aabb;

/// Hard ceiling for [`OctreeConfig::max_depth`]; the node pool grows as 8^depth
pub const MAX_SUPPORTED_DEPTH: u8 = 6;

/// Children per internal node
const SUBDIVISIONS: usize = 8;

/// Configuration for the octree broad-phase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctreeConfig {
    /// Depth at which nodes stop subdividing (root is depth 0)
    pub max_depth: u8,
    /// Bucket size that triggers subdivision of a leaf
    pub bucket_capacity: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            bucket_capacity: 16,
        }
    }
}

impl OctreeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(PhysicsError::InvalidConfig("octree max_depth must be at most 6"));
        }
        if self.bucket_capacity == 0 {
            return Err(PhysicsError::InvalidConfig("octree bucket_capacity must be positive"));
        }
        Ok(())
    }

    /// Number of nodes of a full tree of depth `max_depth`
    pub fn node_pool_size(&self) -> usize {
        (0..=u32::from(self.max_depth)).map(|d| SUBDIVISIONS.pow(d)).sum()
    }
}

/// A collider's world-space bounds as stored in an octree bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEntry {
    pub aabb: Aabb,
    pub collider: ColliderRef,
}

#[derive(Debug, Clone, Default)]
struct OctreeNode {
    bounds: Aabb,
    entries: Vec<ColliderEntry>,
    /// Index of the first of 8 contiguous children
    first_child: Option<usize>,
    depth: u8,
}

/// Depth-bounded octree rebuilt from scratch every step.
///
/// All nodes are allocated up front for the worst case, a full tree of
/// depth `max_depth`. Subdividing a node hands it the next unused block of
/// 8 nodes; [`OctTree::set_up_root`] releases every block at once. Buckets
/// are cleared in place so their allocations are reused across rebuilds.
///
/// An entry whose bounds straddle several children is stored in each of
/// them, so the same pair of colliders can share more than one leaf.
#[derive(Debug, Clone)]
pub struct OctTree {
    nodes: Vec<OctreeNode>,
    next_free: usize,
    config: OctreeConfig,
}

impl Default for OctTree {
    fn default() -> Self {
        Self::new(OctreeConfig::default())
    }
}

impl OctTree {
    pub fn new(config: OctreeConfig) -> Self {
        let mut nodes = Vec::new();
        nodes.resize_with(config.node_pool_size().max(1), OctreeNode::default);
        nodes[0].entries.reserve(config.bucket_capacity);
        Self {
            nodes,
            next_free: 1,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Empties the tree and sets the bounds of the root node
    pub fn set_up_root(&mut self, bounds: Aabb) {
        for node in &mut self.nodes[..self.next_free] {
            node.entries.clear();
            node.first_child = None;
        }
        let root = &mut self.nodes[0];
        root.bounds = bounds;
        root.depth = 0;
        self.next_free = 1;
    }

    #[inline]
    pub fn root_bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    /// Inserts a collider's bounds starting from the root
    pub fn insert(&mut self, collider: ColliderRef, aabb: Aabb) {
        self.insert_at(0, ColliderEntry { aabb, collider });
    }

    fn insert_at(&mut self, index: usize, entry: ColliderEntry) {
        if let Some(first) = self.nodes[index].first_child {
            for child in first..first + SUBDIVISIONS {
                if self.nodes[child].bounds.intersects(entry.aabb) {
                    self.insert_at(child, entry);
                }
            }
            return;
        }

        let node = &self.nodes[index];
        let can_split = node.depth < self.config.max_depth
            && self.next_free + SUBDIVISIONS <= self.nodes.len();

        if node.entries.len() >= self.config.bucket_capacity && can_split {
            let first = self.subdivide(index);

            let mut entries = mem::take(&mut self.nodes[index].entries);
            entries.push(entry);
            for child in first..first + SUBDIVISIONS {
                for &moved in &entries {
                    if self.nodes[child].bounds.intersects(moved.aabb) {
                        self.insert_at(child, moved);
                    }
                }
            }
            entries.clear();
            self.nodes[index].entries = entries;
        } else {
            let node = &mut self.nodes[index];
            node.entries.push(entry);
            if node.entries.len() == self.config.bucket_capacity + 1 {
                trace!(
                    node = index,
                    depth = node.depth,
                    capacity = self.config.bucket_capacity,
                    "octree leaf over capacity at max depth"
                );
            }
        }
    }

    fn subdivide(&mut self, index: usize) -> usize {
        let first = self.next_free;
        self.next_free += SUBDIVISIONS;

        let bounds = self.nodes[index].bounds;
        let depth = self.nodes[index].depth + 1;
        for (octant, child) in self.nodes[first..first + SUBDIVISIONS].iter_mut().enumerate() {
            child.bounds = bounds.octant(octant);
            child.depth = depth;
            child.entries.clear();
            child.first_child = None;
        }
        self.nodes[index].first_child = Some(first);

        trace!(node = index, depth, first_child = first, "octree node subdivided");
        first
    }

    /// Buckets of all leaf nodes currently in use, empty ones included
    pub fn leaves(&self) -> impl Iterator<Item = &[ColliderEntry]> + '_ {
        self.nodes[..self.next_free]
            .iter()
            .filter(|node| node.first_child.is_none())
            .map(|node| node.entries.as_slice())
    }

    /// Number of nodes handed out since the last [`OctTree::set_up_root`]
    #[inline]
    pub fn node_count(&self) -> usize {
        self.next_free
    }

    /// Size of the preallocated node pool
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }
}
