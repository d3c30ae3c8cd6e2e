//! Octree over agent positions.
//!
//! The [`RegionTree`] is rebuilt from scratch every tick: agents are inserted
//! once, the tree is then read-only while every agent queries it for
//! neighbors, and it is dropped at the end of the tick. There is no removal
//! and no rebalancing.
//!
//! Each node stores up to `capacity` entries directly. The first insertion
//! past capacity splits the node into eight octants; from then on new entries
//! are routed to the children while the entries already stored in the node
//! stay where they are.

use crate::region::Region;
use glam::Vec3;

/// Default depth limit for [`RegionTree`].
///
/// Agents that share a position cannot be separated by subdivision. Past this
/// depth a node keeps accepting entries over its capacity.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A position and the item stored at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeEntry<T> {
    /// Where the item was when it was inserted.
    pub position: Vec3,
    /// The stored item, usually an index into the agent population.
    pub item: T,
}

/// An 8-way recursive spatial index.
///
/// # Example
///
/// ```
/// use flocksim::{Region, RegionTree, Vec3};
///
/// let mut tree = RegionTree::new(Region::cube(Vec3::ZERO, 100.0), 4);
/// tree.insert(Vec3::new(10.0, 20.0, 30.0), 0usize);
/// tree.insert(Vec3::new(-50.0, 50.0, 0.0), 1usize);
///
/// let mut found = Vec::new();
/// tree.query(&Region::cube(Vec3::ZERO, 40.0), &mut found);
/// assert_eq!(found, vec![0]);
/// ```
#[derive(Debug)]
pub struct RegionTree<T> {
    boundary: Region,
    capacity: usize,
    level: usize,
    max_depth: usize,
    entries: Vec<TreeEntry<T>>,
    children: Option<Box<[RegionTree<T>; 8]>>,
}

impl<T: Copy> RegionTree<T> {
    /// Create an empty tree covering `boundary`.
    ///
    /// `capacity` is the number of entries a node holds before it subdivides.
    /// A capacity of zero is treated as one.
    pub fn new(boundary: Region, capacity: usize) -> Self {
        Self::node(boundary, capacity.max(1), 0, DEFAULT_MAX_DEPTH)
    }

    /// Set the depth past which nodes stop subdividing.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn node(boundary: Region, capacity: usize, level: usize, max_depth: usize) -> Self {
        Self {
            boundary,
            capacity,
            level,
            max_depth,
            entries: Vec::with_capacity(capacity),
            children: None,
        }
    }

    /// The volume this node covers.
    #[inline]
    pub fn boundary(&self) -> &Region {
        &self.boundary
    }

    /// Entries a node holds before it subdivides.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries stored directly in this node (not in its children).
    #[inline]
    pub fn entries(&self) -> &[TreeEntry<T>] {
        &self.entries
    }

    /// Whether this node has split into octants.
    #[inline]
    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// The eight children, once subdivided.
    #[inline]
    pub fn children(&self) -> Option<&[RegionTree<T>; 8]> {
        self.children.as_deref()
    }

    /// Insert `item` at `position`.
    ///
    /// Returns `false` if `position` is outside this node's boundary. Callers
    /// inserting at the root treat that as "not indexed this tick".
    pub fn insert(&mut self, position: Vec3, item: T) -> bool {
        if !self.boundary.contains(position) {
            return false;
        }
        self.insert_contained(position, item)
    }

    fn insert_contained(&mut self, position: Vec3, item: T) -> bool {
        if !self.is_subdivided() && (self.entries.len() < self.capacity || self.level >= self.max_depth)
        {
            self.entries.push(TreeEntry { position, item });
            return true;
        }

        self.subdivide();
        debug_assert!(self.children.is_some(), "node has no children after subdividing");

        // Routing by the center picks the first octant, in fixed order, whose
        // boundary holds the point. Unlike re-testing each child's bounds it
        // cannot lose a point on the outer face to rounding.
        let octant = self.boundary.octant_index(position);
        match self.children.as_deref_mut() {
            Some(children) => children[octant].insert_contained(position, item),
            None => false,
        }
    }

    /// Split this node into eight octants. Does nothing if already split.
    pub fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        let (capacity, level, max_depth) = (self.capacity, self.level + 1, self.max_depth);
        let octants = self.boundary.octants();
        self.children = Some(Box::new(
            octants.map(|octant| Self::node(octant, capacity, level, max_depth)),
        ));
    }

    /// Collect every item whose position lies inside `range`.
    ///
    /// Results are appended to `found` in no particular order. Subtrees whose
    /// boundary does not intersect `range` are skipped entirely.
    pub fn query(&self, range: &Region, found: &mut Vec<T>) {
        if !self.boundary.intersects(range) {
            return;
        }

        found.extend(
            self.entries
                .iter()
                .filter(|e| range.contains(e.position))
                .map(|e| e.item),
        );

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query(range, found);
            }
        }
    }

    /// Like [`query`](Self::query) but returns entries with their positions.
    pub fn query_entries<'a>(&'a self, range: &Region, found: &mut Vec<&'a TreeEntry<T>>) {
        if !self.boundary.intersects(range) {
            return;
        }

        found.extend(self.entries.iter().filter(|e| range.contains(e.position)));

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query_entries(range, found);
            }
        }
    }

    /// Total number of entries in this node and all descendants.
    pub fn len(&self) -> usize {
        self.entries.len()
            + self
                .children()
                .map_or(0, |children| children.iter().map(RegionTree::len).sum())
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |children| children.iter().map(RegionTree::node_count).sum())
    }

    /// Height of the tree: 1 for a single leaf.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |children| children.iter().map(RegionTree::depth).max().unwrap_or(0))
    }
}
