//! Spatial indexing of placed units using an R*-tree.
//!
//! The placement search asks "which units lie within `min_spacing` of this
//! candidate?" once per trial position. The index answers with a broad-phase
//! candidate list; exact clearance is checked by the caller.

use floorplan_core::Rect;
use rstar::{RTree, RTreeObject, AABB};

/// An entry in the index representing a placed unit.
#[derive(Debug, Clone)]
pub struct UnitEntry {
    /// Index of the unit in the placed list
    pub index: usize,
    /// Axis-aligned footprint (min_x, min_y, max_x, max_y)
    pub aabb: [f64; 4],
}

impl UnitEntry {
    pub fn new(index: usize, rect: &Rect) -> Self {
        Self {
            index,
            aabb: [rect.min_x, rect.min_y, rect.max_x, rect.max_y],
        }
    }
}

impl RTreeObject for UnitEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.aabb[0], self.aabb[1]], [self.aabb[2], self.aabb[3]])
    }
}

/// R*-tree over the footprints of placed units.
#[derive(Debug)]
pub struct UnitIndex {
    tree: RTree<UnitEntry>,
}

impl UnitIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Inserts a unit footprint.
    pub fn insert(&mut self, index: usize, rect: &Rect) {
        self.tree.insert(UnitEntry::new(index, rect));
    }

    /// Indices of units whose footprints intersect `rect` grown by `margin`.
    pub fn query_with_margin(&self, rect: &Rect, margin: f64) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [rect.min_x - margin, rect.min_y - margin],
            [rect.max_x + margin, rect.max_y + margin],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.index)
            .collect()
    }
}

impl Default for UnitIndex {
    fn default() -> Self {
        Self::new()
    }
}
