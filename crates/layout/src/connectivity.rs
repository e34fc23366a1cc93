//! Corridor network synthesis.
//!
//! Unit centers form a complete graph. An edge is admissible when the
//! straight segment between the two centers crosses no wall, and weighs its
//! Euclidean length. Kruskal's algorithm reduces the admissible graph to a
//! minimum spanning tree, emitted as one corridor per tree edge.
//!
//! When line of sight cannot connect every unit (a single unit, no
//! admissible edge, or a graph split by walls) the builder lays out an
//! axis-aligned grid instead: one horizontal corridor per unit row across the
//! full building width and one vertical corridor per unit column across the
//! full height. Every row crosses every column, so the grid is connected.

use floorplan_core::{
    BuildingGeometry, CorridorOrientation, CorridorSegment, EngineConfig, GridFallbackCause,
    PlacedUnit, Point, Rect, Segment,
};

/// Corridors of a layout and, if used, why the grid fallback was chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorridorNetwork {
    pub corridors: Vec<CorridorSegment>,
    pub fallback: Option<GridFallbackCause>,
}

/// A weighted edge between units `a < b`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    a: usize,
    b: usize,
    weight: f64,
}

/// Disjoint-set forest with path halving and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`; false if they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Builds the corridor network between placed units.
#[derive(Debug, Clone)]
pub struct ConnectivityBuilder {
    alignment_tolerance: f64,
}

impl ConnectivityBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            alignment_tolerance: config.grid_alignment_tolerance,
        }
    }

    /// Connects `units` with corridors of width `corridor_width`.
    ///
    /// No units means no corridors.
    pub fn build_corridors(
        &self,
        units: &[PlacedUnit],
        geometry: &BuildingGeometry,
        corridor_width: f64,
    ) -> CorridorNetwork {
        if units.is_empty() {
            return CorridorNetwork::default();
        }
        if units.len() < 2 {
            return self.grid_fallback(units, geometry, corridor_width, GridFallbackCause::TooFewUnits);
        }

        let edges = admissible_edges(units, geometry);
        if edges.is_empty() {
            return self.grid_fallback(
                units,
                geometry,
                corridor_width,
                GridFallbackCause::NoAdmissibleEdges,
            );
        }

        let tree = minimum_spanning_tree(units.len(), edges);
        if tree.len() + 1 < units.len() {
            return self.grid_fallback(
                units,
                geometry,
                corridor_width,
                GridFallbackCause::DisconnectedGraph,
            );
        }

        log::debug!("Corridor tree: {} edges over {} units", tree.len(), units.len());

        let corridors = tree
            .into_iter()
            .map(|e| {
                CorridorSegment::new(
                    format!("corridor_{}_{}", e.a, e.b),
                    units[e.a].center,
                    units[e.b].center,
                    corridor_width,
                    CorridorOrientation::Link,
                )
            })
            .collect();

        CorridorNetwork {
            corridors,
            fallback: None,
        }
    }

    fn grid_fallback(
        &self,
        units: &[PlacedUnit],
        geometry: &BuildingGeometry,
        corridor_width: f64,
        cause: GridFallbackCause,
    ) -> CorridorNetwork {
        log::warn!("Using grid corridors ({:?})", cause);
        CorridorNetwork {
            corridors: self.grid_corridors(units, geometry, corridor_width),
            fallback: Some(cause),
        }
    }

    /// One horizontal corridor per row and one vertical corridor per column
    /// of unit centers, spanning the building envelope.
    pub fn grid_corridors(
        &self,
        units: &[PlacedUnit],
        geometry: &BuildingGeometry,
        corridor_width: f64,
    ) -> Vec<CorridorSegment> {
        let unit_extent = || Rect::enclosing(units.iter().flat_map(|u| u.rect().corners()));
        let Some(env) = geometry.envelope().or_else(unit_extent) else {
            return Vec::new();
        };

        let rows = cluster(units.iter().map(|u| u.center.y), self.alignment_tolerance);
        let columns = cluster(units.iter().map(|u| u.center.x), self.alignment_tolerance);

        let horizontal = rows.into_iter().enumerate().map(|(n, y)| {
            CorridorSegment::new(
                format!("h_corridor_{}", n + 1),
                Point::new(env.min_x, y),
                Point::new(env.max_x, y),
                corridor_width,
                CorridorOrientation::Horizontal,
            )
        });
        let vertical = columns.into_iter().enumerate().map(|(n, x)| {
            CorridorSegment::new(
                format!("v_corridor_{}", n + 1),
                Point::new(x, env.min_y),
                Point::new(x, env.max_y),
                corridor_width,
                CorridorOrientation::Vertical,
            )
        });

        horizontal.chain(vertical).collect()
    }
}

/// All center-to-center edges that cross no wall, in `(i, j)` lexicographic
/// order.
fn admissible_edges(units: &[PlacedUnit], geometry: &BuildingGeometry) -> Vec<Edge> {
    let walls: Vec<_> = geometry.walls.iter().filter(|w| w.is_finite()).collect();
    let mut edges = Vec::new();

    for a in 0..units.len() {
        for b in (a + 1)..units.len() {
            let link = Segment::new(units[a].center, units[b].center);
            if walls.iter().any(|w| w.intersects(&link)) {
                continue;
            }
            edges.push(Edge {
                a,
                b,
                weight: link.length(),
            });
        }
    }

    edges
}

/// Kruskal's algorithm. The stable sort keeps equal-weight edges in
/// insertion order.
fn minimum_spanning_tree(n: usize, mut edges: Vec<Edge>) -> Vec<Edge> {
    edges.sort_by(|x, y| x.weight.total_cmp(&y.weight));

    let mut sets = UnionFind::new(n);
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    for edge in edges {
        if sets.union(edge.a, edge.b) {
            tree.push(edge);
            if tree.len() + 1 == n {
                break;
            }
        }
    }
    tree
}

/// Groups sorted values lying within `tolerance` of the first value of their
/// group; returns each group's mean.
fn cluster(values: impl Iterator<Item = f64>, tolerance: f64) -> Vec<f64> {
    let mut values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    values.sort_by(f64::total_cmp);

    // (first, sum, count)
    let mut groups: Vec<(f64, f64, usize)> = Vec::new();
    for v in values {
        match groups.last_mut() {
            Some(group) if v - group.0 <= tolerance => {
                group.1 += v;
                group.2 += 1;
            }
            _ => groups.push((v, v, 1)),
        }
    }

    groups.into_iter().map(|(_, sum, count)| sum / count as f64).collect()
}
