//! Planar geometry model of a building.
//!
//! All coordinates are in meters. The building itself is produced by an
//! ingestion collaborator and is read-only here; the engine only derives new
//! values from it.

use geo::{Coord, LineString, Polygon as GeoPolygon};

use crate::robust::{point_segment_distance, segment_segment_distance, segments_intersect, signed_area};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Areas below this are treated as degenerate.
pub const AREA_EPSILON: f64 = 1e-9;

/// Tolerance used by containment, overlap and spacing comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// A point in plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the point as an `(x, y)` tuple.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

/// A straight segment: a wall or a corridor centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    /// Creates a segment between two points.
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Creates a segment from raw coordinates.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Returns true if both endpoints are finite.
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Checks whether this segment shares any point with `other`.
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(
            self.start.as_tuple(),
            self.end.as_tuple(),
            other.start.as_tuple(),
            other.end.as_tuple(),
        )
    }

    /// Distance from a point to this segment.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        point_segment_distance(p.as_tuple(), self.start.as_tuple(), self.end.as_tuple())
    }

    /// Distance between two segments (zero if they intersect).
    pub fn distance_to_segment(&self, other: &Segment) -> f64 {
        segment_segment_distance(
            self.start.as_tuple(),
            self.end.as_tuple(),
            other.start.as_tuple(),
            other.end.as_tuple(),
        )
    }
}

/// A closed polygon ring. The closing edge from the last point back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a polygon from `(x, y)` vertices.
    pub fn from_tuples(vertices: Vec<(f64, f64)>) -> Self {
        Self::new(vertices.into_iter().map(Point::from).collect())
    }

    /// Creates an axis-aligned rectangle.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Rect::new(min_x, min_y, max_x, max_y).to_polygon()
    }

    /// Returns the vertices.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(Point::as_tuple).collect()
    }

    /// Unsigned area of the ring.
    pub fn area(&self) -> f64 {
        signed_area(&self.tuples()).abs()
    }

    /// Returns true if the polygon has at least three finite vertices and a
    /// positive area.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
            && self.points.iter().all(Point::is_finite)
            && self.area() > AREA_EPSILON
    }

    /// Axis-aligned bounding rectangle over the finite vertices.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::enclosing(self.points.iter().copied())
    }

    /// Returns the ring as counter-clockwise `[x, y]` pairs, the contour
    /// representation used by the boolean overlay.
    pub fn to_ccw_contour(&self) -> Vec<[f64; 2]> {
        let mut contour: Vec<[f64; 2]> = self.points.iter().map(|p| [p.x, p.y]).collect();
        if signed_area(&self.tuples()) < 0.0 {
            contour.reverse();
        }
        contour
    }

    /// Converts to a `geo` polygon without holes.
    pub fn to_geo(&self) -> GeoPolygon<f64> {
        let exterior = LineString::from(
            self.points
                .iter()
                .map(|&p| Coord::from(p))
                .collect::<Vec<_>>(),
        );
        GeoPolygon::new(exterior, vec![])
    }
}

/// An axis-aligned rectangle, used for unit footprints and envelopes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle from two corners, normalizing their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Creates a rectangle of the given size centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    /// Smallest rectangle enclosing all finite points, if any.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut bounds: Option<Rect> = None;
        for p in points.into_iter().filter(Point::is_finite) {
            bounds = Some(match bounds {
                None => Rect::new(p.x, p.y, p.x, p.y),
                Some(r) => Rect {
                    min_x: r.min_x.min(p.x),
                    min_y: r.min_y.min(p.y),
                    max_x: r.max_x.max(p.x),
                    max_y: r.max_y.max(p.y),
                },
            });
        }
        bounds
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grows (or, for negative `d`, shrinks) the rectangle on every side.
    /// Shrinking never inverts the rectangle; it collapses onto its center.
    pub fn inflate(&self, d: f64) -> Self {
        let c = self.center();
        let hw = (self.width() / 2.0 + d).max(0.0);
        let hh = (self.height() / 2.0 + d).max(0.0);
        Self::new(c.x - hw, c.y - hh, c.x + hw, c.y + hh)
    }

    /// Returns the four corners in counter-clockwise order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Returns the four edges in counter-clockwise order.
    pub fn edges(&self) -> [Segment; 4] {
        let [a, b, c, d] = self.corners();
        [
            Segment::new(a, b),
            Segment::new(b, c),
            Segment::new(c, d),
            Segment::new(d, a),
        ]
    }

    /// Checks whether a point lies in the closed rectangle.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Checks whether `other` lies in the closed rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x >= self.min_x - TOLERANCE
            && other.max_x <= self.max_x + TOLERANCE
            && other.min_y >= self.min_y - TOLERANCE
            && other.max_y <= self.max_y + TOLERANCE
    }

    /// Returns true if the interiors of the two rectangles overlap with a
    /// positive area. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let ox = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let oy = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        ox > TOLERANCE && oy > TOLERANCE
    }

    /// Clearance between two rectangles (zero when they touch or overlap).
    pub fn gap(&self, other: &Rect) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx.hypot(dy)
    }

    /// Distance from a segment to the closed rectangle.
    pub fn distance_to_segment(&self, segment: &Segment) -> f64 {
        if self.contains_point(&segment.start) || self.contains_point(&segment.end) {
            return 0.0;
        }
        self.edges()
            .iter()
            .map(|edge| edge.distance_to_segment(segment))
            .fold(f64::INFINITY, f64::min)
    }

    /// Converts to a polygon ring (counter-clockwise).
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }

    /// Converts to a `geo` polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        self.to_polygon().to_geo()
    }
}

/// The normalized building outline consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildingGeometry {
    /// Outer boundary of the building (a single simple polygon).
    pub boundary: Polygon,

    /// Wall segments, possibly disconnected.
    #[cfg_attr(feature = "serde", serde(default))]
    pub walls: Vec<Segment>,

    /// Off-limits zones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub restricted_zones: Vec<Polygon>,

    /// Entrance zones, kept free of units.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entrance_zones: Vec<Polygon>,
}

impl BuildingGeometry {
    /// Creates a building with the given boundary and no obstacles.
    pub fn new(boundary: Polygon) -> Self {
        Self {
            boundary,
            ..Default::default()
        }
    }

    /// Creates a rectangular building anchored at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(Polygon::rectangle(0.0, 0.0, width, height))
    }

    /// Adds a wall segment.
    pub fn with_wall(mut self, wall: Segment) -> Self {
        self.walls.push(wall);
        self
    }

    /// Adds a restricted zone.
    pub fn with_restricted_zone(mut self, zone: Polygon) -> Self {
        self.restricted_zones.push(zone);
        self
    }

    /// Adds an entrance zone.
    pub fn with_entrance_zone(mut self, zone: Polygon) -> Self {
        self.entrance_zones.push(zone);
        self
    }

    /// Rectangle enclosing the boundary, or the walls when the boundary
    /// spans no area.
    pub fn envelope(&self) -> Option<Rect> {
        let walls = || Rect::enclosing(self.walls.iter().flat_map(|w| [w.start, w.end]));
        match Rect::enclosing(self.boundary.points.iter().copied()) {
            Some(r) if r.area() > AREA_EPSILON => Some(r),
            Some(r) => walls().filter(|w| w.area() > AREA_EPSILON).or(Some(r)),
            None => walls(),
        }
    }

    /// Checks the boundary invariant (simple polygon with positive area) and
    /// that every obstacle coordinate is finite.
    pub fn validate(&self) -> Result<()> {
        if self.boundary.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "boundary must have at least 3 vertices, got {}",
                self.boundary.len()
            )));
        }
        if !self.boundary.is_valid() {
            return Err(Error::InvalidGeometry(
                "boundary must be finite with a positive area".into(),
            ));
        }
        if let Some(i) = self.walls.iter().position(|w| !w.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "wall {} has non-finite coordinates",
                i
            )));
        }
        let zones = self.restricted_zones.iter().chain(&self.entrance_zones);
        if zones
            .flat_map(|z| z.points.iter())
            .any(|p| !p.is_finite())
        {
            return Err(Error::InvalidGeometry(
                "zone has non-finite coordinates".into(),
            ));
        }
        Ok(())
    }
}
