//! Placeable area computation.
//!
//! The placeable area is the building boundary minus every restricted zone,
//! every entrance zone and a clearance buffer around every wall segment. The
//! difference is computed with `i_overlay` and may split into several
//! disjoint regions, each of which is sampled separately by the placement
//! search.
//!
//! Geometry faults never escape this module: a degenerate boundary, a
//! non-finite coordinate or a panic inside the overlay all degrade to the
//! building's bounding rectangle, flagged through
//! [`PlaceableArea::used_fallback`].

use std::f64::consts::PI;
use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{Area, Centroid, Contains, Coord, LineString, Polygon as GeoPolygon};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use floorplan_core::{
    BuildingGeometry, EngineConfig, Point, Polygon, Rect, Segment, AREA_EPSILON, TOLERANCE,
};

pub(crate) type Contour = Vec<[f64; 2]>;
pub(crate) type Shape = Vec<Contour>;

/// One connected piece of the placeable area.
#[derive(Debug, Clone)]
pub struct PlaceableRegion {
    polygon: GeoPolygon<f64>,
    area: f64,
    centroid: Point,
    bounds: Rect,
}

impl PlaceableRegion {
    /// Wraps a `geo` polygon, rejecting pieces with no usable area.
    pub fn from_geo(polygon: GeoPolygon<f64>) -> Option<Self> {
        let area = polygon.unsigned_area();
        if !(area > AREA_EPSILON && area.is_finite()) {
            return None;
        }
        let bounds = Rect::enclosing(polygon.exterior().coords().map(|c| Point::new(c.x, c.y)))?;
        let centroid = polygon
            .centroid()
            .map(|c| Point::new(c.x(), c.y()))
            .unwrap_or_else(|| bounds.center());

        Some(Self {
            polygon,
            area,
            centroid,
            bounds,
        })
    }

    /// A region covering a whole rectangle.
    pub fn from_rect(rect: Rect) -> Option<Self> {
        Self::from_geo(rect.to_geo_polygon())
    }

    fn from_shape(shape: &Shape) -> Option<Self> {
        Self::from_geo(shape_to_geo(shape)?)
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Checks whether a rectangle lies entirely within the region. Touching
    /// the region outline is allowed.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        if !self.bounds.contains_rect(rect) {
            return false;
        }
        let inner = rect.inflate(-TOLERANCE);
        self.polygon.contains(&inner.to_geo_polygon())
    }

    /// Distance from a point to the nearest ring of the region (outer ring
    /// or hole).
    pub fn distance_to_boundary(&self, p: &Point) -> f64 {
        std::iter::once(self.polygon.exterior())
            .chain(self.polygon.interiors())
            .flat_map(|ring| ring.lines())
            .map(|line| {
                Segment::from_coords(line.start.x, line.start.y, line.end.x, line.end.y)
                    .distance_to_point(p)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

/// The full placeable area of a building.
#[derive(Debug, Clone, Default)]
pub struct PlaceableArea {
    regions: Vec<PlaceableRegion>,
    fallback: bool,
}

impl PlaceableArea {
    /// Disjoint regions in overlay output order.
    pub fn regions(&self) -> &[PlaceableRegion] {
        &self.regions
    }

    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(PlaceableRegion::area).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// True if the bounding rectangle replaced the real computation.
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }
}

/// Derives the placeable area of a building.
#[derive(Debug, Clone)]
pub struct ZoneCalculator {
    wall_clearance: f64,
    arc_segments: usize,
}

impl ZoneCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            wall_clearance: config.wall_clearance,
            arc_segments: config.buffer_arc_segments.max(2),
        }
    }

    /// Computes the placeable area: boundary minus restricted zones, minus
    /// entrance zones, minus the wall clearance buffers.
    pub fn compute_placeable_area(&self, geometry: &BuildingGeometry) -> PlaceableArea {
        let envelope = geometry.envelope().filter(|r| r.area() > AREA_EPSILON);

        let (subject, mut fallback) = if geometry.boundary.is_valid() {
            (geometry.boundary.to_ccw_contour(), false)
        } else {
            match envelope {
                Some(rect) => {
                    log::warn!(
                        "Building boundary is degenerate ({} vertices), using its bounding rectangle",
                        geometry.boundary.len()
                    );
                    (rect.to_polygon().to_ccw_contour(), true)
                }
                None => {
                    log::warn!("Building has neither a usable boundary nor walls");
                    return PlaceableArea {
                        regions: Vec::new(),
                        fallback: true,
                    };
                }
            }
        };

        let regions = self
            .obstacle_contours(geometry)
            .and_then(|obstacles| subtract(subject, &obstacles));

        let regions = match regions {
            Some(regions) => regions,
            None => {
                log::warn!("Placeable area overlay failed, using the bounding rectangle");
                fallback = true;
                envelope
                    .and_then(PlaceableRegion::from_rect)
                    .into_iter()
                    .collect()
            }
        };

        log::debug!(
            "Placeable area: {} region(s), {:.2} m2",
            regions.len(),
            regions.iter().map(PlaceableRegion::area).sum::<f64>()
        );

        PlaceableArea { regions, fallback }
    }

    /// All contours to subtract from the boundary, or `None` if any input
    /// coordinate is unusable.
    fn obstacle_contours(&self, geometry: &BuildingGeometry) -> Option<Vec<Contour>> {
        let mut contours = Vec::new();

        for zone in geometry.restricted_zones.iter().chain(&geometry.entrance_zones) {
            contours.extend(resolve_zone(zone)?.into_iter().flatten());
        }

        if self.wall_clearance > 0.0 {
            for wall in &geometry.walls {
                if !wall.is_finite() {
                    return None;
                }
                contours.push(self.wall_buffer(wall));
            }
        }

        Some(contours)
    }

    /// Polygonal capsule of radius `wall_clearance` around a wall. The arcs
    /// are circumscribed, so the polygon covers the true buffer.
    fn wall_buffer(&self, wall: &Segment) -> Contour {
        let n = self.arc_segments;
        let step = PI / n as f64;
        let radius = self.wall_clearance / (step / 2.0).cos();
        let (a, b) = (wall.start, wall.end);

        let arc = |center: Point, from: f64, count: usize| {
            (0..count).map(move |k| {
                let t = from + k as f64 * step;
                [center.x + radius * t.cos(), center.y + radius * t.sin()]
            })
        };

        if wall.length() <= TOLERANCE {
            return arc(a, 0.0, 2 * n).collect();
        }

        let heading = (b.y - a.y).atan2(b.x - a.x);
        arc(b, heading - PI / 2.0, n + 1)
            .chain(arc(a, heading + PI / 2.0, n + 1))
            .collect()
    }
}

/// Resolves a zone outline into simple shapes under the non-zero fill rule.
///
/// A self-intersecting outline splits into its lobes. An outline enclosing
/// nothing resolves to no shapes and is reported. Returns `None` for a
/// non-finite vertex or an overlay fault.
pub(crate) fn resolve_zone(zone: &Polygon) -> Option<Vec<Shape>> {
    if zone.points.iter().any(|p| !p.is_finite()) {
        return None;
    }
    if zone.points.is_empty() {
        return Some(Vec::new());
    }

    let contour = zone.to_ccw_contour();
    let shapes = if zone.points.len() < 3 {
        Vec::new()
    } else {
        let subject = vec![contour.clone()];
        catch_unwind(AssertUnwindSafe(|| {
            subject.overlay(&[contour], OverlayRule::Union, FillRule::NonZero)
        }))
        .ok()?
    };

    let shapes: Vec<Shape> = shapes
        .into_iter()
        .filter(|shape| shape_to_geo(shape).is_some_and(|p| p.unsigned_area() > AREA_EPSILON))
        .collect();
    if shapes.is_empty() {
        log::warn!(
            "Zone with {} vertices encloses no area and is ignored",
            zone.points.len()
        );
    }
    Some(shapes)
}

/// Converts an overlay shape (outer contour first, then holes) to `geo`.
pub(crate) fn shape_to_geo(shape: &Shape) -> Option<GeoPolygon<f64>> {
    let mut rings = shape.iter().filter(|c| c.len() >= 3).map(|contour| {
        LineString::from(
            contour
                .iter()
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect::<Vec<_>>(),
        )
    });
    let exterior = rings.next()?;
    Some(GeoPolygon::new(exterior, rings.collect()))
}

/// Subtracts every obstacle from the subject, one overlay at a time.
///
/// Intermediate shapes are flattened into a contour list; outer contours
/// come back counter-clockwise and holes clockwise, so the non-zero fill
/// rule keeps the holes.
fn subtract(subject: Contour, obstacles: &[Contour]) -> Option<Vec<PlaceableRegion>> {
    let mut shapes: Vec<Shape> = vec![vec![subject]];

    for obstacle in obstacles {
        let current: Vec<Contour> = shapes.iter().flatten().cloned().collect();
        if current.is_empty() {
            break;
        }
        let clip = obstacle.clone();
        shapes = catch_unwind(AssertUnwindSafe(|| {
            current.overlay(&[clip], OverlayRule::Difference, FillRule::NonZero)
        }))
        .ok()?;
    }

    if shapes
        .iter()
        .flatten()
        .flatten()
        .any(|p| !(p[0].is_finite() && p[1].is_finite()))
    {
        return None;
    }

    Some(shapes.iter().filter_map(PlaceableRegion::from_shape).collect())
}
