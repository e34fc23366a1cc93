//! Constraint validation of a single unit.
//!
//! The validator re-checks one candidate against the building and the other
//! units and reports every broken constraint. It only reads its inputs, so a
//! live editor may call it while an optimization is running.

use geo::{Contains, Intersects, Polygon as GeoPolygon};

use floorplan_core::{
    BuildingGeometry, EngineConfig, LayoutProfile, PlacedUnit, Polygon, ValidationOutcome,
    ViolationKind, TOLERANCE,
};

use crate::zones::{resolve_zone, shape_to_geo};

/// Checks units against walls, boundary, zones and each other.
#[derive(Debug, Clone)]
pub struct ConstraintValidator<'a> {
    geometry: &'a BuildingGeometry,
    boundary: Option<GeoPolygon<f64>>,
    restricted: Vec<(usize, Vec<GeoPolygon<f64>>)>,
    entrances: Vec<(usize, Vec<GeoPolygon<f64>>)>,
    min_spacing: f64,
    wall_clearance: f64,
    boundary_margin: f64,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(geometry: &'a BuildingGeometry, profile: &LayoutProfile, config: &EngineConfig) -> Self {
        // A degenerate boundary is judged by its envelope, the same rectangle
        // the placeable area falls back to
        let boundary = if geometry.boundary.is_valid() {
            Some(geometry.boundary.to_geo())
        } else {
            geometry.envelope().map(|r| r.to_geo_polygon())
        };

        Self {
            geometry,
            boundary,
            restricted: zone_polygons(&geometry.restricted_zones),
            entrances: zone_polygons(&geometry.entrance_zones),
            min_spacing: profile.min_spacing(),
            wall_clearance: config.wall_clearance,
            boundary_margin: config.boundary_margin,
        }
    }

    /// Validates `candidate` against the building and `existing` units.
    ///
    /// Units in `existing` with the candidate's id are skipped, so a unit
    /// already in the layout can be validated in place.
    pub fn validate(&self, candidate: &PlacedUnit, existing: &[PlacedUnit]) -> ValidationOutcome {
        let dimensions_ok = candidate.width.is_finite()
            && candidate.height.is_finite()
            && candidate.width > 0.0
            && candidate.height > 0.0;
        if !dimensions_ok {
            return ValidationOutcome::from_violations(vec![ViolationKind::InvalidDimensions]);
        }
        if !candidate.center.is_finite() {
            return ValidationOutcome::from_violations(vec![ViolationKind::OutsideBoundary]);
        }

        let rect = candidate.rect();
        let inner = rect.inflate(-TOLERANCE).to_geo_polygon();
        let mut violations = Vec::new();

        // Boundary minus safety margin
        let shell = rect.inflate(self.boundary_margin - TOLERANCE);
        let inside = self
            .boundary
            .as_ref()
            .is_some_and(|b| b.contains(&shell.to_geo_polygon()));
        if !inside {
            violations.push(ViolationKind::OutsideBoundary);
        }

        for (zone, lobes) in &self.restricted {
            if lobes.iter().any(|p| p.intersects(&inner)) {
                violations.push(ViolationKind::RestrictedZone { zone: *zone });
            }
        }
        for (zone, lobes) in &self.entrances {
            if lobes.iter().any(|p| p.intersects(&inner)) {
                violations.push(ViolationKind::EntranceZone { zone: *zone });
            }
        }

        for other in existing.iter().filter(|u| u.id != candidate.id) {
            let other_rect = other.rect();
            if rect.overlaps(&other_rect) {
                violations.push(ViolationKind::Overlap {
                    other: other.id.clone(),
                });
                continue;
            }
            let distance = rect.gap(&other_rect);
            if distance < self.min_spacing - TOLERANCE {
                violations.push(ViolationKind::InsufficientSpacing {
                    other: other.id.clone(),
                    distance,
                    required: self.min_spacing,
                });
            }
        }

        for (wall, segment) in self.geometry.walls.iter().enumerate() {
            if !segment.is_finite() {
                continue;
            }
            let distance = rect.distance_to_segment(segment);
            if distance < self.wall_clearance - TOLERANCE {
                violations.push(ViolationKind::WallClearance {
                    wall,
                    distance,
                    required: self.wall_clearance,
                });
            }
        }

        ValidationOutcome::from_violations(violations)
    }
}

/// Zones resolved the same way the placeable area resolves them, keyed by
/// their input index. Zones that enclose nothing are left out.
fn zone_polygons(zones: &[Polygon]) -> Vec<(usize, Vec<GeoPolygon<f64>>)> {
    zones
        .iter()
        .enumerate()
        .filter_map(|(i, zone)| {
            let lobes: Vec<_> = resolve_zone(zone)?.iter().filter_map(shape_to_geo).collect();
            (!lobes.is_empty()).then_some((i, lobes))
        })
        .collect()
}
