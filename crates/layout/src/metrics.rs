//! Layout statistics.

use floorplan_core::{
    BuildingGeometry, CategoryKind, CategoryStats, CorridorSegment, PlacedUnit, Statistics,
    AREA_EPSILON,
};

/// Aggregates area, utilization, spacing and efficiency figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the statistics of a layout. Pure function of its inputs.
    pub fn compute_statistics(
        &self,
        units: &[PlacedUnit],
        corridors: &[CorridorSegment],
        geometry: &BuildingGeometry,
    ) -> Statistics {
        let building_area = building_area(geometry);
        let total_unit_area: f64 = units.iter().map(PlacedUnit::area).sum();
        let total_corridor_area: f64 = corridors.iter().map(|c| c.area).sum();
        let total_corridor_length: f64 = corridors.iter().map(|c| c.length).sum();

        let rate = |area: f64| {
            if building_area > AREA_EPSILON {
                area / building_area * 100.0
            } else {
                0.0
            }
        };

        let categories = CategoryKind::ALL
            .iter()
            .map(|&kind| {
                let members = units.iter().filter(|u| u.category == kind);
                CategoryStats {
                    kind,
                    count: members.clone().count(),
                    area: members.map(PlacedUnit::area).sum(),
                }
            })
            .collect();

        let (average_spacing, min_spacing, max_spacing) = spacing(units);

        let average_corridor_length = if corridors.is_empty() {
            0.0
        } else {
            total_corridor_length / corridors.len() as f64
        };

        Statistics {
            building_area,
            total_unit_area,
            total_corridor_area,
            utilization_rate: rate(total_unit_area + total_corridor_area),
            unit_utilization_rate: rate(total_unit_area),
            corridor_utilization_rate: rate(total_corridor_area),
            unit_count: units.len(),
            corridor_count: corridors.len(),
            categories,
            average_spacing,
            min_spacing,
            max_spacing,
            total_corridor_length,
            average_corridor_length,
            efficiency_score: efficiency_score(units.len(), corridors.len()),
        }
    }
}

/// Boundary area, or the envelope area for a degenerate boundary.
fn building_area(geometry: &BuildingGeometry) -> f64 {
    if geometry.boundary.is_valid() {
        geometry.boundary.area()
    } else {
        geometry.envelope().map(|r| r.area()).unwrap_or(0.0)
    }
}

/// Average, minimum and maximum of each unit's clearance to its nearest
/// neighbour. All zero with fewer than two units.
fn spacing(units: &[PlacedUnit]) -> (f64, f64, f64) {
    if units.len() < 2 {
        return (0.0, 0.0, 0.0);
    }

    let rects: Vec<_> = units.iter().map(PlacedUnit::rect).collect();
    let nearest: Vec<f64> = rects
        .iter()
        .enumerate()
        .map(|(i, a)| {
            rects
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, b)| a.gap(b))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();

    let average = nearest.iter().sum::<f64>() / nearest.len() as f64;
    let min = nearest.iter().copied().fold(f64::INFINITY, f64::min);
    let max = nearest.iter().copied().fold(0.0, f64::max);
    (average, min, max)
}

/// Grows with unit and corridor counts, capped at 100.
fn efficiency_score(units: usize, corridors: usize) -> f64 {
    (((units * 2 + corridors) * 5) as f64).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan_core::{CorridorOrientation, Point, Polygon};

    fn unit(id: &str, x: f64, y: f64, kind: CategoryKind) -> PlacedUnit {
        PlacedUnit::new(id, Point::new(x, y), 2.0, 2.0, kind)
    }

    #[test]
    fn test_statistics() {
        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let units = vec![
            unit("u1", 2.0, 2.0, CategoryKind::Small),
            unit("u2", 6.0, 2.0, CategoryKind::Small),
            unit("u3", 2.0, 8.0, CategoryKind::Large),
        ];
        let corridors = vec![CorridorSegment::new(
            "corridor_0_1",
            Point::new(2.0, 2.0),
            Point::new(6.0, 2.0),
            1.0,
            CorridorOrientation::Link,
        )];

        let stats = MetricsCalculator::new().compute_statistics(&units, &corridors, &building);

        assert_relative_eq!(stats.building_area, 100.0);
        assert_relative_eq!(stats.total_unit_area, 12.0);
        assert_relative_eq!(stats.total_corridor_area, 4.0);
        assert_relative_eq!(stats.utilization_rate, 16.0);
        assert_relative_eq!(stats.unit_utilization_rate, 12.0);
        assert_relative_eq!(stats.corridor_utilization_rate, 4.0);
        assert_eq!(stats.unit_count, 3);
        assert_eq!(stats.corridor_count, 1);

        assert_eq!(stats.category(CategoryKind::Small).unwrap().count, 2);
        assert_eq!(stats.category(CategoryKind::Medium).unwrap().count, 0);
        assert_relative_eq!(stats.category(CategoryKind::Large).unwrap().area, 4.0);

        // Nearest gaps: u1 -> u2 = 2, u2 -> u1 = 2, u3 -> u1 = 4
        assert_relative_eq!(stats.min_spacing, 2.0);
        assert_relative_eq!(stats.max_spacing, 4.0);
        assert_relative_eq!(stats.average_spacing, 8.0 / 3.0, epsilon = 1e-9);

        assert_relative_eq!(stats.total_corridor_length, 4.0);
        assert_relative_eq!(stats.average_corridor_length, 4.0);
        assert_relative_eq!(stats.efficiency_score, 35.0);
    }

    #[test]
    fn test_empty_layout() {
        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let stats = MetricsCalculator::new().compute_statistics(&[], &[], &building);

        assert_relative_eq!(stats.utilization_rate, 0.0);
        assert_relative_eq!(stats.average_spacing, 0.0);
        assert_relative_eq!(stats.efficiency_score, 0.0);
        assert_eq!(stats.categories.len(), 3);
    }

    #[test]
    fn test_efficiency_is_capped() {
        assert_relative_eq!(efficiency_score(8, 3), 95.0);
        assert_relative_eq!(efficiency_score(50, 49), 100.0);
    }

    #[test]
    fn test_degenerate_building_has_no_rate() {
        let building = BuildingGeometry::new(Polygon::from_tuples(vec![(0.0, 0.0), (1.0, 0.0)]));
        let units = vec![unit("u1", 0.0, 0.0, CategoryKind::Small)];
        let stats = MetricsCalculator::new().compute_statistics(&units, &[], &building);

        assert_relative_eq!(stats.building_area, 0.0);
        assert_relative_eq!(stats.utilization_rate, 0.0);
    }
}
