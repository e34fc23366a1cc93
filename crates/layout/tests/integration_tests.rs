//! Integration tests for floorplan-layout.

use floorplan_layout::{
    BuildingGeometry, CategoryKind, ConnectivityBuilder, CorridorOrientation, CorridorSegment,
    DegradationReason, Density, EngineConfig, Error, GridFallbackCause, LayoutProfile, Optimizer,
    Outcome, PlacedUnit, Point, Polygon, ProfileCatalog, Segment, UnitSize, ViolationKind,
    ZoneCalculator,
};

fn optimizer(seed: u64) -> Optimizer {
    Optimizer::new(EngineConfig::default().with_seed(seed))
}

fn two_by_two() -> Option<UnitSize> {
    Some(UnitSize::new(2.0, 2.0))
}

/// True if every corridor is reachable from every other through shared
/// points, and every unit center lies on some corridor.
fn corridors_connect(units: &[PlacedUnit], corridors: &[CorridorSegment]) -> bool {
    let n = corridors.len();
    let mut parent: Vec<usize> = (0..n).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            x = parent[x];
        }
        x
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let a = Segment::new(corridors[i].start, corridors[i].end);
            let b = Segment::new(corridors[j].start, corridors[j].end);
            if a.intersects(&b) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                parent[ri] = rj;
            }
        }
    }

    let root = find(&mut parent, 0);
    let joined = (0..n).all(|i| find(&mut parent, i) == root);
    let reached = units.iter().all(|u| {
        corridors.iter().any(|c| {
            Segment::new(c.start, c.end).distance_to_point(&u.center) <= c.width / 2.0
        })
    });
    joined && reached
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_open_room() {
        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let outcome = optimizer(42)
            .optimize(&building, two_by_two(), 1.5, "25%")
            .unwrap();
        let result = outcome.result();

        // 100 m2 at 25% with 4 m2 units
        assert_eq!(outcome.run().target_count, 6);
        assert!(
            result.units.len() >= 4 && result.units.len() <= 6,
            "placed {} units",
            result.units.len()
        );
        for unit in &result.units {
            let r = unit.rect();
            assert!(r.min_x >= -1e-6 && r.max_x <= 10.0 + 1e-6);
            assert!(r.min_y >= -1e-6 && r.max_y <= 10.0 + 1e-6);
        }
    }

    #[test]
    fn test_open_room_fills_near_target() {
        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let counts: Vec<usize> = (0..20u64)
            .map(|seed| {
                optimizer(seed)
                    .optimize(&building, two_by_two(), 1.5, "25%")
                    .unwrap()
                    .result()
                    .units
                    .len()
            })
            .collect();

        assert!(counts.iter().all(|&n| (4..=6).contains(&n)), "counts {:?}", counts);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        assert!(mean >= 4.5, "mean {} over {:?}", mean, counts);
    }

    #[test]
    fn test_restricted_right_half() {
        let building = BuildingGeometry::rectangle(10.0, 10.0)
            .with_restricted_zone(Polygon::rectangle(5.0, 0.0, 10.0, 10.0));
        let outcome = optimizer(42)
            .optimize(&building, two_by_two(), 1.5, "25%")
            .unwrap();
        let result = outcome.result();

        assert!(!result.units.is_empty());
        for unit in &result.units {
            assert!(unit.rect().max_x <= 5.0 + 1e-6, "unit {:?} crosses into the zone", unit);
        }
    }

    #[test]
    fn test_wall_between_two_units() {
        let builder = ConnectivityBuilder::new(&EngineConfig::default());
        let units = vec![
            PlacedUnit::new("unit_1", Point::new(3.0, 5.0), 2.0, 2.0, CategoryKind::Small),
            PlacedUnit::new("unit_2", Point::new(13.0, 5.0), 2.0, 2.0, CategoryKind::Small),
        ];

        let open = BuildingGeometry::rectangle(16.0, 10.0);
        let network = builder.build_corridors(&units, &open, 1.5);
        assert_eq!(network.corridors.len(), 1);
        assert_eq!(network.corridors[0].orientation, CorridorOrientation::Link);

        let walled = open.with_wall(Segment::from_coords(8.0, 0.0, 8.0, 10.0));
        let network = builder.build_corridors(&units, &walled, 1.5);
        assert_eq!(network.fallback, Some(GridFallbackCause::NoAdmissibleEdges));
        assert!(network
            .corridors
            .iter()
            .all(|c| c.orientation != CorridorOrientation::Link));
        assert!(corridors_connect(&units, &network.corridors));
    }

    #[test]
    fn test_near_zero_coverage() {
        let sliver = LayoutProfile::new(
            "0%",
            1e-6,
            Density::Sparse,
            vec![(CategoryKind::Small, 1.0)],
            1.0,
        )
        .unwrap();
        let opt = optimizer(42).with_profiles(ProfileCatalog::standard().with_profile(sliver));

        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let outcome = opt.optimize(&building, None, 1.5, "0%").unwrap();

        assert!(matches!(outcome, Outcome::Optimal(_)));
        let result = outcome.result();
        assert!(result.units.is_empty());
        assert!(result.corridors.is_empty());
        assert_eq!(result.statistics.utilization_rate, 0.0);
        assert_eq!(outcome.run().convergence_ratio, 0.0);
    }
}

mod property_tests {
    use super::*;

    fn office() -> BuildingGeometry {
        BuildingGeometry::rectangle(30.0, 20.0)
            .with_wall(Segment::from_coords(15.0, 0.0, 15.0, 12.0))
            .with_restricted_zone(Polygon::rectangle(0.0, 16.0, 6.0, 20.0))
            .with_entrance_zone(Polygon::rectangle(26.0, 0.0, 30.0, 3.0))
    }

    #[test]
    fn test_determinism() {
        let building = office();
        let a = optimizer(42).optimize(&building, None, 1.5, "30%").unwrap();
        let b = optimizer(42).optimize(&building, None, 1.5, "30%").unwrap();

        assert_eq!(a.result().units, b.result().units);
        assert_eq!(a.result().corridors, b.result().corridors);
    }

    #[test]
    fn test_containment_and_spacing() {
        let building = office();
        let catalog = ProfileCatalog::standard();
        let area = ZoneCalculator::new(&EngineConfig::default()).compute_placeable_area(&building);

        for seed in [1, 2, 3] {
            let outcome = optimizer(seed).optimize(&building, None, 1.5, "35%").unwrap();
            let units = &outcome.result().units;
            let spacing = catalog.get("35%").unwrap().min_spacing();

            for (i, a) in units.iter().enumerate() {
                assert!(
                    area.regions().iter().any(|r| r.contains_rect(&a.rect())),
                    "unit {} escapes the placeable area",
                    a.id
                );
                for b in &units[i + 1..] {
                    assert!(!a.rect().overlaps(&b.rect()));
                    assert!(a.rect().gap(&b.rect()) >= spacing - 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_corridors_are_connected() {
        let building = office();
        for seed in [5, 6, 7, 8] {
            let outcome = optimizer(seed).optimize(&building, None, 1.2, "25%").unwrap();
            let result = outcome.result();
            if result.units.len() >= 2 {
                assert!(
                    corridors_connect(&result.units, &result.corridors),
                    "seed {} left units unreachable",
                    seed
                );
            }
        }
    }

    #[test]
    fn test_coverage_is_monotonic() {
        let building = BuildingGeometry::rectangle(30.0, 30.0);
        let mean_count = |profile: &str| {
            let seeds = 1..=5u64;
            let total: usize = seeds
                .clone()
                .map(|s| optimizer(s).optimize(&building, None, 1.5, profile).unwrap())
                .map(|o| o.result().units.len())
                .sum();
            total as f64 / seeds.count() as f64
        };

        assert!(mean_count("35%") >= mean_count("10%"));
    }

    #[test]
    fn test_engine_output_validates() {
        let building = office();
        let opt = optimizer(11);
        let outcome = opt.optimize(&building, None, 1.5, "25%").unwrap();

        let report = opt
            .validate_layout(&outcome.result().units, &building, "25%")
            .unwrap();
        assert_eq!(report.len(), outcome.result().units.len());
        for entry in report {
            assert!(entry.outcome.valid, "{} has {:?}", entry.unit_id, entry.outcome.violations);
        }
    }

    #[test]
    fn test_statistics_match_layout() {
        let building = office();
        let outcome = optimizer(9).optimize(&building, None, 1.5, "25%").unwrap();
        let result = outcome.result();
        let stats = &result.statistics;

        let unit_area: f64 = result.units.iter().map(|u| u.area()).sum();
        let corridor_area: f64 = result.corridors.iter().map(|c| c.area).sum();
        assert!((stats.total_unit_area - unit_area).abs() < 1e-9);
        assert!((stats.total_corridor_area - corridor_area).abs() < 1e-9);
        assert!((stats.building_area - 600.0).abs() < 1e-9);
        assert_eq!(stats.unit_count, result.units.len());
        assert!(stats.efficiency_score <= 100.0);

        let by_category: usize = stats.categories.iter().map(|c| c.count).sum();
        assert_eq!(by_category, result.units.len());
    }
}

mod validator_tests {
    use super::*;

    #[test]
    fn test_live_edit_collects_violations() {
        let building = BuildingGeometry::rectangle(10.0, 10.0)
            .with_wall(Segment::from_coords(0.0, 5.0, 4.0, 5.0))
            .with_restricted_zone(Polygon::rectangle(7.0, 7.0, 10.0, 10.0));
        let current = vec![PlacedUnit::new(
            "unit_1",
            Point::new(8.0, 3.0),
            2.0,
            2.0,
            CategoryKind::Small,
        )];

        // Overlaps unit_1 and pokes out of the boundary
        let candidate =
            PlacedUnit::new("unit_2", Point::new(9.5, 3.0), 2.0, 2.0, CategoryKind::Small);
        let outcome = optimizer(1)
            .validate_placement(&candidate, &current, &building, "25%")
            .unwrap();

        assert!(!outcome.valid);
        assert!(outcome.violations.contains(&ViolationKind::OutsideBoundary));
        assert!(outcome
            .violations
            .iter()
            .any(|v| matches!(v, ViolationKind::Overlap { other } if other == "unit_1")));
        assert_eq!(outcome.suggestions().len(), 2);

        // Too close to the wall
        let candidate =
            PlacedUnit::new("unit_3", Point::new(2.0, 6.2), 2.0, 2.0, CategoryKind::Small);
        let outcome = optimizer(1)
            .validate_placement(&candidate, &current, &building, "25%")
            .unwrap();
        assert!(matches!(
            outcome.violations.as_slice(),
            [ViolationKind::WallClearance { wall: 0, .. }]
        ));
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let building = BuildingGeometry::rectangle(10.0, 10.0);
        let unit = PlacedUnit::new("u", Point::new(5.0, 5.0), 2.0, 2.0, CategoryKind::Small);
        let err = optimizer(1)
            .validate_placement(&unit, &[], &building, "50%")
            .unwrap_err();
        assert_eq!(err, Error::ProfileNotFound("50%".into()));
    }

    #[test]
    fn test_degraded_outcome_reports_reason() {
        let building = BuildingGeometry::new(Polygon::from_tuples(vec![(0.0, 0.0), (0.0, 0.0)]))
            .with_wall(Segment::from_coords(0.0, 0.0, 12.0, 0.0))
            .with_wall(Segment::from_coords(12.0, 0.0, 12.0, 12.0));
        let outcome = optimizer(3).optimize(&building, two_by_two(), 1.0, "25%").unwrap();

        assert!(outcome.is_degraded());
        assert_eq!(outcome.reasons()[0], DegradationReason::BoundaryFallback);
    }
}
