//! Stochastic placement search.
//!
//! Units are placed one at a time. Each attempt draws a size category from
//! the profile mix, samples trial centers in every placeable region that can
//! hold the unit, and keeps the best-scoring trial that passes containment,
//! spacing and constraint validation.
//!
//! Trials of one attempt are scored in parallel with rayon; acceptance is
//! sequential, since every accepted unit changes the feasible set for the
//! next attempt. All random draws happen on the calling thread, so a given
//! seed reproduces the same layout regardless of thread count.
//!
//! ## Scoring
//!
//! ```text
//! score = w_center * max(0, k - d(center, region centroid))
//!       + w_spread * d(center, nearest placed center)
//!       + w_edge   * d(center, region outline)
//! ```

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use floorplan_core::{
    EngineConfig, LayoutProfile, PlacedUnit, Point, ScoreWeights, UnitCatalog, TOLERANCE,
};

use crate::spatial_index::UnitIndex;
use crate::validator::ConstraintValidator;
use crate::zones::PlaceableRegion;

/// Output of a placement run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    /// Units in acceptance order, ids `unit_1`, `unit_2`, ...
    pub units: Vec<PlacedUnit>,
    pub target_count: usize,
    /// Attempts consumed.
    pub attempts: usize,
    /// `placed / target`, or 0 when the target is 0.
    pub convergence_ratio: f64,
}

/// A trial center in a given region.
type Trial = (usize, Point);

/// Places units into the placeable area.
#[derive(Debug, Clone)]
pub struct PlacementSearch {
    trials_per_polygon: usize,
    attempt_factor: usize,
    weights: ScoreWeights,
}

impl PlacementSearch {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            trials_per_polygon: config.trials_per_polygon.max(1),
            attempt_factor: config.attempt_factor.max(1),
            weights: config.weights,
        }
    }

    /// Number of units needed to cover `profile.coverage()` of the area with
    /// units of the profile's expected size.
    pub fn target_count(total_area: f64, profile: &LayoutProfile, catalog: &UnitCatalog) -> usize {
        let unit_area = profile.weighted_unit_area(catalog);
        if !(unit_area > 0.0 && total_area > 0.0) {
            return 0;
        }
        (total_area * profile.coverage() / unit_area).floor() as usize
    }

    /// Runs the search with a fixed seed.
    pub fn place_units(
        &self,
        regions: &[PlaceableRegion],
        profile: &LayoutProfile,
        catalog: &UnitCatalog,
        validator: &ConstraintValidator<'_>,
        seed: u64,
    ) -> PlacementReport {
        let total_area: f64 = regions.iter().map(PlaceableRegion::area).sum();
        let target_count = Self::target_count(total_area, profile, catalog);

        if regions.is_empty() || target_count == 0 {
            log::debug!("Nothing to place (area {:.2} m2, target {})", total_area, target_count);
            return PlacementReport {
                target_count,
                ..Default::default()
            };
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let max_attempts = self.attempt_factor.saturating_mul(target_count);
        let min_spacing = profile.min_spacing();

        let mut units: Vec<PlacedUnit> = Vec::with_capacity(target_count);
        let mut index = UnitIndex::new();
        let mut attempts = 0;

        while units.len() < target_count && attempts < max_attempts {
            attempts += 1;

            let kind = profile.category_for(rng.gen::<f64>());
            let category = catalog.get(kind);
            let (width, height) = (category.width, category.height);

            let trials = self.sample_trials(regions, width, height, &mut rng);
            if trials.is_empty() {
                continue;
            }

            let id = format!("unit_{}", units.len() + 1);
            let best = trials
                .par_iter()
                .enumerate()
                .filter_map(|(i, &(region, center))| {
                    let candidate = PlacedUnit::new(id.clone(), center, width, height, kind);
                    self.evaluate(&candidate, &regions[region], &units, &index, validator, min_spacing)
                        .map(|score| (i, score))
                })
                .reduce_with(better);

            if let Some((i, _)) = best {
                let unit = PlacedUnit::new(id, trials[i].1, width, height, kind);
                index.insert(units.len(), &unit.rect());
                units.push(unit);
            }
        }

        let convergence_ratio = units.len() as f64 / target_count as f64;
        log::debug!(
            "Placed {}/{} units in {} attempts",
            units.len(),
            target_count,
            attempts
        );

        PlacementReport {
            units,
            target_count,
            attempts,
            convergence_ratio,
        }
    }

    /// Samples trial centers in every region whose bounding box can hold a
    /// `width x height` unit.
    fn sample_trials(
        &self,
        regions: &[PlaceableRegion],
        width: f64,
        height: f64,
        rng: &mut StdRng,
    ) -> Vec<Trial> {
        let mut trials = Vec::new();

        for (r, region) in regions.iter().enumerate() {
            let b = region.bounds();
            let (lo_x, hi_x) = (b.min_x + width / 2.0, b.max_x - width / 2.0);
            let (lo_y, hi_y) = (b.min_y + height / 2.0, b.max_y - height / 2.0);
            if lo_x > hi_x || lo_y > hi_y {
                continue;
            }
            for _ in 0..self.trials_per_polygon {
                let x = rng.gen_range(lo_x..=hi_x);
                let y = rng.gen_range(lo_y..=hi_y);
                trials.push((r, Point::new(x, y)));
            }
        }

        trials
    }

    /// Score of an admissible candidate, or `None` if it breaks a constraint.
    fn evaluate(
        &self,
        candidate: &PlacedUnit,
        region: &PlaceableRegion,
        units: &[PlacedUnit],
        index: &UnitIndex,
        validator: &ConstraintValidator<'_>,
        min_spacing: f64,
    ) -> Option<f64> {
        let rect = candidate.rect();
        if !region.contains_rect(&rect) {
            return None;
        }

        let crowded = index
            .query_with_margin(&rect, min_spacing)
            .into_iter()
            .any(|i| units[i].rect().gap(&rect) < min_spacing - TOLERANCE);
        if crowded {
            return None;
        }

        if !validator.validate(candidate, units).valid {
            return None;
        }

        Some(self.score(candidate.center, region, units))
    }

    fn score(&self, center: Point, region: &PlaceableRegion, units: &[PlacedUnit]) -> f64 {
        let w = &self.weights;

        let centrality = (w.center_radius - center.distance(&region.centroid())).max(0.0);
        let spread = units
            .iter()
            .map(|u| u.center.distance(&center))
            .fold(f64::INFINITY, f64::min);
        let spread = if spread.is_finite() { spread } else { 0.0 };
        let edge = region.distance_to_boundary(&center);

        w.center * centrality + w.spread * spread + w.edge * edge
    }
}

/// Higher score wins; equal scores go to the earlier trial.
fn better(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
        b
    } else {
        a
    }
}
