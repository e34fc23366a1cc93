//! The optimizer facade.
//!
//! [`Optimizer`] runs the full pipeline for one building:
//!
//! 1. [`ZoneCalculator`] derives the placeable area
//! 2. [`PlacementSearch`] places units at the profile's density
//! 3. [`ConnectivityBuilder`] links them with corridors
//! 4. [`MetricsCalculator`] aggregates the statistics
//!
//! It holds only immutable configuration and catalogs, so one optimizer can
//! serve any number of concurrent calls.

use std::time::Instant;

use floorplan_core::{
    BuildingGeometry, DegradationReason, EngineConfig, Error, LayoutProfile, OptimizationResult,
    OptimizationRun, Outcome, PlacedUnit, ProfileCatalog, Result, UnitCatalog, UnitSize,
    UnitValidation, ValidationOutcome,
};

use crate::connectivity::ConnectivityBuilder;
use crate::metrics::MetricsCalculator;
use crate::placement::PlacementSearch;
use crate::validator::ConstraintValidator;
use crate::zones::ZoneCalculator;

/// Entry point of the layout engine.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: EngineConfig,
    profiles: ProfileCatalog,
}

impl Optimizer {
    /// Creates an optimizer over the standard profile catalog.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            profiles: ProfileCatalog::standard(),
        }
    }

    /// Replaces the profile catalog.
    pub fn with_profiles(mut self, profiles: ProfileCatalog) -> Self {
        self.profiles = profiles;
        self
    }

    /// Profile ids in catalog order.
    pub fn list_profiles(&self) -> Vec<String> {
        self.profiles.ids()
    }

    /// Full profile definitions in catalog order.
    pub fn profile_details(&self) -> &[LayoutProfile] {
        self.profiles.profiles()
    }

    /// Places units and corridors in `geometry` at the density of
    /// `profile_id`.
    ///
    /// `unit_size` overrides every category's dimensions; `None` uses the
    /// standard catalog. `corridor_width` is clamped into the configured
    /// range.
    ///
    /// # Errors
    ///
    /// - [`Error::ProfileNotFound`] for an unknown profile id
    /// - [`Error::InvalidConfig`] for a non-positive unit size or corridor
    ///   width, or an unusable engine configuration
    ///
    /// Geometry faults are not errors: they are recovered and reported as
    /// [`Outcome::Degraded`].
    pub fn optimize(
        &self,
        geometry: &BuildingGeometry,
        unit_size: Option<UnitSize>,
        corridor_width: f64,
        profile_id: &str,
    ) -> Result<Outcome> {
        let profile = self.profiles.get(profile_id)?;
        self.optimize_with_profile(geometry, unit_size, corridor_width, profile)
    }

    /// Like [`optimize`](Self::optimize), with a profile that need not be in
    /// the catalog.
    pub fn optimize_with_profile(
        &self,
        geometry: &BuildingGeometry,
        unit_size: Option<UnitSize>,
        corridor_width: f64,
        profile: &LayoutProfile,
    ) -> Result<Outcome> {
        let start = Instant::now();
        self.config.validate()?;

        let catalog = match unit_size {
            Some(size) if !size.is_valid() => {
                return Err(Error::InvalidConfig(format!(
                    "unit size must be positive, got {}x{}",
                    size.width, size.height
                )))
            }
            Some(size) => UnitCatalog::uniform(size.width, size.height),
            None => UnitCatalog::standard(),
        };
        let corridor_width = self.clamp_corridor_width(corridor_width)?;
        let seed = self.config.seed.unwrap_or_else(rand::random);

        let mut reasons = Vec::new();

        let area = ZoneCalculator::new(&self.config).compute_placeable_area(geometry);
        if area.used_fallback() {
            reasons.push(DegradationReason::BoundaryFallback);
        }

        let validator = ConstraintValidator::new(geometry, profile, &self.config);
        let placement = PlacementSearch::new(&self.config).place_units(
            area.regions(),
            profile,
            &catalog,
            &validator,
            seed,
        );

        let network = ConnectivityBuilder::new(&self.config).build_corridors(
            &placement.units,
            geometry,
            corridor_width,
        );
        if let Some(cause) = network.fallback {
            reasons.push(DegradationReason::GridCorridors(cause));
        }

        let statistics =
            MetricsCalculator::new().compute_statistics(&placement.units, &network.corridors, geometry);

        let run = OptimizationRun {
            result: OptimizationResult {
                units: placement.units,
                corridors: network.corridors,
                statistics,
            },
            iterations: placement.attempts,
            target_count: placement.target_count,
            convergence_ratio: placement.convergence_ratio,
            seed,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        log::info!(
            "Profile {}: {}/{} units, {} corridors, {:.1}% utilization in {} ms (seed {})",
            profile.id(),
            run.result.units.len(),
            run.target_count,
            run.result.corridors.len(),
            run.result.statistics.utilization_rate,
            run.elapsed_ms,
            seed
        );

        Ok(Outcome::from_parts(run, reasons))
    }

    /// Checks a candidate unit against the building and the current layout.
    pub fn validate_placement(
        &self,
        candidate: &PlacedUnit,
        current: &[PlacedUnit],
        geometry: &BuildingGeometry,
        profile_id: &str,
    ) -> Result<ValidationOutcome> {
        let profile = self.profiles.get(profile_id)?;
        let validator = ConstraintValidator::new(geometry, profile, &self.config);
        Ok(validator.validate(candidate, current))
    }

    /// Validates every unit of a layout against the others, in input order.
    pub fn validate_layout(
        &self,
        units: &[PlacedUnit],
        geometry: &BuildingGeometry,
        profile_id: &str,
    ) -> Result<Vec<UnitValidation>> {
        let profile = self.profiles.get(profile_id)?;
        let validator = ConstraintValidator::new(geometry, profile, &self.config);
        Ok(units
            .iter()
            .map(|unit| UnitValidation {
                unit_id: unit.id.clone(),
                outcome: validator.validate(unit, units),
            })
            .collect())
    }

    fn clamp_corridor_width(&self, width: f64) -> Result<f64> {
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "corridor width must be positive, got {}",
                width
            )));
        }
        let (min, max) = (self.config.corridor_width_min, self.config.corridor_width_max);
        let clamped = width.clamp(min, max);
        if clamped != width {
            log::warn!(
                "Corridor width {} outside [{}, {}], using {}",
                width,
                min,
                max,
                clamped
            );
        }
        Ok(clamped)
    }
}
