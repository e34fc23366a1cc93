//! # Floorplan Layout
//!
//! Automatic space-layout optimization for building floorplans.
//!
//! Given a normalized building outline (walls, restricted zones, entrances)
//! the engine places rectangular units at a requested density and connects
//! them with a minimal corridor network.
//!
//! ## Features
//!
//! - Placeable area by polygon difference (restricted zones, entrances,
//!   wall clearance buffers)
//! - Seeded stochastic placement with parallel candidate scoring
//! - Minimum spanning tree corridors with a grid fallback
//! - Reentrant constraint validation for live editing
//! - Typed degradation reporting instead of silent fallbacks
//!
//! ## Quick Start
//!
//! ```rust
//! use floorplan_layout::{BuildingGeometry, EngineConfig, Optimizer, Polygon, UnitSize};
//!
//! let building = BuildingGeometry::rectangle(20.0, 15.0)
//!     .with_restricted_zone(Polygon::rectangle(15.0, 0.0, 20.0, 5.0));
//!
//! let optimizer = Optimizer::new(EngineConfig::default().with_seed(42));
//! let outcome = optimizer
//!     .optimize(&building, Some(UnitSize::new(2.0, 2.0)), 1.5, "25%")
//!     .unwrap();
//!
//! let result = outcome.result();
//! println!("Placed {} units, utilization: {:.1}%",
//!     result.units.len(),
//!     result.statistics.utilization_rate);
//! ```
//!
//! ## Live validation
//!
//! ```rust
//! use floorplan_layout::{BuildingGeometry, CategoryKind, EngineConfig, Optimizer, PlacedUnit, Point};
//!
//! let building = BuildingGeometry::rectangle(10.0, 10.0);
//! let optimizer = Optimizer::new(EngineConfig::default());
//!
//! let moved = PlacedUnit::new("unit_1", Point::new(9.5, 5.0), 2.0, 2.0, CategoryKind::Small);
//! let outcome = optimizer.validate_placement(&moved, &[], &building, "25%").unwrap();
//! assert!(!outcome.valid);
//! for hint in outcome.suggestions() {
//!     println!("{}", hint);
//! }
//! ```

pub mod connectivity;
pub mod metrics;
pub mod optimizer;
pub mod placement;
pub mod spatial_index;
pub mod validator;
pub mod zones;

pub use connectivity::{ConnectivityBuilder, CorridorNetwork};
pub use metrics::MetricsCalculator;
pub use optimizer::Optimizer;
pub use placement::{PlacementReport, PlacementSearch};
pub use spatial_index::{UnitEntry, UnitIndex};
pub use validator::ConstraintValidator;
pub use zones::{PlaceableArea, PlaceableRegion, ZoneCalculator};

pub use floorplan_core::{
    BuildingGeometry, CategoryKind, CategoryStats, CorridorOrientation, CorridorSegment,
    DegradationReason, Density, EngineConfig, Error, GridFallbackCause, LayoutProfile,
    OptimizationResult, OptimizationRun, Outcome, PlacedUnit, Point, Polygon, ProfileCatalog,
    Rect, Result, ScoreWeights, Segment, Statistics, UnitCatalog, UnitCategory, UnitSize,
    UnitValidation, ValidationOutcome, ViolationKind,
};
