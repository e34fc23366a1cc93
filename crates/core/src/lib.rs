//! # Floorplan Core
//!
//! Data model and shared primitives for the floorplan layout engine.
//!
//! This crate holds everything the engine reads and returns, with no
//! search logic of its own:
//!
//! - **Geometry**: [`Point`], [`Segment`], [`Polygon`], [`Rect`] and the
//!   normalized [`BuildingGeometry`] produced by ingestion
//! - **Robust predicates**: [`robust`] orientation and segment tests
//! - **Catalogs**: [`UnitCatalog`] (small/medium/large) and [`ProfileCatalog`]
//!   (named density presets)
//! - **Configuration**: [`EngineConfig`]
//! - **Results**: [`OptimizationResult`], [`Outcome`], [`ValidationOutcome`]
//!
//! ## Configuration
//!
//! ```rust
//! use floorplan_core::EngineConfig;
//!
//! let config = EngineConfig::new()
//!     .with_seed(42)
//!     .with_wall_clearance(0.5)
//!     .with_trials_per_polygon(20);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod error;
pub mod geometry;
pub mod profile;
pub mod result;
pub mod robust;

// Re-exports
pub use config::{EngineConfig, ScoreWeights};
pub use error::{Error, Result};
pub use geometry::{BuildingGeometry, Point, Polygon, Rect, Segment, AREA_EPSILON, TOLERANCE};
pub use profile::{CategoryKind, Density, LayoutProfile, ProfileCatalog, UnitCatalog, UnitCategory};
pub use result::{
    CategoryStats, CorridorOrientation, CorridorSegment, DegradationReason, GridFallbackCause,
    OptimizationResult, OptimizationRun, Outcome, PlacedUnit, Statistics, UnitSize,
    UnitValidation, ValidationOutcome, ViolationKind,
};
