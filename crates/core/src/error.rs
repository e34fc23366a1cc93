//! Error types for the layout engine.

use thiserror::Error;

/// Errors surfaced to callers of the layout engine.
///
/// Geometry problems are recovered inside the engine (see
/// [`DegradationReason`](crate::result::DegradationReason)); only caller
/// mistakes reach this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The requested layout profile id is not in the catalog.
    #[error("Layout profile not found: {0}")]
    ProfileNotFound(String),

    /// A layout profile failed its invariants.
    #[error("Invalid layout profile: {0}")]
    InvalidProfile(String),

    /// An engine parameter is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Building geometry failed explicit validation.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
