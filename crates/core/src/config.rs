//! Engine configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights of the candidate scoring function.
///
/// `score = center * max(0, center_radius - d_centroid)
///        + spread * d_nearest_unit
///        + edge * d_boundary`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreWeights {
    /// Weight of the pull toward the polygon centroid.
    pub center: f64,
    /// Distance beyond which the centroid pull vanishes.
    pub center_radius: f64,
    /// Weight of the distance to the nearest placed unit.
    pub spread: f64,
    /// Weight of the distance to the polygon boundary.
    pub edge: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            center: 1.0,
            center_radius: 10.0,
            spread: 1.0,
            edge: 1.0,
        }
    }
}

/// Tunable parameters shared by every stage of the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Buffer radius around walls removed from the placeable area, and the
    /// minimum wall clearance enforced by validation.
    pub wall_clearance: f64,

    /// Safety margin between a unit and the building boundary.
    pub boundary_margin: f64,

    /// Trial positions sampled per placeable polygon per attempt.
    pub trials_per_polygon: usize,

    /// Attempt budget as a multiple of the target unit count.
    pub attempt_factor: usize,

    /// Candidate scoring weights.
    pub weights: ScoreWeights,

    /// Narrowest corridor accepted; narrower requests are widened.
    pub corridor_width_min: f64,

    /// Widest corridor accepted; wider requests are narrowed.
    pub corridor_width_max: f64,

    /// Segments used to approximate each rounded end of a wall buffer.
    pub buffer_arc_segments: usize,

    /// Unit centers closer than this share a row or column in the grid
    /// corridor fallback.
    pub grid_alignment_tolerance: f64,

    /// Random seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wall_clearance: 0.5,
            boundary_margin: 0.0,
            trials_per_polygon: 20,
            attempt_factor: 3,
            weights: ScoreWeights::default(),
            corridor_width_min: 1.0,
            corridor_width_max: 2.0,
            buffer_arc_segments: 8,
            grid_alignment_tolerance: 0.1,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall clearance.
    pub fn with_wall_clearance(mut self, clearance: f64) -> Self {
        self.wall_clearance = clearance;
        self
    }

    /// Sets the boundary safety margin.
    pub fn with_boundary_margin(mut self, margin: f64) -> Self {
        self.boundary_margin = margin;
        self
    }

    /// Sets the number of trial positions per polygon and attempt.
    pub fn with_trials_per_polygon(mut self, trials: usize) -> Self {
        self.trials_per_polygon = trials.max(1);
        self
    }

    /// Sets the attempt budget factor.
    pub fn with_attempt_factor(mut self, factor: usize) -> Self {
        self.attempt_factor = factor.max(1);
        self
    }

    /// Sets the scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the accepted corridor width range.
    pub fn with_corridor_width_range(mut self, min: f64, max: f64) -> Self {
        self.corridor_width_min = min;
        self.corridor_width_max = max;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("wall_clearance", self.wall_clearance),
            ("boundary_margin", self.boundary_margin),
            ("grid_alignment_tolerance", self.grid_alignment_tolerance),
            ("weights.center", self.weights.center),
            ("weights.center_radius", self.weights.center_radius),
            ("weights.spread", self.weights.spread),
            ("weights.edge", self.weights.edge),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if self.trials_per_polygon == 0 || self.attempt_factor == 0 {
            return Err(Error::InvalidConfig(
                "trials_per_polygon and attempt_factor must be at least 1".into(),
            ));
        }
        if self.buffer_arc_segments < 2 {
            return Err(Error::InvalidConfig(
                "buffer_arc_segments must be at least 2".into(),
            ));
        }
        if !(self.corridor_width_min > 0.0
            && self.corridor_width_min <= self.corridor_width_max
            && self.corridor_width_max.is_finite())
        {
            return Err(Error::InvalidConfig(format!(
                "corridor width range [{}, {}] is invalid",
                self.corridor_width_min, self.corridor_width_max
            )));
        }
        Ok(())
    }
}
