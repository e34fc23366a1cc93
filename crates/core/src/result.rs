//! Optimization and validation result representation.

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Point, Rect};
use crate::profile::CategoryKind;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Units and corridors
// ============================================================================

/// Explicit unit dimensions overriding the category catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitSize {
    pub width: f64,
    pub height: f64,
}

impl UnitSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl FromStr for UnitSize {
    type Err = Error;

    /// Parses `"<width>x<height>"`, e.g. `"2x2.5"`.
    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidConfig(format!("unit size '{}' is not WxH", s)))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidConfig(format!("unit size '{}' is not WxH", s)))
        };
        let size = Self::new(parse(w)?, parse(h)?);
        if !size.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "unit size '{}' must be positive",
                s
            )));
        }
        Ok(size)
    }
}

/// A rectangular unit placed in the building.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedUnit {
    pub id: String,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub category: CategoryKind,
}

impl PlacedUnit {
    /// Creates a unit.
    pub fn new(
        id: impl Into<String>,
        center: Point,
        width: f64,
        height: f64,
        category: CategoryKind,
    ) -> Self {
        Self {
            id: id.into(),
            center,
            width,
            height,
            category,
        }
    }

    /// Axis-aligned footprint of the unit.
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// How a corridor was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CorridorOrientation {
    /// Spanning-tree edge between two unit centers.
    Link,
    /// Grid fallback row.
    Horizontal,
    /// Grid fallback column.
    Vertical,
}

/// A fixed-width corridor centerline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorridorSegment {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub width: f64,
    /// Derived from the endpoints.
    pub length: f64,
    /// `length * width`.
    pub area: f64,
    pub orientation: CorridorOrientation,
}

impl CorridorSegment {
    /// Creates a corridor, deriving its length and area.
    pub fn new(
        id: impl Into<String>,
        start: Point,
        end: Point,
        width: f64,
        orientation: CorridorOrientation,
    ) -> Self {
        let length = start.distance(&end);
        Self {
            id: id.into(),
            start,
            end,
            width,
            length,
            area: length * width,
            orientation,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Count and area of the units of one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryStats {
    pub kind: CategoryKind,
    pub count: usize,
    pub area: f64,
}

/// Aggregate figures of a layout.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistics {
    pub building_area: f64,
    pub total_unit_area: f64,
    pub total_corridor_area: f64,

    /// `(unit area + corridor area) / building area * 100`.
    pub utilization_rate: f64,
    pub unit_utilization_rate: f64,
    pub corridor_utilization_rate: f64,

    pub unit_count: usize,
    pub corridor_count: usize,
    /// One entry per category, in catalog order.
    pub categories: Vec<CategoryStats>,

    /// Nearest-neighbour clearance between unit rectangles.
    pub average_spacing: f64,
    pub min_spacing: f64,
    pub max_spacing: f64,

    pub total_corridor_length: f64,
    pub average_corridor_length: f64,

    /// Bounded score in `[0, 100]`.
    pub efficiency_score: f64,
}

impl Statistics {
    /// Statistics of the given category, if present.
    pub fn category(&self, kind: CategoryKind) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.kind == kind)
    }
}

/// The engine's output for one building.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    pub units: Vec<PlacedUnit>,
    pub corridors: Vec<CorridorSegment>,
    pub statistics: Statistics,
}

impl OptimizationResult {
    /// Returns true if no unit was placed.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

// ============================================================================
// Run report
// ============================================================================

/// A result together with the search figures of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationRun {
    pub result: OptimizationResult,
    /// Placement attempts consumed.
    pub iterations: usize,
    pub target_count: usize,
    /// `placed / target`, or 0 when the target is 0.
    pub convergence_ratio: f64,
    /// Seed actually used, for replaying entropy-seeded runs.
    pub seed: u64,
    pub elapsed_ms: u64,
}

/// Why the grid corridor fallback was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GridFallbackCause {
    /// Every center-to-center segment crosses a wall.
    NoAdmissibleEdges,
    /// Fewer than two units to connect.
    TooFewUnits,
    /// Admissible edges exist but do not connect every unit.
    DisconnectedGraph,
}

/// A recovered fault that weakened the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DegradationReason {
    /// The placeable area fell back to the building's bounding rectangle.
    BoundaryFallback,
    /// Corridors were laid out as an axis-aligned grid.
    GridCorridors(GridFallbackCause),
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundaryFallback => write!(f, "placeable area fell back to the bounding rectangle"),
            Self::GridCorridors(GridFallbackCause::NoAdmissibleEdges) => {
                write!(f, "grid corridors: every link crosses a wall")
            }
            Self::GridCorridors(GridFallbackCause::TooFewUnits) => {
                write!(f, "grid corridors: fewer than two units")
            }
            Self::GridCorridors(GridFallbackCause::DisconnectedGraph) => {
                write!(f, "grid corridors: link graph is disconnected")
            }
        }
    }
}

/// Outcome of an optimization, telling a clean run apart from a recovered one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum Outcome {
    Optimal(OptimizationRun),
    Degraded {
        run: OptimizationRun,
        reasons: Vec<DegradationReason>,
    },
}

impl Outcome {
    /// Builds `Optimal` when there are no reasons, `Degraded` otherwise.
    pub fn from_parts(run: OptimizationRun, reasons: Vec<DegradationReason>) -> Self {
        if reasons.is_empty() {
            Self::Optimal(run)
        } else {
            Self::Degraded { run, reasons }
        }
    }

    pub fn run(&self) -> &OptimizationRun {
        match self {
            Self::Optimal(run) | Self::Degraded { run, .. } => run,
        }
    }

    pub fn into_run(self) -> OptimizationRun {
        match self {
            Self::Optimal(run) | Self::Degraded { run, .. } => run,
        }
    }

    pub fn result(&self) -> &OptimizationResult {
        &self.run().result
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Degradation reasons (empty for an optimal run).
    pub fn reasons(&self) -> &[DegradationReason] {
        match self {
            Self::Optimal(_) => &[],
            Self::Degraded { reasons, .. } => reasons,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A single constraint a unit breaks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ViolationKind {
    /// The unit leaves the boundary (minus the safety margin).
    OutsideBoundary,
    /// The unit intrudes into the restricted zone at index `zone`.
    RestrictedZone { zone: usize },
    /// The unit intrudes into the entrance zone at index `zone`.
    EntranceZone { zone: usize },
    /// The unit overlaps unit `other`.
    Overlap { other: String },
    /// The unit is closer than the profile spacing to unit `other`.
    InsufficientSpacing {
        other: String,
        distance: f64,
        required: f64,
    },
    /// The unit is closer than the clearance to the wall at index `wall`.
    WallClearance {
        wall: usize,
        distance: f64,
        required: f64,
    },
    /// Width or height is not a positive finite number.
    InvalidDimensions,
}

impl ViolationKind {
    /// A remediation hint for this violation.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::OutsideBoundary => "Move the unit inside the building boundary",
            Self::RestrictedZone { .. } => "Move the unit out of the restricted zone",
            Self::EntranceZone { .. } => "Keep the entrance area clear of units",
            Self::Overlap { .. } => "Move the unit away from the overlapping unit",
            Self::InsufficientSpacing { .. } => "Increase the spacing between neighbouring units",
            Self::WallClearance { .. } => "Move the unit away from the wall",
            Self::InvalidDimensions => "Give the unit a positive width and height",
        }
    }
}

/// Verdict of the constraint validator. `valid` is true exactly when
/// `violations` is empty.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationOutcome {
    pub valid: bool,
    pub violations: Vec<ViolationKind>,
}

impl ValidationOutcome {
    /// Builds an outcome from the collected violations.
    pub fn from_violations(violations: Vec<ViolationKind>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Remediation hints, one per distinct violation kind. A valid outcome
    /// gets general layout advice instead.
    pub fn suggestions(&self) -> Vec<&'static str> {
        if self.valid {
            return vec![
                "Placement is valid",
                "Align units along corridors for easier circulation",
            ];
        }
        let mut hints: Vec<&'static str> = Vec::new();
        for violation in &self.violations {
            let hint = violation.suggestion();
            if !hints.contains(&hint) {
                hints.push(hint);
            }
        }
        hints
    }
}

/// Validation of one unit of a layout against the rest of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitValidation {
    pub unit_id: String,
    pub outcome: ValidationOutcome,
}
