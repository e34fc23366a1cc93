//! Robust geometric predicates for wall and corridor tests.
//!
//! Line-of-sight between two units and wall clearance both hinge on
//! segment/segment predicates that become unreliable with naive floating
//! point when endpoints are nearly collinear (a corridor grazing the end of
//! a wall, for instance). Orientation is therefore computed with Shewchuk's
//! adaptive precision arithmetic from the `robust` crate, with a cheap
//! floating-point filter in front of it.
//!
//! ## Example
//!
//! ```rust
//! use floorplan_core::robust::{orient2d, segments_intersect, Orientation};
//!
//! assert_eq!(orient2d((0.0, 0.0), (1.0, 0.0), (0.5, 1.0)), Orientation::CounterClockwise);
//! assert!(segments_intersect((0.0, 0.0), (2.0, 2.0), (0.0, 2.0), (2.0, 0.0)));
//! ```

use robust::{orient2d as robust_orient2d, Coord};

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are arranged counter-clockwise (left turn).
    CounterClockwise,
    /// Points are arranged clockwise (right turn).
    Clockwise,
    /// Points are collinear (on the same line).
    Collinear,
}

impl Orientation {
    /// Returns true if the points are collinear.
    #[inline]
    pub fn is_collinear(self) -> bool {
        matches!(self, Orientation::Collinear)
    }
}

// ============================================================================
// Core Predicates
// ============================================================================

/// Determines the orientation of three 2D points with exact arithmetic.
///
/// - `CounterClockwise` if `pc` lies to the left of the directed line `pa -> pb`
/// - `Clockwise` if `pc` lies to the right
/// - `Collinear` otherwise
#[inline]
pub fn orient2d(pa: (f64, f64), pb: (f64, f64), pc: (f64, f64)) -> Orientation {
    let result = robust_orient2d(
        Coord { x: pa.0, y: pa.1 },
        Coord { x: pb.0, y: pb.1 },
        Coord { x: pc.0, y: pc.1 },
    );

    if result > 0.0 {
        Orientation::CounterClockwise
    } else if result < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Epsilon for the fast floating-point filter.
const FILTER_EPSILON: f64 = 1e-12;

/// Fast orientation test with exact fallback.
///
/// Most calls are decided by the plain cross product; only near-degenerate
/// triples pay for adaptive precision.
#[inline]
pub fn orient2d_filtered(pa: (f64, f64), pb: (f64, f64), pc: (f64, f64)) -> Orientation {
    let acx = pa.0 - pc.0;
    let bcx = pb.0 - pc.0;
    let acy = pa.1 - pc.1;
    let bcy = pb.1 - pc.1;

    let det = acx * bcy - acy * bcx;
    let det_sum = (acx * bcy).abs() + (acy * bcx).abs();

    if det.abs() > FILTER_EPSILON * det_sum {
        return if det > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        };
    }

    orient2d(pa, pb, pc)
}

// ============================================================================
// Segment Predicates
// ============================================================================

/// Returns true if `p` lies on the closed segment `a -> b`, given that the
/// three points are already known to be collinear.
#[inline]
fn within_segment_box(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// Checks whether the closed segments `p1 -> p2` and `q1 -> q2` share at
/// least one point. Touching endpoints and collinear overlap count as
/// intersections.
pub fn segments_intersect(
    p1: (f64, f64),
    p2: (f64, f64),
    q1: (f64, f64),
    q2: (f64, f64),
) -> bool {
    let o1 = orient2d_filtered(p1, p2, q1);
    let o2 = orient2d_filtered(p1, p2, q2);
    let o3 = orient2d_filtered(q1, q2, p1);
    let o4 = orient2d_filtered(q1, q2, p2);

    // Proper crossing
    if o1 != o2
        && o3 != o4
        && !o1.is_collinear()
        && !o2.is_collinear()
        && !o3.is_collinear()
        && !o4.is_collinear()
    {
        return true;
    }

    (o1.is_collinear() && within_segment_box(p1, p2, q1))
        || (o2.is_collinear() && within_segment_box(p1, p2, q2))
        || (o3.is_collinear() && within_segment_box(q1, q2, p1))
        || (o4.is_collinear() && within_segment_box(q1, q2, p2))
}

/// Euclidean distance from `p` to the closed segment `a -> b`.
pub fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len_sq = dx * dx + dy * dy;

    if len_sq <= f64::EPSILON {
        return (p.0 - a.0).hypot(p.1 - a.1);
    }

    let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = a.0 + t * dx;
    let cy = a.1 + t * dy;
    (p.0 - cx).hypot(p.1 - cy)
}

/// Euclidean distance between two closed segments (zero if they intersect).
pub fn segment_segment_distance(
    p1: (f64, f64),
    p2: (f64, f64),
    q1: (f64, f64),
    q2: (f64, f64),
) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }

    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}

// ============================================================================
// Polygon Predicates
// ============================================================================

/// Shoelace signed area (positive for counter-clockwise rings).
pub fn signed_area(polygon: &[(f64, f64)]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = polygon[i];
        let (x2, y2) = polygon[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orient2d_basic() {
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 0.0), (0.5, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 0.0), (0.5, -1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 0.0), (2.0, 0.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_orient2d_filtered_matches_exact() {
        let near = (0.5, 1e-17);
        assert_eq!(
            orient2d_filtered((0.0, 0.0), (1.0, 0.0), near),
            orient2d((0.0, 0.0), (1.0, 0.0), near)
        );
    }

    #[test]
    fn test_segments_crossing() {
        assert!(segments_intersect(
            (0.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (2.0, 0.0)
        ));
    }

    #[test]
    fn test_segments_disjoint() {
        assert!(!segments_intersect(
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0)
        ));
        // Collinear but apart
        assert!(!segments_intersect(
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0)
        ));
    }

    #[test]
    fn test_segments_touching_endpoint() {
        assert!(segments_intersect(
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (1.0, 5.0)
        ));
        // T-junction
        assert!(segments_intersect(
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 0.0),
            (1.0, 3.0)
        ));
    }

    #[test]
    fn test_point_segment_distance() {
        assert_relative_eq!(point_segment_distance((0.5, 1.0), (0.0, 0.0), (1.0, 0.0)), 1.0);
        // Beyond the endpoint: distance to the endpoint
        assert_relative_eq!(point_segment_distance((4.0, 4.0), (0.0, 0.0), (1.0, 0.0)), 5.0);
        // Degenerate segment
        assert_relative_eq!(point_segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
    }

    #[test]
    fn test_segment_segment_distance() {
        let d = segment_segment_distance((0.0, 0.0), (1.0, 0.0), (0.0, 2.0), (1.0, 2.0));
        assert_relative_eq!(d, 2.0);
        let d = segment_segment_distance((0.0, 0.0), (2.0, 2.0), (0.0, 2.0), (2.0, 0.0));
        assert_relative_eq!(d, 0.0);
    }

    #[test]
    fn test_signed_area_winding() {
        let ccw = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)];
        let cw: Vec<(f64, f64)> = ccw.iter().rev().copied().collect();

        assert_relative_eq!(signed_area(&ccw), 12.0);
        assert_relative_eq!(signed_area(&cw), -12.0);
    }
}
