//! Geometry kernel
//!
//! Stateless predicates and the reflection law used by particle updates.
//! All comparisons are exact: near-collinear configurations are not
//! treated with a tolerance.

use crate::wall::Wall;
use glam::DVec2;

/// Turn direction of an ordered point triple.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Classify `(p, q, r)` by the sign of `(q - p) x (r - q)`.
///
/// Only an exact zero is `Collinear`.
pub fn orientation(p: DVec2, q: DVec2, r: DVec2) -> Orientation {
    let cross = (q - p).perp_dot(r - q);
    if cross > 0.0 {
        Orientation::CounterClockwise
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Four-orientation segment test.
///
/// Collinear overlap is reported as non-intersecting: when every triple is
/// `Collinear` the orientations compare equal and the test fails.
pub fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    orientation(a1, a2, b1) != orientation(a1, a2, b2)
        && orientation(b1, b2, a1) != orientation(b1, b2, a2)
}

/// Heading in degrees after reflecting the step `(dx, dy)` about the wall's
/// own direction line.
pub fn reflect_heading(dx: f64, dy: f64, wall: &Wall) -> f64 {
    let direction = wall.end() - wall.start();
    let wall_angle = direction.y.atan2(direction.x);
    let incidence = dy.atan2(dx);
    let diff = incidence - wall_angle;
    let reflected = incidence - 2.0 * diff;
    reflected.to_degrees()
}

/// Fold an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}
