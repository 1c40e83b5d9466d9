//! Plane geometry primitives: angles, point-to-segment distance and
//! segment intersection.

use glam::DVec2;

use patrol_core::types::Coords;

/// Angle at `p2` from the ray `p2 -> p3` to the ray `p2 -> p1`, in degrees within `[0, 360)`.
///
/// Measured as the signed difference of the two rays' arctangents, so the
/// result grows counter-clockwise.
pub fn angle_between_three_points(p1: Coords, p2: Coords, p3: Coords) -> f64 {
    let a = p1.as_dvec2() - p2.as_dvec2();
    let b = p3.as_dvec2() - p2.as_dvec2();

    let ang_a = a.y.atan2(a.x);
    let ang_b = b.y.atan2(b.x);

    (ang_a - ang_b)
        .rem_euclid(std::f64::consts::TAU)
        .to_degrees()
        .rem_euclid(360.0)
}

/// Heading in degrees from `from` towards `to`, relative to the horizontal
/// axis through `from` (0 = East, counter-clockwise).
///
/// The reference vector has a fixed x-offset of one meter, so it never
/// degenerates. A target equal to `from` yields 0.
pub fn heading_deg(from: Coords, to: Coords) -> f64 {
    let horizontal = Coords::new(from.x + 1.0, from.y);
    angle_between_three_points(to, from, horizontal)
}

/// Shortest distance from `point` to the segment `s1 - s2`.
///
/// The projection of `point` onto the segment's line is clamped to the
/// segment (`u` in `[0, 1]`). A zero-length segment behaves as a point.
pub fn distance_point_segment(s1: Coords, s2: Coords, point: Coords) -> f64 {
    let a = s1.as_dvec2();
    let p = point.as_dvec2();
    let seg = s2.as_dvec2() - a;

    let norm = seg.length_squared();
    if norm == 0.0 {
        return a.distance(p);
    }

    let u = ((p - a).dot(seg) / norm).clamp(0.0, 1.0);
    (a + seg * u).distance(p)
}

/// Intersection test used by grid traversal.
///
/// Segments sharing an endpoint intersect. Otherwise the 2x2 system
/// `start1 + s*(end1 - start1) = start2 + u*(end2 - start2)` is solved and
/// only `u` is checked against `[0, 1]`: the crossing must lie on
/// `start2 - end2`, while the extent of the first segment is not checked.
/// Parallel segments (zero determinant) never intersect, even when collinear.
pub fn segments_intersect(start1: Coords, end1: Coords, start2: Coords, end2: Coords) -> bool {
    if end1 == start2 || end2 == start1 || start2 == start1 || end2 == end1 {
        return true;
    }

    let a = end1.as_dvec2() - start1.as_dvec2();
    let b = start2.as_dvec2() - end2.as_dvec2();
    let d = start2.as_dvec2() - start1.as_dvec2();

    let det = a.x * b.y - a.y * b.x;
    if det == 0.0 {
        return false;
    }

    let t = (a.x * d.y - a.y * d.x) / det;
    (0.0..=1.0).contains(&t)
}

/// Exact test: true iff the closed segments `a1 - a2` and `b1 - b2` share at
/// least one point, collinear overlaps and touching endpoints included.
pub fn segments_cross(a1: Coords, a2: Coords, b1: Coords, b2: Coords) -> bool {
    let (p1, p2, q1, q2) = (a1.as_dvec2(), a2.as_dvec2(), b1.as_dvec2(), b2.as_dvec2());

    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }

    (d1 == 0.0 && within_box(q1, q2, p1))
        || (d2 == 0.0 && within_box(q1, q2, p2))
        || (d3 == 0.0 && within_box(p1, p2, q1))
        || (d4 == 0.0 && within_box(p1, p2, q2))
}

/// Sign of the turn `a -> b -> c` (positive = counter-clockwise).
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Whether `p` lies in the bounding box of `a - b`. Only meaningful for collinear points.
fn within_box(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
