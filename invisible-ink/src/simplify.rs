//! Polyline simplification.
//!
//! This is the Ramer–Douglas–Peucker algorithm, optionally preceded by a
//! cheap radial distance pass that drops points lying very close to their
//! predecessor.
//!
//! Distances are compared squared. The distance of a point from a run is
//! measured to the segment joining the run's end points, not to the infinite
//! line through them.

use kurbo::Point;

use crate::path::{Path, Polyline};

/// The tolerance used when simplifying replacement outlines, in font units.
pub const DEFAULT_TOLERANCE: f64 = 50.0;

/// Reduce the number of points in `points`.
///
/// Points are discarded when they lie within `tolerance` of the simplified
/// line. The first and last points are always kept. When `high_quality` is
/// `false` a radial distance pass runs first, which is faster but less
/// faithful.
pub fn simplify(points: &[Point], tolerance: f64, high_quality: bool) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let sq_tolerance = tolerance * tolerance;
    if high_quality {
        douglas_peucker(points, sq_tolerance)
    } else {
        douglas_peucker(&radial_distance(points, sq_tolerance), sq_tolerance)
    }
}

/// Simplify the outline of `path`, returning a polygonal path.
///
/// Commands that can't be reduced to points are reported in the returned
/// [`Polyline`]'s `skipped` list; its `points` hold the simplified result.
pub fn simplify_path(path: &Path, tolerance: f64, high_quality: bool) -> (Path, Polyline) {
    let polyline = path.to_points();
    let simplified = simplify(&polyline.points, tolerance, high_quality);
    let polyline = Polyline {
        points: simplified,
        skipped: polyline.skipped,
    };
    (Path::from_points(&polyline.points), polyline)
}

fn radial_distance(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut prev = first;
    let mut kept = vec![first];
    let mut kept_last = rest.is_empty();
    for &point in rest {
        kept_last = (point - prev).hypot2() > sq_tolerance;
        if kept_last {
            kept.push(point);
            prev = point;
        }
    }
    // the last point is kept even when it lies close to its predecessor
    if !kept_last {
        kept.extend(rest.last());
    }
    kept
}

fn douglas_peucker(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut simplified = vec![points[0]];
    douglas_peucker_step(points, 0, last, sq_tolerance, &mut simplified);
    simplified.push(points[last]);
    simplified
}

fn douglas_peucker_step(
    points: &[Point],
    first: usize,
    last: usize,
    sq_tolerance: f64,
    simplified: &mut Vec<Point>,
) {
    let mut max_sq_dist = sq_tolerance;
    let mut index = None;
    for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
        let sq_dist = sq_segment_distance(*point, points[first], points[last]);
        if sq_dist > max_sq_dist {
            index = Some(i);
            max_sq_dist = sq_dist;
        }
    }
    if let Some(index) = index {
        if index - first > 1 {
            douglas_peucker_step(points, first, index, sq_tolerance, simplified);
        }
        simplified.push(points[index]);
        if last - index > 1 {
            douglas_peucker_step(points, index, last, sq_tolerance, simplified);
        }
    }
}

/// Squared distance from `p` to the segment `a`..`b`.
fn sq_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let mut closest = a;
    let d = b - a;
    if d.x != 0.0 || d.y != 0.0 {
        let t = (p - a).dot(d) / d.hypot2();
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = a + d * t;
        }
    }
    (p - closest).hypot2()
}
