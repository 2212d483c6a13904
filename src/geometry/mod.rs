/*!
Planar geometry primitives shared by the collision routines, the spatial
index and the sensors.
*/

extern crate nalgebra as na;
use std::f32::consts::PI;

use na::Vector2;

mod pose;
mod polygon;
mod rect;

pub use pose::Pose;
pub use polygon::{PointLocation, Polygon, RayHit};
pub use rect::Rect;

/// Tolerance of the geometric predicates of this crate. All scalars are
/// `f32`; every near-zero comparison (hull colinearity, separating-axis
/// touch, distance convergence, parallel segments, boundary tests) goes
/// through this single constant.
pub const GEOM_EPS: f32 = 1e-5;

/// Wraps an angle to `(-PI, PI]`.
pub fn mod2pi(f: f32) -> f32 {
    let mut f = f;
    while f > PI {
        f -= 2. * PI;
    }
    while f <= -PI {
        f += 2. * PI;
    }
    f
}

/// Computes the projection of a point on a segment.
///
/// If the projected point is out of the segment, the closest segment point
/// is selected.
///
/// ## Arguments
/// * `point` -- Point to project.
/// * `p1` -- Point 1 of the segment.
/// * `p2` -- Point 2 of the segment.
///
/// ## Return
/// Projected point.
pub fn project_point(point: Vector2<f32>, p1: Vector2<f32>, p2: Vector2<f32>) -> Vector2<f32> {
    let x_1 = p1.x;
    let y_1 = p1.y;

    let x_n = p2.x - x_1;
    let y_n = p2.y - y_1;
    let d_n = (x_n * x_n + y_n * y_n).sqrt();
    if d_n < GEOM_EPS {
        // degenerate segment
        return p1;
    }
    let x_n = x_n / d_n;
    let y_n = y_n / d_n;

    let projected_point_distance = (point.x - x_1) * x_n + (point.y - y_1) * y_n;
    let projected_point_distance = (0.0f32).max(d_n.min(projected_point_distance));

    Vector2::new(
        x_1 + projected_point_distance * x_n,
        y_1 + projected_point_distance * y_n,
    )
}

/// Intersection point of two segments, `None` when they do not cross.
///
/// Endpoint contact counts as a crossing. Parallel segments never cross,
/// colinear overlap included.
pub fn segments_intersection(
    a1: &Vector2<f32>,
    a2: &Vector2<f32>,
    b1: &Vector2<f32>,
    b2: &Vector2<f32>,
) -> Option<Vector2<f32>> {
    // Source: https://stackoverflow.com/a/28390934
    let ax = a2.x - a1.x;
    let ay = a2.y - a1.y;
    let bx = b2.x - b1.x;
    let by = b2.y - b1.y;
    let d = ax * by - ay * bx;

    // parallel lines
    if d.abs() < GEOM_EPS {
        return None;
    }

    let pos = d > 0.0;

    let ua = bx * (a1.y - b1.y) - by * (a1.x - b1.x);
    let ub = ax * (a1.y - b1.y) - ay * (a1.x - b1.x);

    if ((ua < 0.) == pos && ua != 0.) || ((ub < 0.) == pos && ub != 0.) {
        // no intersection
        return None;
    }

    if ((ua > d) == pos && ua != d) || ((ub > d) == pos && ub != d) {
        // no intersection
        return None;
    }

    let ua = ua / d;
    Some(Vector2::new(a1.x + ua * ax, a1.y + ua * ay))
}
