/*!
Convex polygon representation and the pairwise collision primitives built
on it: point location, separating-axis overlap, closest distance and a
conservative-advancement ray cast.
*/

use nalgebra::Vector2;

use super::{GEOM_EPS, Pose, Rect, project_point, segments_intersection};
use crate::errors::{SimError, SimErrorTypes, SimResult};

/// Iteration cap of the distance walk.
const GJK_MAX_ITERATIONS: usize = 32;
/// Iteration cap of the conservative advancement loop.
const RAYCAST_MAX_ITERATIONS: usize = 64;

/// Result of a tri-state point test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Boundary,
    Inside,
}

/// Contact found by [`Polygon::raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Travel along the cast direction at contact, in the units of the
    /// travel budget.
    pub t: f32,
    /// Contact point on the moving polygon, world coordinates.
    pub point: Vector2<f32>,
    /// Direction from the moving polygon towards the hit polygon at the
    /// last separated iterate, unit length.
    pub normal: Vector2<f32>,
}

/// Convex polygon with precomputed edge vectors, signed area, centroid and
/// outer radius.
///
/// Holds at least one point. Vertices of hulled polygons are in
/// counter-clockwise order. Immutable apart from
/// [`rotate_in_place`](Polygon::rotate_in_place).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vector2<f32>>,
    edges: Vec<Vector2<f32>>,
    area: f32,
    centroid: Vector2<f32>,
    rmax: f32,
}

impl Polygon {
    /// Builds the convex hull of `points` (monotone chain, CCW output).
    ///
    /// Duplicated and colinear input points are dropped by the hull.
    pub fn new(points: Vec<Vector2<f32>>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::new(
                SimErrorTypes::GeometryError,
                "Polygon needs at least one point".to_string(),
            ));
        }
        Ok(Self::build(convex_hull(points)))
    }

    /// Stores `points` as given, without hulling them.
    pub fn without_hull(points: Vec<Vector2<f32>>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::new(
                SimErrorTypes::GeometryError,
                "Polygon needs at least one point".to_string(),
            ));
        }
        Ok(Self::build(points))
    }

    fn build(points: Vec<Vector2<f32>>) -> Self {
        let n = points.len();
        let mut edges = Vec::with_capacity(n);
        if n > 1 {
            for i in 0..n {
                edges.push(points[i] - points[(i + 1) % n]);
            }
        }

        // Shoelace, positive for counter-clockwise order
        let mut area = 0.;
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            area += p.x * q.y - q.x * p.y;
        }
        let area = area / 2.;

        let centroid = match n {
            1 => points[0],
            2 => (points[0] + points[1]) / 2.,
            _ if area.abs() < GEOM_EPS => {
                // colinear ring, fall back to the vertex mean
                points.iter().sum::<Vector2<f32>>() / n as f32
            }
            _ => {
                let mut cx = 0.;
                let mut cy = 0.;
                for i in 0..n {
                    let p = points[i];
                    let q = points[(i + 1) % n];
                    let w = p.x * q.y - q.x * p.y;
                    cx += (p.x + q.x) * w;
                    cy += (p.y + q.y) * w;
                }
                Vector2::new(cx, cy) / (6. * area)
            }
        };

        let rmax = points
            .iter()
            .map(|p| (p - centroid).norm())
            .fold(0., f32::max);

        Self {
            points,
            edges,
            area,
            centroid,
            rmax,
        }
    }

    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    /// Signed area, positive for counter-clockwise vertex order.
    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn centroid(&self) -> Vector2<f32> {
        self.centroid
    }

    /// Largest centroid-to-vertex distance.
    pub fn rmax(&self) -> f32 {
        self.rmax
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_points(&self.points).unwrap_or_default()
    }

    /// Rotates the polygon about its centroid.
    pub fn rotate_in_place(&mut self, angle: f32) {
        let rotated = self.rotated_about(angle, self.centroid);
        *self = rotated;
    }

    fn rotated_about(&self, angle: f32, center: Vector2<f32>) -> Self {
        let (sin, cos) = angle.sin_cos();
        let points = self
            .points
            .iter()
            .map(|p| {
                let d = p - center;
                Vector2::new(
                    center.x + d.x * cos - d.y * sin,
                    center.y + d.x * sin + d.y * cos,
                )
            })
            .collect();
        Self::build(points)
    }

    /// Polygon with every vertex carried through `pose` (local to world).
    pub fn transformed(&self, pose: &Pose) -> Self {
        let points = self
            .points
            .iter()
            .map(|p| pose.transform_point(*p))
            .collect();
        Self::build(points)
    }

    /// Tri-state point test: on a vertex or an edge, strictly inside, or
    /// outside. Crossing-number ray cast with the boundary checked first.
    pub fn locate_point(&self, point: Vector2<f32>) -> PointLocation {
        if self.points.len() == 1 {
            // degenerate point, boundary is the only non-outside answer
            return if (self.points[0] - point).norm() < GEOM_EPS {
                PointLocation::Boundary
            } else {
                PointLocation::Outside
            };
        }
        for (a, b) in self.edge_segments() {
            if (project_point(point, a, b) - point).norm() < GEOM_EPS {
                return PointLocation::Boundary;
            }
        }

        let n = self.points.len();
        let mut inside = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if (a.y > point.y) != (b.y > point.y) {
                let x_int = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_int {
                    inside = !inside;
                }
            }
        }
        if inside {
            PointLocation::Inside
        } else {
            PointLocation::Outside
        }
    }

    /// Separating-axis test against another convex polygon.
    ///
    /// Projects both polygons onto every edge normal of both. A separating
    /// axis yields `None`; otherwise the overlap vector of every axis is
    /// returned. A projection gap below [`GEOM_EPS`] does not separate, so
    /// touching polygons collide.
    pub fn collide_polygon(&self, other: &Polygon) -> Option<Vec<Vector2<f32>>> {
        let mut projections = Vec::with_capacity(self.edges.len() + other.edges.len());
        for edge in self.edges.iter().chain(other.edges.iter()) {
            let normal = Vector2::new(-edge.y, edge.x);
            let length = normal.norm();
            if length < GEOM_EPS {
                continue;
            }
            let axis = normal / length;
            let (min_a, max_a) = self.project_onto(&axis);
            let (min_b, max_b) = other.project_onto(&axis);
            if max_a < min_b - GEOM_EPS || max_b < min_a - GEOM_EPS {
                // separating axis
                return None;
            }
            let overlap = max_a.min(max_b) - min_a.max(min_b);
            projections.push(axis * overlap);
        }
        if projections.is_empty() {
            // both degenerate to points, collide on coincidence
            if (self.points[0] - other.points[0]).norm() > GEOM_EPS {
                return None;
            }
        }
        Some(projections)
    }

    /// Plain yes/no form of [`collide_polygon`](Polygon::collide_polygon).
    pub fn collides(&self, other: &Polygon) -> bool {
        self.collide_polygon(other).is_some()
    }

    fn project_onto(&self, axis: &Vector2<f32>) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for p in &self.points {
            let d = p.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        (min, max)
    }

    /// Closest distance to another convex polygon, 0 when they overlap.
    pub fn distance_to(&self, other: &Polygon) -> f32 {
        self.closest_points(other).0
    }

    /// Closest distance together with one witness point on each polygon.
    ///
    /// Overlap is settled by the separating-axis test first; the distance
    /// walk on the Minkowski difference only runs for separated polygons
    /// (the two-point simplex descent is not containment-safe). When the
    /// polygons overlap the witness points are the centroids.
    ///
    /// ## Return
    /// `(distance, point on self, point on other)`.
    pub fn closest_points(&self, other: &Polygon) -> (f32, Vector2<f32>, Vector2<f32>) {
        if self.collides(other) {
            return (0., self.centroid, other.centroid);
        }

        let mut direction = other.centroid - self.centroid;
        if direction.norm() < GEOM_EPS {
            direction = Vector2::new(1., 0.);
        }
        let mut a = self.support(other, &direction);
        let mut b = self.support(other, &(-a.minkowski));

        let origin = Vector2::new(0., 0.);
        for _ in 0..GJK_MAX_ITERATIONS {
            let p = project_point(origin, a.minkowski, b.minkowski);
            let p_norm = p.norm();
            if p_norm < GEOM_EPS {
                // on the boundary of the difference, touching
                return witness_pair(0., &a, &b, p);
            }
            let towards_origin = -p / p_norm;
            let c = self.support(other, &towards_origin);
            // converged when the new support gets no closer to the origin
            if c.minkowski.dot(&towards_origin) + p_norm < GEOM_EPS {
                return witness_pair(p_norm, &a, &b, p);
            }
            if a.minkowski.norm_squared() < b.minkowski.norm_squared() {
                b = c;
            } else {
                a = c;
            }
        }
        let p = project_point(origin, a.minkowski, b.minkowski);
        witness_pair(p.norm(), &a, &b, p)
    }

    fn support(&self, other: &Polygon, direction: &Vector2<f32>) -> Support {
        let on_self = self.support_point(direction);
        let on_other = other.support_point(&(-direction));
        Support {
            minkowski: on_self - on_other,
            on_self,
            on_other,
        }
    }

    fn support_point(&self, direction: &Vector2<f32>) -> Vector2<f32> {
        let mut best = self.points[0];
        let mut best_dot = best.dot(direction);
        for p in &self.points[1..] {
            let d = p.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        best
    }

    /// Every crossing point between the edges of both polygons, O(n·m)
    /// pairwise segment tests. Close duplicates (shared corners) are
    /// reported once.
    pub fn intersection_points(&self, other: &Polygon) -> Vec<Vector2<f32>> {
        let mut crossings: Vec<Vector2<f32>> = Vec::new();
        for (a1, a2) in self.edge_segments() {
            for (b1, b2) in other.edge_segments() {
                if let Some(point) = segments_intersection(&a1, &a2, &b1, &b2) {
                    if crossings.iter().all(|c| (c - point).norm() > GEOM_EPS) {
                        crossings.push(point);
                    }
                }
            }
        }
        crossings
    }

    /// Conservative-advancement cast of this polygon along `direction`,
    /// with both polygons optionally spinning at a constant rate about
    /// their centroids.
    ///
    /// Advancement is bounded by the closest distance over the largest
    /// point speed, so the cast never tunnels through `other`.
    ///
    /// ## Arguments
    /// * `other` -- Polygon to reach.
    /// * `direction` -- Travel direction of `self`, applied at unit rate.
    /// * `omega_self` -- Angular velocity of `self`, rad per travel unit.
    /// * `omega_other` -- Angular velocity of `other`, rad per travel unit.
    /// * `max_travel` -- Travel budget.
    ///
    /// ## Return
    /// The contact, or `None` when `other` is not reached within the
    /// budget.
    pub fn raycast(
        &self,
        other: &Polygon,
        direction: Vector2<f32>,
        omega_self: f32,
        omega_other: f32,
        max_travel: f32,
    ) -> Option<RayHit> {
        let speed_bound =
            direction.norm() + omega_self.abs() * self.rmax + omega_other.abs() * other.rmax;
        if speed_bound < GEOM_EPS || max_travel <= 0. {
            return None;
        }

        let mut t = 0.;
        let mut last_normal: Option<Vector2<f32>> = None;
        for _ in 0..RAYCAST_MAX_ITERATIONS {
            let moved = self
                .rotated_about(omega_self * t, self.centroid)
                .translated(direction * t);
            let spun = other.rotated_about(omega_other * t, other.centroid);
            let (dist, on_self, on_other) = moved.closest_points(&spun);
            if dist < GEOM_EPS {
                let normal = match last_normal {
                    Some(n) => n,
                    // touching from the start, aim centroid to centroid
                    None => fallback_normal(spun.centroid - moved.centroid),
                };
                // leading point of the moved polygon along the contact normal
                let point = if dist > 0. {
                    on_self
                } else {
                    moved.support_point(&normal)
                };
                return Some(RayHit { t, point, normal });
            }
            last_normal = Some((on_other - on_self) / dist);

            t += dist / speed_bound;
            if t > max_travel {
                return None;
            }
        }
        None
    }

    fn translated(&self, offset: Vector2<f32>) -> Self {
        Self::build(self.points.iter().map(|p| p + offset).collect())
    }

    fn edge_segments(&self) -> Vec<(Vector2<f32>, Vector2<f32>)> {
        match self.points.len() {
            1 => Vec::new(),
            2 => vec![(self.points[0], self.points[1])],
            n => (0..n)
                .map(|i| (self.points[i], self.points[(i + 1) % n]))
                .collect(),
        }
    }
}

struct Support {
    minkowski: Vector2<f32>,
    on_self: Vector2<f32>,
    on_other: Vector2<f32>,
}

/// Maps a closest point on the Minkowski segment `[a, b]` back to one
/// witness point on each polygon.
fn witness_pair(
    distance: f32,
    a: &Support,
    b: &Support,
    closest: Vector2<f32>,
) -> (f32, Vector2<f32>, Vector2<f32>) {
    let span = b.minkowski - a.minkowski;
    let span_sq = span.norm_squared();
    let t = if span_sq < GEOM_EPS * GEOM_EPS {
        0.
    } else {
        ((closest - a.minkowski).dot(&span) / span_sq).clamp(0., 1.)
    };
    let on_self = a.on_self * (1. - t) + b.on_self * t;
    let on_other = a.on_other * (1. - t) + b.on_other * t;
    (distance, on_self, on_other)
}

fn fallback_normal(towards: Vector2<f32>) -> Vector2<f32> {
    let norm = towards.norm();
    if norm < GEOM_EPS {
        Vector2::new(1., 0.)
    } else {
        towards / norm
    }
}

/// Monotone-chain convex hull, counter-clockwise output. Inputs of one or
/// two distinct points come back as they are.
fn convex_hull(mut points: Vec<Vector2<f32>>) -> Vec<Vector2<f32>> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup_by(|a, b| (*a - *b).norm() < GEOM_EPS);
    if points.len() <= 2 {
        return points;
    }

    let cross = |o: &Vector2<f32>, a: &Vector2<f32>, b: &Vector2<f32>| {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };

    let mut hull: Vec<Vector2<f32>> = Vec::with_capacity(points.len() + 1);
    // lower chain
    for p in &points {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= GEOM_EPS
        {
            hull.pop();
        }
        hull.push(*p);
    }
    // upper chain
    let lower_len = hull.len() + 1;
    for p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= GEOM_EPS
        {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();
    hull
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use nalgebra::Vector2;

    use super::{PointLocation, Polygon};

    fn square(left: f32, bottom: f32, side: f32) -> Polygon {
        Polygon::new(vec![
            Vector2::new(left, bottom),
            Vector2::new(left + side, bottom),
            Vector2::new(left + side, bottom + side),
            Vector2::new(left, bottom + side),
        ])
        .unwrap()
    }

    #[test]
    fn hull_drops_interior_colinear_and_duplicate_points() {
        let p = Polygon::new(vec![
            Vector2::new(0., 0.),
            Vector2::new(1., 0.),
            Vector2::new(0.5, 0.), // colinear
            Vector2::new(1., 1.),
            Vector2::new(0., 1.),
            Vector2::new(0.5, 0.5), // interior
            Vector2::new(0., 0.),   // duplicate
        ])
        .unwrap();
        assert_eq!(p.points().len(), 4);
        assert!(p.area() > 0., "hull must be counter-clockwise");
        assert!((p.area() - 1.).abs() < 1e-5);
    }

    #[test]
    fn hull_is_idempotent() {
        let first = Polygon::new(vec![
            Vector2::new(2., -1.),
            Vector2::new(-1., -1.),
            Vector2::new(0.5, 2.),
            Vector2::new(0., 0.5),
            Vector2::new(2., -1.),
        ])
        .unwrap();
        let second = Polygon::new(first.points().to_vec()).unwrap();
        assert_eq!(first.points().len(), second.points().len());
        for p in first.points() {
            assert!(
                second.points().iter().any(|q| (p - q).norm() < 1e-6),
                "point {p:?} lost by the second hull"
            );
        }
    }

    #[test]
    fn centroid_and_rmax_of_a_square() {
        let p = square(0., 0., 2.);
        assert!((p.centroid() - Vector2::new(1., 1.)).norm() < 1e-5);
        assert!((p.rmax() - 2f32.sqrt()).abs() < 1e-5);
        assert!((p.area() - 4.).abs() < 1e-5);
    }

    #[test]
    fn degenerate_centroids() {
        let point = Polygon::new(vec![Vector2::new(3., -2.)]).unwrap();
        assert_eq!(point.centroid(), Vector2::new(3., -2.));
        assert_eq!(point.rmax(), 0.);

        let segment =
            Polygon::new(vec![Vector2::new(0., 0.), Vector2::new(2., 0.)]).unwrap();
        assert!((segment.centroid() - Vector2::new(1., 0.)).norm() < 1e-5);
        assert!((segment.rmax() - 1.).abs() < 1e-5);
    }

    #[test]
    fn locate_point_tri_state() {
        let p = square(0., 0., 2.);
        let points = vec![
            Vector2::new(1., 1.),    // center
            Vector2::new(0., 0.),    // vertex
            Vector2::new(1., 0.),    // edge midpoint
            Vector2::new(3., 1.),    // outside right
            Vector2::new(1., -0.01), // just below
        ];
        let expected_results = vec![
            PointLocation::Inside,
            PointLocation::Boundary,
            PointLocation::Boundary,
            PointLocation::Outside,
            PointLocation::Outside,
        ];
        for (point, expected) in zip(points, expected_results) {
            let result = p.locate_point(point);
            assert_eq!(result, expected, "point {point:?}");
        }
    }

    #[test]
    fn separated_unit_squares_do_not_collide() {
        let a = square(0., 0., 1.);
        let b = square(10., 10., 1.);
        assert!(a.collide_polygon(&b).is_none());
        assert!(!a.collides(&b));
    }

    #[test]
    fn overlapping_unit_squares_collide() {
        let a = square(0., 0., 1.);
        let b = square(0.5, 0.5, 1.);
        let projections = a.collide_polygon(&b).unwrap();
        assert!(!projections.is_empty());
    }

    #[test]
    fn touching_squares_collide() {
        let a = square(0., 0., 1.);
        let b = square(1., 0., 1.);
        assert!(a.collides(&b));
    }

    #[test]
    fn collision_test_is_symmetric() {
        let polygons = vec![
            (square(0., 0., 1.), square(0.5, 0.5, 1.)),
            (square(0., 0., 1.), square(10., 10., 1.)),
            (square(0., 0., 1.), square(1., 0., 1.)),
            (
                square(0., 0., 2.),
                Polygon::new(vec![
                    Vector2::new(1., 1.),
                    Vector2::new(1.2, 1.),
                    Vector2::new(1., 1.4),
                ])
                .unwrap(),
            ),
        ];
        for (a, b) in &polygons {
            assert_eq!(a.collides(b), b.collides(a));
        }
    }

    #[test]
    fn distance_between_separated_squares() {
        let a = square(0., 0., 1.);
        let b = square(2., 0., 1.);
        let dist = a.distance_to(&b);
        assert!((dist - 1.).abs() < 1e-3, "Expected distance ~1.0, got {}", dist);

        let diagonal = square(2., 2., 1.);
        let dist = a.distance_to(&diagonal);
        assert!(
            (dist - 2f32.sqrt()).abs() < 1e-3,
            "Expected corner distance ~sqrt(2), got {}",
            dist
        );
    }

    #[test]
    fn distance_of_overlapping_squares_is_zero() {
        let a = square(0., 0., 1.);
        let b = square(0.5, 0.5, 1.);
        assert_eq!(a.distance_to(&b), 0.);
    }

    #[test]
    fn witness_points_realize_the_distance() {
        let a = square(0., 0., 1.);
        let b = square(3., 0.25, 1.);
        let (dist, on_a, on_b) = a.closest_points(&b);
        assert!(((on_a - on_b).norm() - dist).abs() < 1e-3);
        // witnesses sit on the facing edges
        assert!((on_a.x - 1.).abs() < 1e-3, "on_a = {on_a:?}");
        assert!((on_b.x - 3.).abs() < 1e-3, "on_b = {on_b:?}");
    }

    #[test]
    fn intersection_points_of_overlapping_squares() {
        let a = square(0., 0., 1.);
        let b = square(0.5, 0.5, 1.);
        let crossings = a.intersection_points(&b);
        assert_eq!(crossings.len(), 2, "crossings: {crossings:?}");
        for expected in [Vector2::new(1., 0.5), Vector2::new(0.5, 1.)] {
            assert!(
                crossings.iter().any(|c| (c - expected).norm() < 1e-4),
                "missing crossing {expected:?} in {crossings:?}"
            );
        }
    }

    #[test]
    fn raycast_straight_reaches_the_facing_edge() {
        let a = square(-0.5, -0.5, 1.);
        let b = square(2.5, -0.5, 1.);
        let hit = a
            .raycast(&b, Vector2::new(1., 0.), 0., 0., 10.)
            .expect("should hit");
        assert!((hit.t - 2.).abs() < 1e-2, "t = {}", hit.t);
        assert!((hit.normal - Vector2::new(1., 0.)).norm() < 1e-2);
        assert!((hit.point.x - (0.5 + hit.t)).abs() < 1e-2);
    }

    #[test]
    fn raycast_away_misses() {
        let a = square(-0.5, -0.5, 1.);
        let b = square(2.5, -0.5, 1.);
        assert!(a.raycast(&b, Vector2::new(-1., 0.), 0., 0., 10.).is_none());
    }

    #[test]
    fn rotate_in_place_keeps_centroid_and_radius() {
        let mut p = square(0., 0., 2.);
        let centroid = p.centroid();
        let rmax = p.rmax();
        p.rotate_in_place(std::f32::consts::FRAC_PI_4);
        assert!((p.centroid() - centroid).norm() < 1e-4);
        assert!((p.rmax() - rmax).abs() < 1e-4);
        // the bounding box of a tilted square widens
        let rect = p.bounding_rect();
        assert!((rect.width - 2. * 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn empty_point_list_is_rejected() {
        assert!(Polygon::new(Vec::new()).is_err());
        assert!(Polygon::without_hull(Vec::new()).is_err());
    }
}
