use approx::AbsDiffEq;
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::{Radians, EPSILON};

use super::{Line3D, Point3D, Vector3D};

/// An infinite plane `a*x + b*y + c*z + d = 0`.
///
/// A plane with a zero normal does not exist; operations that would produce
/// one return `None`. Planes built with [`Plane3D::from_normal_point`] have a
/// unit normal; [`Plane3D::from_coefficients`] keeps the coefficients as
/// given, and distances are then scaled by the normal's length.
#[derive(Debug, Clone, Copy)]
pub struct Plane3D {
    normal: Vector3D,
    d: f64,
}

impl Plane3D {
    /// Creates a plane from raw coefficients without normalizing them.
    ///
    /// Returns `None` if `(a, b, c)` is exactly the zero vector.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Option<Self> {
        if a == 0.0 && b == 0.0 && c == 0.0 {
            return None;
        }
        Some(Self {
            normal: Vector3D::new(a, b, c),
            d,
        })
    }

    /// Creates the plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `normal` is shorter than `EPSILON`.
    pub fn from_normal_point(normal: Vector3D, point: Point3D) -> Result<Self> {
        if normal.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Plane3D::from_normal_point",
            }
            .into());
        }
        let normal = normal.unit()?;
        Ok(Self {
            normal,
            d: -normal.dot_point(&point),
        })
    }

    /// Fits a plane through a closed loop of points using Newell's method.
    ///
    /// The plane passes through `points[0]`; its normal follows the loop's
    /// winding (counter-clockwise loops seen from above face up). Returns
    /// `None` if the loop is thinner than `EPSILON`: twice its area is
    /// compared against `EPSILON` times its perimeter, so the test does not
    /// depend on the loop's size.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InsufficientPoints`] for fewer than 3 points.
    pub fn plane_from_loop(points: &[Point3D]) -> Result<Option<Self>> {
        if points.len() < 3 {
            return Err(GeometryError::InsufficientPoints {
                operation: "Plane3D::plane_from_loop",
                required: 3,
                actual: points.len(),
            }
            .into());
        }

        let n = points.len();
        let mut normal = Vector3D::zero();
        for i in 0..n {
            let curr = &points[i];
            let next = &points[(i + 1) % n];
            normal += Vector3D::new(
                (curr.y() - next.y()) * (curr.z() + next.z()),
                (curr.z() - next.z()) * (curr.x() + next.x()),
                (curr.x() - next.x()) * (curr.y() + next.y()),
            );
        }

        let perimeter: f64 = (0..n).map(|i| points[i].distance(&points[(i + 1) % n])).sum();
        let twice_area = normal.length();
        if twice_area <= EPSILON * perimeter {
            debug!(points = n, twice_area, perimeter, "degenerate loop, no plane fitted");
            return Ok(None);
        }

        let normal = normal * (1.0 / twice_area);
        Ok(Some(Self {
            normal,
            d: -normal.dot_point(&points[0]),
        }))
    }

    #[must_use]
    pub fn a(&self) -> f64 {
        self.normal.x()
    }

    #[must_use]
    pub fn b(&self) -> f64 {
        self.normal.y()
    }

    #[must_use]
    pub fn c(&self) -> f64 {
        self.normal.z()
    }

    #[must_use]
    pub fn d(&self) -> f64 {
        self.d
    }

    /// The normal `(a, b, c)`.
    #[must_use]
    pub fn normal(&self) -> Vector3D {
        self.normal
    }

    /// Signed distance from the plane: positive on the side the normal points to.
    #[must_use]
    pub fn distance(&self, point: &Point3D) -> f64 {
        self.normal.dot_point(point) + self.d
    }

    #[must_use]
    pub fn on_plane(&self, point: &Point3D) -> bool {
        self.distance(point).abs() < EPSILON
    }

    /// The point of the plane closest to the origin.
    #[must_use]
    pub fn point_on_plane(&self) -> Point3D {
        let len_sq = self.normal.dot(&self.normal);
        Point3D::from(self.normal * (-self.d / len_sq))
    }

    /// Returns `true` if the planes have equal or opposite normals.
    #[must_use]
    pub fn parallel(&self, other: &Self) -> bool {
        self.normal == other.normal || self.normal == -other.normal
    }

    /// Returns `true` if both planes describe the same geometric plane,
    /// regardless of orientation.
    #[must_use]
    pub fn coplanar(&self, other: &Self) -> bool {
        self.parallel(other) && self.normal * self.d == other.normal * other.d
    }

    /// Moves the plane by `distance` along its normal.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            normal: self.normal,
            d: self.d - distance,
        }
    }

    /// Same plane, opposite orientation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }

    /// Angle between the planes, in `[0, π/2]`.
    #[must_use]
    pub fn angle_with(&self, other: &Self) -> Radians {
        let cos = self.normal.dot(&other.normal).abs().min(1.0);
        Radians::new(cos.acos())
    }

    /// Line where two planes meet, or `None` if they are parallel.
    #[must_use]
    pub fn intersection_plane(&self, other: &Self) -> Option<Line3D> {
        let direction = self.normal.cross(&other.normal);
        let det = direction.dot(&direction);
        if det < EPSILON {
            return None;
        }
        let point = (self.normal * other.d - other.normal * self.d).cross(&direction) * (1.0 / det);
        Line3D::new(Point3D::from(point), direction).ok()
    }

    /// Point where `line` crosses the plane, or `None` if it is parallel.
    #[must_use]
    pub fn intersection_line(&self, line: &Line3D) -> Option<Point3D> {
        line.intersection_plane(self)
    }

    /// Point where the ray from `start_point` along `direction` hits the plane.
    ///
    /// Returns `None` when the ray runs parallel to the plane or points away
    /// from it. A start point within `EPSILON` of the plane always hits.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `direction` is shorter than `EPSILON`.
    pub fn intersection_ray(&self, start_point: Point3D, direction: Vector3D) -> Result<Option<Point3D>> {
        if direction.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Plane3D::intersection_ray",
            }
            .into());
        }
        let facing = self.normal.dot(&direction);
        let offset = self.distance(&start_point);
        if (facing > 0.0 && offset > EPSILON) || (facing < 0.0 && offset < -EPSILON) {
            return Ok(None);
        }
        Ok(Line3D::new(start_point, direction)?.intersection_plane(self))
    }

    /// Point where the segment `[point_a, point_b]` crosses the plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the points coincide.
    pub fn intersection_between(&self, point_a: Point3D, point_b: Point3D) -> Result<Option<Point3D>> {
        let line = Line3D::from_points(point_a, point_b)?;
        let Some(hit) = line.intersection_plane(self) else {
            return Ok(None);
        };
        if Line3D::on_line_segment(point_a, point_b, hit)? {
            Ok(Some(hit))
        } else {
            Ok(None)
        }
    }
}

impl PartialEq for Plane3D {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl AbsDiffEq for Plane3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    /// Coefficient-wise comparison; opposite orientations are not equal.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.normal.abs_diff_eq(&other.normal, epsilon) && (self.d - other.d).abs() < epsilon
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D::new(x, y, z)
    }

    fn plane(normal: Vector3D, point: Point3D) -> Plane3D {
        Plane3D::from_normal_point(normal, point).unwrap()
    }

    fn unit_square() -> Vec<Point3D> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    // ── construction ──

    #[test]
    fn normal_is_normalized() {
        let pl = plane(v(0.0, 0.0, 3.0), p(0.0, 0.0, 2.0));
        assert_eq!(pl.normal(), v(0.0, 0.0, 1.0));
        assert!((pl.d() + 2.0).abs() < 1e-12);
        assert!(Plane3D::from_normal_point(Vector3D::zero(), p(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn zero_coefficients_are_null() {
        assert!(Plane3D::from_coefficients(0.0, 0.0, 0.0, 1.0).is_none());
        let raw = Plane3D::from_coefficients(0.0, 0.0, 2.0, -4.0).unwrap();
        assert!(raw.on_plane(&p(7.0, 7.0, 2.0)));
    }

    // ── distance / containment ──

    #[test]
    fn signed_distance() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 1.0));
        assert!((pl.distance(&p(3.0, 3.0, 4.0)) - 3.0).abs() < 1e-12);
        assert!((pl.distance(&p(3.0, 3.0, -1.0)) + 2.0).abs() < 1e-12);
        assert!(pl.on_plane(&p(9.0, -9.0, 1.0)));
        assert_eq!(pl.point_on_plane(), p(0.0, 0.0, 1.0));
    }

    #[test]
    fn offset_moves_along_normal() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0)).offset(2.0);
        assert!(pl.on_plane(&p(0.0, 0.0, 2.0)));
    }

    #[test]
    fn inverse_is_coplanar_but_not_equal() {
        let pl = plane(v(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0));
        let inv = pl.inverse();
        assert!(pl.coplanar(&inv));
        assert!(pl.parallel(&inv));
        assert_ne!(pl, inv);
        assert!(inv.on_plane(&p(0.0, 1.0, 5.0)));
    }

    #[test]
    fn parallel_but_not_coplanar() {
        let a = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let b = plane(v(0.0, 0.0, -1.0), p(0.0, 0.0, 3.0));
        assert!(a.parallel(&b));
        assert!(!a.coplanar(&b));
    }

    #[test]
    fn angle_between_planes() {
        let a = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let b = plane(v(0.0, 1.0, 1.0), p(0.0, 0.0, 0.0));
        let c = plane(v(0.0, 0.0, -1.0), p(0.0, 0.0, 0.0));
        let d = plane(v(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0));
        assert!((a.angle_with(&b).value() - FRAC_PI_4).abs() < 1e-9);
        assert!(a.angle_with(&c).value() < 1e-6);
        assert!((a.angle_with(&d).value() - FRAC_PI_2).abs() < 1e-9);
    }

    // ── intersections ──

    #[test]
    fn two_planes_meet_in_a_line() {
        let a = plane(v(1.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let b = plane(v(0.0, 1.0, 0.0), p(0.0, 2.0, 0.0));
        let line = a.intersection_plane(&b).unwrap();
        assert!(a.on_plane(&line.point()));
        assert!(b.on_plane(&line.point()));
        assert!(line.parallel_to_vector(&v(0.0, 0.0, 1.0)).unwrap());
    }

    #[test]
    fn parallel_planes_have_no_line() {
        let a = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let b = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 5.0));
        assert!(a.intersection_plane(&b).is_none());
    }

    #[test]
    fn line_intersection_is_symmetric() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 2.0));
        let line = Line3D::new(p(1.0, 1.0, 0.0), v(0.0, 1.0, 1.0)).unwrap();
        assert_eq!(pl.intersection_line(&line), line.intersection_plane(&pl));
        assert_eq!(pl.intersection_line(&line), Some(p(1.0, 3.0, 2.0)));
    }

    #[test]
    fn ray_hits_only_when_facing_plane() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let up = v(0.0, 0.0, 1.0);

        let below = pl.intersection_ray(p(1.0, 1.0, -2.0), up).unwrap();
        assert_eq!(below, Some(p(1.0, 1.0, 0.0)));

        let above = pl.intersection_ray(p(1.0, 1.0, 2.0), up).unwrap();
        assert_eq!(above, None);

        let down = pl.intersection_ray(p(1.0, 1.0, 2.0), v(1.0, 0.0, -1.0)).unwrap();
        assert_eq!(down, Some(p(3.0, 1.0, 0.0)));

        let sideways = pl.intersection_ray(p(1.0, 1.0, 2.0), v(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(sideways, None);

        assert!(pl.intersection_ray(p(0.0, 0.0, 1.0), Vector3D::zero()).is_err());
    }

    #[test]
    fn shallow_ray_away_from_plane_misses() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let shallow = v(1.0, 0.0, 0.2);
        assert_eq!(pl.intersection_ray(p(0.0, 0.0, -1.0), -shallow).unwrap(), None);
        assert_eq!(pl.intersection_ray(p(0.0, 0.0, 1.0), -shallow).unwrap(), Some(p(-5.0, 0.0, 0.0)));
    }

    #[test]
    fn segment_crossing() {
        let pl = plane(v(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0));
        let hit = pl.intersection_between(p(0.0, 0.0, -1.0), p(2.0, 0.0, 1.0)).unwrap();
        assert_eq!(hit, Some(p(1.0, 0.0, 0.0)));

        let short = pl.intersection_between(p(0.0, 0.0, 1.0), p(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(short, None);

        assert!(pl.intersection_between(p(0.0, 0.0, 1.0), p(0.0, 0.0, 1.0)).is_err());
    }

    // ── plane_from_loop ──

    #[test]
    fn fit_square_faces_up() {
        let pl = Plane3D::plane_from_loop(&unit_square()).unwrap().unwrap();
        assert_eq!(pl.normal(), v(0.0, 0.0, 1.0));
        for pt in unit_square() {
            assert!(pl.on_plane(&pt));
        }
    }

    #[test]
    fn fit_tilted_concave_loop() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 4.0),
            p(4.0, 4.0, 4.0),
            p(2.0, 1.0, 2.0),
            p(0.0, 4.0, 0.0),
        ];
        let pl = Plane3D::plane_from_loop(&points).unwrap().unwrap();
        for pt in &points {
            assert!(pl.on_plane(pt));
        }
    }

    #[test]
    fn fit_with_colinear_leading_points() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
        ];
        let pl = Plane3D::plane_from_loop(&points).unwrap().unwrap();
        assert_eq!(pl.normal(), v(0.0, 0.0, 1.0));
    }

    #[test]
    fn colinear_loop_is_null() {
        let points = vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)];
        assert!(Plane3D::plane_from_loop(&points).unwrap().is_none());
    }

    #[test]
    fn small_loop_still_fits() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(0.02, 0.0, 0.0),
            p(0.02, 0.02, 0.0),
            p(0.0, 0.02, 0.0),
        ];
        let pl = Plane3D::plane_from_loop(&points).unwrap().unwrap();
        assert_eq!(pl.normal(), v(0.0, 0.0, 1.0));
        assert!(pl.d().abs() < 1e-12);
    }

    #[test]
    fn loop_thinner_than_tolerance_is_null() {
        let points = vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, 0.0005, 0.0)];
        assert!(Plane3D::plane_from_loop(&points).unwrap().is_none());

        let coincident = vec![p(1.0, 1.0, 1.0); 3];
        assert!(Plane3D::plane_from_loop(&coincident).unwrap().is_none());
    }

    #[test]
    fn too_few_points_fail() {
        assert!(Plane3D::plane_from_loop(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).is_err());
    }
}
