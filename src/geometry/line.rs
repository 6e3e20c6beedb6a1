use crate::error::{GeometryError, Result};
use crate::math::EPSILON;

use super::{Plane3D, Point3D, Vector3D};

/// An infinite line through `point` along a unit `direction`.
///
/// The direction is normalized on construction; every distance and
/// intersection formula below relies on it being unit length.
#[derive(Debug, Clone, Copy)]
pub struct Line3D {
    point: Point3D,
    direction: Vector3D,
}

impl Line3D {
    /// Creates a line through `point` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `direction` is shorter than `EPSILON`.
    pub fn new(point: Point3D, direction: Vector3D) -> Result<Self> {
        if direction.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Line3D::new",
            }
            .into());
        }
        Ok(Self {
            point,
            direction: direction.unit()?,
        })
    }

    /// Creates the line through `a` and `b`, directed from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the points coincide.
    pub fn from_points(a: Point3D, b: Point3D) -> Result<Self> {
        Self::new(a, b - a)
    }

    #[must_use]
    pub fn point(&self) -> Point3D {
        self.point
    }

    /// Unit direction of the line.
    #[must_use]
    pub fn direction(&self) -> Vector3D {
        self.direction
    }

    /// Closest points between `self` and `other`, as `(on_self, on_other)`.
    ///
    /// Returns `None` if the lines are parallel.
    #[must_use]
    pub fn closest_points(&self, other: &Self) -> Option<(Point3D, Point3D)> {
        let p13 = self.point - other.point;
        let p43 = other.direction;
        let p21 = self.direction;

        let d1343 = p13.dot(&p43);
        let d4321 = p43.dot(&p21);
        let d1321 = p13.dot(&p21);
        let d4343 = p43.dot(&p43);
        let d2121 = p21.dot(&p21);

        // sin² of the angle between the directions
        let denom = d2121 * d4343 - d4321 * d4321;
        if denom.abs() < EPSILON * EPSILON {
            return None;
        }
        let numer = d1343 * d4321 - d1321 * d4343;

        let mua = numer / denom;
        let mub = (d1343 + d4321 * mua) / d4343;

        Some((self.point + p21 * mua, other.point + p43 * mub))
    }

    /// Intersection point of two lines, or `None` if they are parallel or skew.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Point3D> {
        let (on_self, on_other) = self.closest_points(other)?;
        (on_self == on_other).then_some(on_self)
    }

    /// Intersection point with `plane`, or `None` if the line is parallel to it.
    #[must_use]
    pub fn intersection_plane(&self, plane: &Plane3D) -> Option<Point3D> {
        let denom = plane.normal().dot(&self.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = -plane.distance(&self.point) / denom;
        Some(self.point + self.direction * t)
    }

    /// Orthogonal projection of `point` onto the line.
    #[must_use]
    pub fn closest_point(&self, point: &Point3D) -> Point3D {
        let t = (*point - self.point).dot(&self.direction);
        self.point + self.direction * t
    }

    /// Distance from `point` to the line.
    #[must_use]
    pub fn distance(&self, point: &Point3D) -> f64 {
        (*point - self.closest_point(point)).length()
    }

    /// Returns `true` if `point` lies on the line.
    ///
    /// The line parameter is solved on the axis where the direction has its
    /// largest component, then checked against the other two axes.
    #[must_use]
    pub fn on_line(&self, point: &Point3D) -> bool {
        let dir = self.direction.as_vector();
        let diff = *(*point - self.point).as_vector();
        let axis = dir.iamax();
        let t = diff[axis] / dir[axis];
        (0..3).all(|i| (diff[i] - t * dir[i]).abs() < EPSILON)
    }

    /// Returns `true` if `test_point` lies on the segment `[point_a, point_b]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the segment has zero length.
    pub fn on_line_segment(point_a: Point3D, point_b: Point3D, test_point: Point3D) -> Result<bool> {
        if point_a == point_b {
            return Err(GeometryError::Degenerate {
                operation: "Line3D::on_line_segment",
                reason: "segment endpoints coincide".into(),
            }
            .into());
        }
        let a_to_b = point_b - point_a;
        let a_to_test = test_point - point_a;
        let length = a_to_b.length();

        if a_to_b.cross(&a_to_test).length() / length >= EPSILON {
            return Ok(false);
        }
        let along = a_to_b.dot(&a_to_test);
        let pad = EPSILON * length;
        Ok(along >= -pad && along <= length * length + pad)
    }

    /// Returns `true` if the lines have equal or opposite directions.
    #[must_use]
    pub fn parallel(&self, other: &Self) -> bool {
        self.direction == other.direction || self.direction == -other.direction
    }

    /// Returns `true` if `vector` points along or against the line.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `vector` is shorter than `EPSILON`.
    pub fn parallel_to_vector(&self, vector: &Vector3D) -> Result<bool> {
        if vector.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Line3D::parallel_to_vector",
            }
            .into());
        }
        let gap = (vector.unit()? - self.direction).length();
        Ok(gap < EPSILON || (gap - 2.0).abs() < EPSILON)
    }
}

impl PartialEq for Line3D {
    /// Two lines are equal when they describe the same infinite line.
    fn eq(&self, other: &Self) -> bool {
        self.parallel(other) && (self.point == other.point || self.on_line(&other.point))
    }
}
