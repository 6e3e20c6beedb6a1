use std::ops::{Add, Mul, Sub};

use approx::AbsDiffEq;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, EPSILON};

use super::{Line3D, Vector3D};

/// A position in 3D space.
///
/// Like [`Vector3D`], "no point" is `Option::<Point3D>::None` and the origin
/// is an ordinary value.
#[derive(Debug, Clone, Copy)]
pub struct Point3D(Point3);

/// How far the second operand of a line intersection extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    /// `[point, point + vector]`.
    Segment,
    /// `[point, point + t * vector)` for every `t >= 0`.
    Ray,
}

impl Point3D {
    /// Creates a point from its coordinates.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Point3::new(x, y, z))
    }

    /// The point `(0, 0, 0)`.
    #[must_use]
    pub fn origin() -> Self {
        Self(Point3::origin())
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Returns the backing nalgebra point.
    #[must_use]
    pub fn as_point(&self) -> &Point3 {
        &self.0
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.0 - other.0).norm()
    }

    /// Divides every coordinate by `divider`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if `|divider| < EPSILON`.
    pub fn checked_div(&self, divider: f64) -> Result<Self> {
        if divider.abs() < EPSILON {
            return Err(GeometryError::DivisionByZero {
                operation: "Point3D::checked_div",
                divisor: divider,
            }
            .into());
        }
        Ok(Self(self.0 / divider))
    }

    /// Intersects segment `[point_a, point_a + vector_a]` with segment
    /// `[point_b, point_b + vector_b]`.
    ///
    /// Returns `None` when the segments do not meet. When they are colinear,
    /// `None` is returned unless `return_colinear` is set, in which case the
    /// point of the overlap closest to `point_b` is returned (or `None` if
    /// the segments are disjoint).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if either vector is shorter than `EPSILON`.
    pub fn intersection_between_lines(
        point_a: Self,
        vector_a: Vector3D,
        point_b: Self,
        vector_b: Vector3D,
        return_colinear: bool,
    ) -> Result<Option<Self>> {
        intersect(
            "Point3D::intersection_between_lines",
            (point_a, vector_a),
            (point_b, vector_b),
            Extent::Segment,
            return_colinear,
        )
    }

    /// Intersects segment `[point_a, point_a + vector_a]` with the
    /// semi-infinite ray starting at `point_b` along `ray_b`.
    ///
    /// Colinear handling follows [`Point3D::intersection_between_lines`].
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if either vector is shorter than `EPSILON`.
    pub fn ray_line_intersection(
        point_a: Self,
        vector_a: Vector3D,
        point_b: Self,
        ray_b: Vector3D,
        return_colinear: bool,
    ) -> Result<Option<Self>> {
        intersect(
            "Point3D::ray_line_intersection",
            (point_a, vector_a),
            (point_b, ray_b),
            Extent::Ray,
            return_colinear,
        )
    }
}

fn intersect(
    operation: &'static str,
    (point_a, vector_a): (Point3D, Vector3D),
    (point_b, vector_b): (Point3D, Vector3D),
    extent_b: Extent,
    return_colinear: bool,
) -> Result<Option<Point3D>> {
    let len_a = vector_a.length();
    let len_b = vector_b.length();
    if len_a < EPSILON || len_b < EPSILON {
        return Err(GeometryError::ZeroVector { operation }.into());
    }
    let unit_a = vector_a.unit()?;
    let unit_b = vector_b.unit()?;

    if unit_a.cross(&unit_b) == Vector3D::zero() {
        if (point_b - point_a).cross(&unit_a) != Vector3D::zero() {
            // Parallel, on distinct lines.
            return Ok(None);
        }
        if !return_colinear {
            return Ok(None);
        }
        return Ok(colinear_overlap(point_a, unit_a, len_a, point_b, unit_b, len_b, extent_b));
    }

    let line_a = Line3D::new(point_a, vector_a)?;
    let line_b = Line3D::new(point_b, vector_b)?;
    let Some((on_a, on_b)) = line_a.closest_points(&line_b) else {
        return Ok(None);
    };
    if on_a != on_b {
        // Skew lines.
        return Ok(None);
    }

    let factor_a = (on_a - point_a).dot(&vector_a) / (len_a * len_a);
    let tolerance_a = EPSILON / len_a;
    if factor_a < -tolerance_a || factor_a > 1.0 + tolerance_a {
        return Ok(None);
    }

    let factor_b = (on_a - point_b).dot(&vector_b) / (len_b * len_b);
    let tolerance_b = EPSILON / len_b;
    if factor_b < -tolerance_b {
        return Ok(None);
    }
    if extent_b == Extent::Segment && factor_b > 1.0 + tolerance_b {
        return Ok(None);
    }

    Ok(Some(on_a))
}

/// Overlap of two colinear operands, measured as distances along `unit_a`
/// from `point_a`. Returns the overlap point nearest to `point_b`.
fn colinear_overlap(
    point_a: Point3D,
    unit_a: Vector3D,
    len_a: f64,
    point_b: Point3D,
    unit_b: Vector3D,
    len_b: f64,
    extent_b: Extent,
) -> Option<Point3D> {
    let start_b = (point_b - point_a).dot(&unit_a);
    let forward = unit_b.dot(&unit_a) > 0.0;

    let (b_min, b_max) = match (extent_b, forward) {
        (Extent::Segment, true) => (start_b, start_b + len_b),
        (Extent::Segment, false) => (start_b - len_b, start_b),
        (Extent::Ray, true) => (start_b, f64::INFINITY),
        (Extent::Ray, false) => (f64::NEG_INFINITY, start_b),
    };

    let low = b_min.max(0.0);
    let high = b_max.min(len_a);
    if low > high + EPSILON {
        return None;
    }
    let along = start_b.clamp(low, high.max(low));
    Some(point_a + unit_a * along)
}

impl From<Point3> for Point3D {
    fn from(p: Point3) -> Self {
        Self(p)
    }
}

impl From<Vector3D> for Point3D {
    fn from(v: Vector3D) -> Self {
        Self(Point3::from(*v.as_vector()))
    }
}

impl Add for Point3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0.coords)
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Self;

    fn add(self, rhs: Vector3D) -> Self {
        Self(self.0 + *rhs.as_vector())
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Vector3D {
        Vector3D::from(self.0 - rhs.0)
    }
}

impl Sub<Vector3D> for Point3D {
    type Output = Self;

    fn sub(self, rhs: Vector3D) -> Self {
        Self(self.0 - *rhs.as_vector())
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl AbsDiffEq for Point3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.0 - other.0).iter().all(|d| d.abs() < epsilon)
    }
}
