use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use approx::AbsDiffEq;

use crate::error::{GeometryError, Result};
use crate::math::{Radians, Vector3, EPSILON};

use super::Point3D;

/// Result of [`Vector3D::colinear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colinearity {
    /// The vectors are not colinear.
    No,
    /// The vectors point the same way.
    ColinearPro,
    /// The vectors point in opposite directions.
    ColinearAnti,
    /// One of the vectors is too short to have a direction.
    Undefined,
}

/// A free vector in 3D space.
///
/// A "null" vector (no vector at all, e.g. the result of a failed
/// computation) is represented as `Option::<Vector3D>::None`; the zero vector
/// is a valid value.
#[derive(Debug, Clone, Copy)]
pub struct Vector3D(Vector3);

impl Vector3D {
    /// Creates a vector from its components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The zero vector `(0, 0, 0)`.
    #[must_use]
    pub fn zero() -> Self {
        Self(Vector3::zeros())
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

    /// Returns the backing nalgebra vector.
    #[must_use]
    pub fn as_vector(&self) -> &Vector3 {
        &self.0
    }

    /// Euclidean norm.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.0.norm()
    }

    /// Returns the vector scaled to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if the length is below `EPSILON`.
    pub fn unit(&self) -> Result<Self> {
        self.checked_div(self.length())
    }

    /// Divides every component by `divider`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if `|divider| < EPSILON`.
    pub fn checked_div(&self, divider: f64) -> Result<Self> {
        if divider.abs() < EPSILON {
            return Err(GeometryError::DivisionByZero {
                operation: "Vector3D::checked_div",
                divisor: divider,
            }
            .into());
        }
        Ok(Self(self.0 / divider))
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    /// Dot product with a point interpreted as a position vector.
    #[must_use]
    pub fn dot_point(&self, point: &Point3D) -> f64 {
        self.0.dot(&point.as_point().coords)
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    /// Angle between two vectors, in `[0, π]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if either vector is shorter than `EPSILON`.
    pub fn angle(&self, other: &Self) -> Result<Radians> {
        if self.length() < EPSILON || other.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Vector3D::angle",
            }
            .into());
        }
        let cos = self.unit()?.dot(&other.unit()?).clamp(-1.0, 1.0);
        Ok(Radians::new(cos.acos()))
    }

    /// Classifies whether `other` lies along the same line as `self`.
    ///
    /// Uses the triangle inequality: `|a + b|` equals `|a| + |b|` for vectors
    /// pointing the same way and `||a| - |b||` for opposite ones.
    #[must_use]
    pub fn colinear(&self, other: &Self) -> Colinearity {
        let len_a = self.length();
        let len_b = other.length();
        if len_a < EPSILON || len_b < EPSILON {
            return Colinearity::Undefined;
        }
        let combined = (*self + *other).length();
        if (combined - (len_a + len_b)).abs() < EPSILON {
            Colinearity::ColinearPro
        } else if (combined - (len_a - len_b).abs()).abs() < EPSILON {
            Colinearity::ColinearAnti
        } else {
            Colinearity::No
        }
    }

    /// Returns `true` if the unit vectors' cross product vanishes, i.e. the
    /// sine of the angle between them is below `EPSILON`.
    ///
    /// Zero-length vectors are never parallel to anything.
    #[must_use]
    pub fn is_parallel(&self, other: &Self) -> bool {
        match (self.unit(), other.unit()) {
            (Ok(a), Ok(b)) => a.cross(&b).length() < EPSILON,
            _ => false,
        }
    }

    /// Rotates the vector about `axis` by `angle` (right-hand rule).
    ///
    /// The component along the axis is kept; the orthogonal component is
    /// rotated in the plane perpendicular to the axis.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `axis` is shorter than `EPSILON`.
    pub fn rotate_about(&self, angle: Radians, axis: &Self) -> Result<Self> {
        if axis.length() < EPSILON {
            return Err(GeometryError::ZeroVector {
                operation: "Vector3D::rotate_about",
            }
            .into());
        }
        let axis = axis.unit()?;
        let parallel = axis * self.dot(&axis);
        let orthogonal = *self - parallel;
        let binormal = axis.cross(&orthogonal);
        let (sin, cos) = angle.value().sin_cos();
        Ok(parallel + orthogonal * cos + binormal * sin)
    }
}

impl From<Vector3> for Vector3D {
    fn from(v: Vector3) -> Self {
        Self(v)
    }
}

impl From<Point3D> for Vector3D {
    fn from(point: Point3D) -> Self {
        Self(point.as_point().coords)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Vector3D {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Vector3D {
        Vector3D(rhs.0 * self)
    }
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }
}

impl AbsDiffEq for Vector3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    /// Component-wise strict comparison: every `|a_i - b_i| < epsilon`.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.0 - other.0).iter().all(|d| d.abs() < epsilon)
    }
}
