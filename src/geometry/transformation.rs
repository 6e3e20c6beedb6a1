use std::ops::{Index, IndexMut, Mul};

use approx::AbsDiffEq;
use tracing::debug;

use crate::error::{GeometryError, Result, TransformError};
use crate::math::{Matrix4, Radians, Vector3, EPSILON};

use super::{Line3D, Plane3D, Point3D, Vector3D};

/// Column-major indices of the bottom row entries that are structurally zero
/// for affine matrices.
const BOTTOM_ROW: [usize; 3] = [3, 7, 11];

/// A 4x4 affine transformation in homogeneous coordinates.
///
/// Storage is column-major: `self[12..15]` is the translation and `self[15]`
/// the homogeneous scale `w`. Transformations compose by right
/// multiplication, `(a * b) * p == a * (b * p)`.
#[derive(Debug, Clone, Copy)]
pub struct Transformation {
    matrix: Matrix4,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Creates a transformation from 16 column-major values.
    #[must_use]
    pub fn from_values(values: [f64; 16]) -> Self {
        Self {
            matrix: Matrix4::from_column_slice(&values),
        }
    }

    /// Creates a transformation from a nalgebra matrix.
    #[must_use]
    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    /// Builds a transformation whose columns are the scaled axes and the
    /// translation.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if `|scalar| < EPSILON`.
    pub fn from_axes(
        x_axis: Vector3D,
        y_axis: Vector3D,
        z_axis: Vector3D,
        translation: Vector3D,
        scalar: f64,
    ) -> Result<Self> {
        if scalar.abs() < EPSILON {
            return Err(GeometryError::DivisionByZero {
                operation: "Transformation::from_axes",
                divisor: scalar,
            }
            .into());
        }
        let (x, y, z) = (x_axis * scalar, y_axis * scalar, z_axis * scalar);
        Ok(Self::from_values([
            x.x(), x.y(), x.z(), 0.0,
            y.x(), y.y(), y.z(), 0.0,
            z.x(), z.y(), z.z(), 0.0,
            translation.x(), translation.y(), translation.z(), 1.0,
        ]))
    }

    /// Uniform scale stored projectively as `1 / scalar` in the homogeneous
    /// slot; [`Transformation::normalize`] turns it into an ordinary scale.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivisionByZero`] if `|scalar| < EPSILON`.
    pub fn from_scalar(scalar: f64) -> Result<Self> {
        if scalar.abs() < EPSILON {
            return Err(GeometryError::DivisionByZero {
                operation: "Transformation::from_scalar",
                divisor: scalar,
            }
            .into());
        }
        let mut t = Self::identity();
        t[15] = 1.0 / scalar;
        Ok(t)
    }

    #[must_use]
    pub fn from_translation(translation: Vector3D) -> Self {
        Self {
            matrix: Matrix4::new_translation(translation.as_vector()),
        }
    }

    /// Translation that moves the origin onto `point`.
    #[must_use]
    pub fn from_point(point: Point3D) -> Self {
        Self::from_translation(Vector3D::from(point))
    }

    /// Non-uniform scale about the origin.
    #[must_use]
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// Rotation about an axis through the origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if `axis` is shorter than `EPSILON`.
    pub fn rotation(axis: Vector3D, angle: Radians) -> Result<Self> {
        let line = Line3D::new(Point3D::origin(), axis)?;
        Ok(Self::rotate_about_line(angle, &line))
    }

    /// Rotation by `angle` (right-hand rule) about an arbitrary 3D line.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn rotate_about_line(angle: Radians, line: &Line3D) -> Self {
        let origin = line.point();
        let (a, b, c) = (origin.x(), origin.y(), origin.z());
        let dir = line.direction();
        let (u, v, w) = (dir.x(), dir.y(), dir.z());
        let (sin, cos) = angle.value().sin_cos();
        let k = 1.0 - cos;

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            u * u + (1.0 - u * u) * cos,
            u * v * k - w * sin,
            u * w * k + v * sin,
            (a * (v * v + w * w) - u * (b * v + c * w)) * k + (b * w - c * v) * sin,

            u * v * k + w * sin,
            v * v + (1.0 - v * v) * cos,
            v * w * k - u * sin,
            (b * (u * u + w * w) - v * (a * u + c * w)) * k + (c * u - a * w) * sin,

            u * w * k - v * sin,
            v * w * k + u * sin,
            w * w + (1.0 - w * w) * cos,
            (c * (u * u + v * v) - w * (a * u + b * v)) * k + (a * v - b * u) * sin,

            0.0, 0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// The 16 values in column-major order.
    #[must_use]
    pub fn values(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.matrix.as_slice());
        out
    }

    /// Writable column-major storage, for callers that fill a matrix in place.
    pub fn values_mut(&mut self) -> &mut [f64] {
        self.matrix.as_mut_slice()
    }

    #[must_use]
    pub fn as_matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// 2x2 sub-determinants of the top two rows (`s`) and bottom two rows (`c`).
    fn sub_determinants(&self) -> ([f64; 6], [f64; 6]) {
        let m = &self.matrix;
        let s = [
            m[(0, 0)] * m[(1, 1)] - m[(1, 0)] * m[(0, 1)],
            m[(0, 0)] * m[(1, 2)] - m[(1, 0)] * m[(0, 2)],
            m[(0, 0)] * m[(1, 3)] - m[(1, 0)] * m[(0, 3)],
            m[(0, 1)] * m[(1, 2)] - m[(1, 1)] * m[(0, 2)],
            m[(0, 1)] * m[(1, 3)] - m[(1, 1)] * m[(0, 3)],
            m[(0, 2)] * m[(1, 3)] - m[(1, 2)] * m[(0, 3)],
        ];
        let c = [
            m[(2, 0)] * m[(3, 1)] - m[(3, 0)] * m[(2, 1)],
            m[(2, 0)] * m[(3, 2)] - m[(3, 0)] * m[(2, 2)],
            m[(2, 0)] * m[(3, 3)] - m[(3, 0)] * m[(2, 3)],
            m[(2, 1)] * m[(3, 2)] - m[(3, 1)] * m[(2, 2)],
            m[(2, 1)] * m[(3, 3)] - m[(3, 1)] * m[(2, 3)],
            m[(2, 2)] * m[(3, 3)] - m[(3, 2)] * m[(2, 3)],
        ];
        (s, c)
    }

    /// Determinant of the full 4x4 matrix.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let (s, c) = self.sub_determinants();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// General 4x4 inverse, valid for projective matrices too.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] if the determinant is zero.
    #[allow(clippy::float_cmp)]
    pub fn matrix_inverse(&self) -> Result<Self> {
        let (s, c) = self.sub_determinants();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        if det == 0.0 {
            return Err(TransformError::Singular {
                operation: "Transformation::matrix_inverse",
            }
            .into());
        }
        let inv = 1.0 / det;
        let a = |row: usize, col: usize| self.matrix[(row, col)];

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            ( a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3]) * inv,
            (-a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3]) * inv,
            ( a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3]) * inv,
            (-a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3]) * inv,

            (-a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1]) * inv,
            ( a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1]) * inv,
            (-a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1]) * inv,
            ( a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1]) * inv,

            ( a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0]) * inv,
            (-a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0]) * inv,
            ( a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0]) * inv,
            (-a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0]) * inv,

            (-a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0]) * inv,
            ( a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0]) * inv,
            (-a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0]) * inv,
            ( a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0]) * inv,
        );
        Ok(Self { matrix })
    }

    /// Returns `true` if the bottom row is exactly `(0, 0, 0, 1)`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_affine(&self) -> bool {
        BOTTOM_ROW.iter().all(|&i| self[i] == 0.0) && self[15] == 1.0
    }

    /// Inverse transformation.
    ///
    /// Affine matrices invert the 3x3 linear part and map the translation
    /// through it; anything else falls back to [`Transformation::matrix_inverse`].
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] if the matrix cannot be inverted.
    pub fn inverse(&self) -> Result<Self> {
        if !self.is_affine() {
            debug!(w = self[15], "non-affine matrix, using general inverse");
            return self.matrix_inverse();
        }
        let linear = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let linear_inv = linear.try_inverse().ok_or(TransformError::Singular {
            operation: "Transformation::inverse",
        })?;
        let translation = -(linear_inv * self.matrix.fixed_view::<3, 1>(0, 3));

        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&linear_inv);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Ok(Self { matrix })
    }

    /// Multiplies the matrix by a homogeneous column vector.
    #[must_use]
    pub fn multiply4x1(&self, vector: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|k| self[i + 4 * k] * vector[k]).sum();
        }
        out
    }

    /// Divides every value by the homogeneous scale so that `self[15] == 1`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ZeroHomogeneousScale`] if `self[15]` is zero.
    #[allow(clippy::float_cmp)]
    pub fn normalize(&mut self) -> Result<()> {
        let w = self[15];
        if w == 0.0 {
            return Err(TransformError::ZeroHomogeneousScale {
                operation: "Transformation::normalize",
            }
            .into());
        }
        if w != 1.0 {
            self.matrix /= w;
        }
        Ok(())
    }

    /// Normalized copy, see [`Transformation::normalize`].
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ZeroHomogeneousScale`] if `self[15]` is zero.
    pub fn normalized(&self) -> Result<Self> {
        let mut copy = *self;
        copy.normalize()?;
        Ok(copy)
    }

    /// Translation part, divided through by the homogeneous scale.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn translation(&self) -> Vector3D {
        let t = Vector3D::new(self[12], self[13], self[14]);
        let w = self[15];
        if w == 1.0 || w == 0.0 {
            t
        } else {
            t * (1.0 / w)
        }
    }

    /// Compares every value except the bottom-row zeros within `epsilon`.
    ///
    /// The homogeneous scale is compared, so a matrix and its scalar multiple
    /// differ until both are normalized.
    #[must_use]
    pub fn equal(&self, other: &Self, epsilon: f64) -> bool {
        (0..16)
            .filter(|i| !BOTTOM_ROW.contains(i))
            .all(|i| (self[i] - other[i]).abs() < epsilon)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.equal(&Self::identity(), EPSILON)
    }

    fn linear_determinant(&self) -> f64 {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant()
    }
}

impl Index<usize> for Transformation {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.matrix[index]
    }
}

impl IndexMut<usize> for Transformation {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.matrix[index]
    }
}

impl Mul for Transformation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl Mul<Vector3D> for Transformation {
    type Output = Vector3D;

    /// Vectors ignore translation (`w = 0`).
    fn mul(self, rhs: Vector3D) -> Vector3D {
        let [x, y, z, _] = self.multiply4x1([rhs.x(), rhs.y(), rhs.z(), 0.0]);
        Vector3D::new(x, y, z)
    }
}

impl Mul<Point3D> for Transformation {
    type Output = Point3D;

    /// Points are translated (`w = 1`) and divided by the resulting `w`.
    #[allow(clippy::float_cmp)]
    fn mul(self, rhs: Point3D) -> Point3D {
        let [x, y, z, w] = self.multiply4x1([rhs.x(), rhs.y(), rhs.z(), 1.0]);
        if w == 1.0 || w == 0.0 {
            Point3D::new(x, y, z)
        } else {
            Point3D::new(x / w, y / w, z / w)
        }
    }
}

impl Mul<Plane3D> for Transformation {
    type Output = Option<Plane3D>;

    /// Maps a point of the plane and two in-plane directions, then rebuilds
    /// the plane from them. Returns `None` if the transformation collapses
    /// the plane.
    fn mul(self, rhs: Plane3D) -> Option<Plane3D> {
        let normal = rhs.normal().unit().ok()?;
        let reference = if normal.x().abs() < 0.9 {
            Vector3D::new(1.0, 0.0, 0.0)
        } else {
            Vector3D::new(0.0, 1.0, 0.0)
        };
        let u_dir = normal.cross(&reference);
        let v_dir = normal.cross(&u_dir);

        let origin = self * rhs.point_on_plane();
        let mut mapped = (self * u_dir).cross(&(self * v_dir));
        if self.linear_determinant() < 0.0 {
            mapped = -mapped;
        }
        Plane3D::from_normal_point(mapped, origin).ok()
    }
}

impl PartialEq for Transformation {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other, EPSILON)
    }
}

impl AbsDiffEq for Transformation {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.equal(other, epsilon)
    }
}
