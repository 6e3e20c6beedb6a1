//! Plain `#[repr(C)]` structs matching the host SDK's geometry layouts.
//!
//! These are the only types that cross the SDK boundary. Conversions into
//! kernel types are explicit; conversions that can produce "no value" return
//! `Option`.

use crate::geometry::{BoundingBox3D, Plane3D, Point3D, Transformation, Vector3D};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawVector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPoint3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Plane `a*x + b*y + c*z + d = 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPlane3d {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// 4x4 matrix, column-major.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTransformation {
    pub values: [f64; 16],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawBoundingBox3d {
    pub min_point: RawPoint3d,
    pub max_point: RawPoint3d,
}

impl From<RawVector3d> for Vector3D {
    fn from(raw: RawVector3d) -> Self {
        Self::new(raw.x, raw.y, raw.z)
    }
}

impl From<Vector3D> for RawVector3d {
    fn from(v: Vector3D) -> Self {
        Self {
            x: v.x(),
            y: v.y(),
            z: v.z(),
        }
    }
}

impl From<RawPoint3d> for Point3D {
    fn from(raw: RawPoint3d) -> Self {
        Self::new(raw.x, raw.y, raw.z)
    }
}

impl From<Point3D> for RawPoint3d {
    fn from(p: Point3D) -> Self {
        Self {
            x: p.x(),
            y: p.y(),
            z: p.z(),
        }
    }
}

impl RawPlane3d {
    /// Converts into a kernel plane; `None` when the normal is zero.
    #[must_use]
    pub fn to_plane(self) -> Option<Plane3D> {
        Plane3D::from_coefficients(self.a, self.b, self.c, self.d)
    }
}

impl From<Plane3D> for RawPlane3d {
    fn from(plane: Plane3D) -> Self {
        Self {
            a: plane.a(),
            b: plane.b(),
            c: plane.c(),
            d: plane.d(),
        }
    }
}

impl Default for RawTransformation {
    fn default() -> Self {
        Transformation::identity().into()
    }
}

impl From<RawTransformation> for Transformation {
    fn from(raw: RawTransformation) -> Self {
        Self::from_values(raw.values)
    }
}

impl From<Transformation> for RawTransformation {
    fn from(t: Transformation) -> Self {
        Self { values: t.values() }
    }
}

impl RawBoundingBox3d {
    /// Converts into a kernel box; `None` when the SDK reports an empty box
    /// (minimum corner above the maximum on any axis).
    #[must_use]
    pub fn to_bounding_box(self) -> Option<BoundingBox3D> {
        let (lo, hi) = (self.min_point, self.max_point);
        if lo.x > hi.x || lo.y > hi.y || lo.z > hi.z {
            return None;
        }
        Some(BoundingBox3D::new(lo.into(), hi.into()))
    }
}

impl From<BoundingBox3D> for RawBoundingBox3d {
    fn from(bb: BoundingBox3D) -> Self {
        Self {
            min_point: bb.min_point().into(),
            max_point: bb.max_point().into(),
        }
    }
}
