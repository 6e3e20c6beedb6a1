mod radians;

pub use radians::Radians;

/// 3D point type used as backing storage.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type used as backing storage.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix (column-major storage).
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Default geometric tolerance, in model units (inches).
///
/// Matches the host SDK's internal working precision. Equality operators and
/// geometric predicates use this value; use [`approx::AbsDiffEq`] on the
/// kernel types to compare with a different tolerance.
pub const EPSILON: f64 = 1.0e-3;
