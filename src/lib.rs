pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod raw;

pub use error::{ModelGeomError, Result};
pub use geometry::{
    BoundingBox3D, Colinearity, Line3D, Plane3D, Point3D, Transformation, Vector3D,
};
pub use math::{Radians, EPSILON};
pub use operations::query::{classify_point, ClassifyPoint, PointClassification};
