mod bounding_box;
mod line;
mod plane;
mod point;
mod transformation;
mod vector;

pub use bounding_box::BoundingBox3D;
pub use line::Line3D;
pub use plane::Plane3D;
pub use point::Point3D;
pub use transformation::Transformation;
pub use vector::{Colinearity, Vector3D};
