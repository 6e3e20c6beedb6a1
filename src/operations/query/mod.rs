mod classify_point;

pub use classify_point::{classify_point, ClassifyPoint, PointClassification};
