use crate::math::EPSILON;

use super::{Point3D, Vector3D};

/// An axis-aligned bounding box.
///
/// An empty box is `Option::<BoundingBox3D>::None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3D {
    min_point: Point3D,
    max_point: Point3D,
}

impl BoundingBox3D {
    /// Creates the box spanned by two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Point3D, b: Point3D) -> Self {
        Self {
            min_point: Point3D::new(a.x().min(b.x()), a.y().min(b.y()), a.z().min(b.z())),
            max_point: Point3D::new(a.x().max(b.x()), a.y().max(b.y()), a.z().max(b.z())),
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for point in iter {
            bounds.include(point);
        }
        Some(bounds)
    }

    #[must_use]
    pub fn min_point(&self) -> Point3D {
        self.min_point
    }

    #[must_use]
    pub fn max_point(&self) -> Point3D {
        self.max_point
    }

    #[must_use]
    pub fn center(&self) -> Point3D {
        self.min_point + self.diagonal() * 0.5
    }

    /// Vector from the minimum to the maximum corner.
    #[must_use]
    pub fn diagonal(&self) -> Vector3D {
        self.max_point - self.min_point
    }

    /// Returns `true` if `point` is inside or within `EPSILON` of the box.
    #[must_use]
    pub fn contains(&self, point: &Point3D) -> bool {
        let (lo, hi) = (self.min_point, self.max_point);
        point.x() > lo.x() - EPSILON
            && point.y() > lo.y() - EPSILON
            && point.z() > lo.z() - EPSILON
            && point.x() < hi.x() + EPSILON
            && point.y() < hi.y() + EPSILON
            && point.z() < hi.z() + EPSILON
    }

    /// Grows the box to contain `point`.
    pub fn include(&mut self, point: Point3D) {
        *self = Self::new(
            Point3D::new(
                self.min_point.x().min(point.x()),
                self.min_point.y().min(point.y()),
                self.min_point.z().min(point.z()),
            ),
            Point3D::new(
                self.max_point.x().max(point.x()),
                self.max_point.y().max(point.y()),
                self.max_point.z().max(point.z()),
            ),
        );
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = *self;
        merged.include(other.min_point);
        merged.include(other.max_point);
        merged
    }

    /// Returns `true` if the boxes overlap or touch within `EPSILON`.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_point.x() < other.max_point.x() + EPSILON
            && other.min_point.x() < self.max_point.x() + EPSILON
            && self.min_point.y() < other.max_point.y() + EPSILON
            && other.min_point.y() < self.max_point.y() + EPSILON
            && self.min_point.z() < other.max_point.z() + EPSILON
            && other.min_point.z() < self.max_point.z() + EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    #[test]
    fn corners_are_sorted() {
        let bb = BoundingBox3D::new(p(2.0, 0.0, 5.0), p(0.0, 3.0, 1.0));
        assert_eq!(bb.min_point(), p(0.0, 0.0, 1.0));
        assert_eq!(bb.max_point(), p(2.0, 3.0, 5.0));
        assert_eq!(bb.center(), p(1.0, 1.5, 3.0));
        assert_eq!(bb.diagonal(), Vector3D::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn from_points_and_empty() {
        assert_eq!(BoundingBox3D::from_points(Vec::new()), None);
        let bb = BoundingBox3D::from_points(vec![
            p(1.0, 1.0, 1.0),
            p(-1.0, 2.0, 0.0),
            p(0.0, 0.0, 4.0),
        ]);
        assert_eq!(bb, Some(BoundingBox3D::new(p(-1.0, 0.0, 0.0), p(1.0, 2.0, 4.0))));
    }

    #[test]
    fn containment_and_overlap() {
        let bb = BoundingBox3D::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        assert!(bb.contains(&p(0.5, 0.5, 0.5)));
        assert!(bb.contains(&p(1.0, 1.0, 1.0)));
        assert!(!bb.contains(&p(1.5, 0.5, 0.5)));

        let touching = BoundingBox3D::new(p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0));
        let apart = BoundingBox3D::new(p(3.0, 0.0, 0.0), p(4.0, 1.0, 1.0));
        assert!(bb.intersects(&touching));
        assert!(!bb.intersects(&apart));
        assert_eq!(bb.union(&apart), BoundingBox3D::new(p(0.0, 0.0, 0.0), p(4.0, 1.0, 1.0)));
    }
}
