use tracing::{debug, trace};

use crate::error::{GeometryError, Result};
use crate::geometry::{Line3D, Plane3D, Point3D, Vector3D};
use crate::math::EPSILON;

/// Where a point lies relative to a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    /// Strictly inside the loop.
    Inside,
    /// In the loop's plane but outside the loop.
    Outside,
    /// Coincides with a loop vertex.
    OnVertex,
    /// On a loop edge, away from its vertices.
    OnEdge,
    /// Not in the plane of the loop.
    NotOnPlane,
}

/// Classifies a point against a closed loop of coplanar points.
///
/// The loop is implicitly closed: the last point connects back to the first.
pub struct ClassifyPoint<'a> {
    points: &'a [Point3D],
    point: Point3D,
}

impl<'a> ClassifyPoint<'a> {
    /// Creates a new `ClassifyPoint` query.
    #[must_use]
    pub fn new(points: &'a [Point3D], point: Point3D) -> Self {
        Self { points, point }
    }

    /// Executes the query.
    ///
    /// Vertex and edge contact are checked first. Otherwise a ray is cast
    /// from the point within the loop's plane and its crossings with the
    /// loop are counted; an odd count means inside.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InsufficientPoints`] for fewer than 3 points and
    /// [`GeometryError::Degenerate`] if the points do not span a plane.
    pub fn execute(&self) -> Result<PointClassification> {
        let n = self.points.len();
        if n < 3 {
            return Err(GeometryError::InsufficientPoints {
                operation: "ClassifyPoint::execute",
                required: 3,
                actual: n,
            }
            .into());
        }
        let plane = Plane3D::plane_from_loop(self.points)?.ok_or_else(|| GeometryError::Degenerate {
            operation: "ClassifyPoint::execute",
            reason: "loop points do not span a plane".into(),
        })?;

        if !plane.on_plane(&self.point) {
            return Ok(PointClassification::NotOnPlane);
        }
        if self.points.iter().any(|vertex| *vertex == self.point) {
            return Ok(PointClassification::OnVertex);
        }

        let edges: Vec<(Point3D, Point3D)> = (0..n)
            .map(|i| (self.points[i], self.points[(i + 1) % n]))
            .filter(|(start, end)| start != end)
            .collect();

        for &(start, end) in &edges {
            if Line3D::on_line_segment(start, end, self.point)? {
                return Ok(PointClassification::OnEdge);
            }
        }

        let crossings = self.count_crossings(&edges, plane.normal())?;
        debug!(vertices = n, crossings, "ray cast against loop");

        if crossings % 2 == 1 {
            Ok(PointClassification::Inside)
        } else {
            Ok(PointClassification::Outside)
        }
    }

    /// Counts how often a ray from the point crosses the loop.
    ///
    /// The ray runs along the first edge's direction, so it stays in the
    /// loop's plane. Edges lying on the ray's line cannot be crossed and are
    /// dropped; the remaining edges keep their loop order. An edge whose
    /// endpoints sit on opposite sides of the ray's line is crossed where
    /// that line cuts it, even when it is nearly parallel to the ray. When the ray passes through a vertex, that vertex counts
    /// once if the loop passes from one side of the ray to the other there,
    /// and not at all if it only touches the ray.
    fn count_crossings(&self, edges: &[(Point3D, Point3D)], normal: Vector3D) -> Result<usize> {
        let (first_start, first_end) = edges[0];
        let ray = (first_end - first_start).unit()?;

        // Signed distance from the ray's line, measured within the plane.
        let side = |p: &Point3D| ray.cross(&(*p - self.point)).dot(&normal);
        let on_ray_line = |p: &Point3D| side(p).abs() < EPSILON;

        let kept: Vec<(Point3D, Point3D)> = edges
            .iter()
            .copied()
            .filter(|(start, end)| !(on_ray_line(start) && on_ray_line(end)))
            .collect();

        let mut crossings = 0;
        for (k, &(start, end)) in kept.iter().enumerate() {
            if on_ray_line(&end) {
                if (end - self.point).dot(&ray) > 0.0 {
                    let (_, after) = kept[(k + 1) % kept.len()];
                    if side(&start) * side(&after) < 0.0 {
                        trace!(x = end.x(), y = end.y(), z = end.z(), "ray crosses at vertex");
                        crossings += 1;
                    }
                }
                continue;
            }
            if on_ray_line(&start) {
                // Counted with the edge that ends at this vertex.
                continue;
            }

            let (side_start, side_end) = (side(&start), side(&end));
            if side_start * side_end > 0.0 {
                continue;
            }
            let hit = start + (end - start) * (side_start / (side_start - side_end));
            if (hit - self.point).dot(&ray) > 0.0 {
                trace!(x = hit.x(), y = hit.y(), z = hit.z(), "ray crosses edge");
                crossings += 1;
            }
        }
        Ok(crossings)
    }
}

/// Classifies `point` against the closed loop `points`.
///
/// # Errors
///
/// See [`ClassifyPoint::execute`].
pub fn classify_point(points: &[Point3D], point: Point3D) -> Result<PointClassification> {
    ClassifyPoint::new(points, point).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Transformation;
    use crate::math::Radians;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    fn unit_square() -> Vec<Point3D> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    fn classify(points: &[Point3D], point: Point3D) -> PointClassification {
        classify_point(points, point).unwrap()
    }

    // ── unit square ──

    #[test]
    fn square_inside() {
        assert_eq!(classify(&unit_square(), p(0.5, 0.5, 0.0)), PointClassification::Inside);
    }

    #[test]
    fn square_vertex() {
        assert_eq!(classify(&unit_square(), p(0.0, 0.0, 0.0)), PointClassification::OnVertex);
        assert_eq!(classify(&unit_square(), p(1.0, 1.0, 0.0)), PointClassification::OnVertex);
    }

    #[test]
    fn square_edge() {
        assert_eq!(classify(&unit_square(), p(0.5, 0.0, 0.0)), PointClassification::OnEdge);
        assert_eq!(classify(&unit_square(), p(0.0, 0.3, 0.0)), PointClassification::OnEdge);
    }

    #[test]
    fn square_outside() {
        assert_eq!(classify(&unit_square(), p(2.0, 2.0, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&unit_square(), p(-0.5, 0.5, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&unit_square(), p(2.0, 0.0, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn square_off_plane() {
        assert_eq!(classify(&unit_square(), p(0.5, 0.5, 1.0)), PointClassification::NotOnPlane);
    }

    #[test]
    fn clockwise_square_matches() {
        let mut points = unit_square();
        points.reverse();
        assert_eq!(classify(&points, p(0.5, 0.5, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&points, p(1.5, 0.5, 0.0)), PointClassification::Outside);
    }

    // ── vertex handling ──

    #[test]
    fn ray_through_convex_vertex_counts_once() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(6.0, 2.0, 0.0),
            p(4.0, 4.0, 0.0),
            p(0.0, 4.0, 0.0),
        ];
        assert_eq!(classify(&points, p(2.0, 2.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&points, p(-1.0, 2.0, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn ray_touching_notch_vertex_does_not_count() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(4.0, 4.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 4.0, 0.0),
        ];
        assert_eq!(classify(&points, p(1.0, 2.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&points, p(-1.0, 2.0, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&points, p(2.0, 3.0, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn ray_along_edge_is_filtered() {
        let l_shape = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(4.0, 2.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(2.0, 4.0, 0.0),
            p(0.0, 4.0, 0.0),
        ];
        assert_eq!(classify(&l_shape, p(1.0, 2.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&l_shape, p(-1.0, 2.0, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&l_shape, p(3.0, 3.0, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&l_shape, p(3.0, 2.0, 0.0)), PointClassification::OnEdge);
    }

    // ── edges nearly parallel to the ray ──

    #[test]
    fn near_parallel_edge_is_still_crossed() {
        let quad = vec![
            p(0.0, 0.0, 0.0),
            p(100.0, 0.0, 0.0),
            p(100.0, 10.0, 0.0),
            p(0.0, 10.05, 0.0),
        ];
        assert_eq!(classify(&quad, p(10.0, 10.02, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&quad, p(10.0, 10.06, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn sliver_with_every_edge_near_the_ray() {
        let sliver = vec![p(0.0, 0.0, 0.0), p(10000.0, 0.0, 0.0), p(20000.0, 5.0, 0.0)];
        assert_eq!(classify(&sliver, p(10000.0, 1.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&sliver, p(10000.0, 3.0, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn small_loop_classifies() {
        let square = vec![
            p(0.0, 0.0, 0.0),
            p(0.02, 0.0, 0.0),
            p(0.02, 0.02, 0.0),
            p(0.0, 0.02, 0.0),
        ];
        assert_eq!(classify(&square, p(0.01, 0.01, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&square, p(0.03, 0.01, 0.0)), PointClassification::Outside);
    }

    // ── general loops ──

    #[test]
    fn concave_u_shape() {
        let u_shape = vec![
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(2.0, 3.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ];
        assert_eq!(classify(&u_shape, p(0.5, 2.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&u_shape, p(1.5, 2.0, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&u_shape, p(1.5, 0.5, 0.0)), PointClassification::Inside);
    }

    #[test]
    fn tilted_loop_in_space() {
        let t = Transformation::from_translation(crate::geometry::Vector3D::new(5.0, -3.0, 2.0))
            * Transformation::rotation(crate::geometry::Vector3D::new(1.0, 1.0, 0.0), Radians::new(0.8))
                .unwrap();
        let points: Vec<Point3D> = unit_square().into_iter().map(|pt| t * pt).collect();
        assert_eq!(classify(&points, t * p(0.25, 0.75, 0.0)), PointClassification::Inside);
        assert_eq!(classify(&points, t * p(1.25, 0.75, 0.0)), PointClassification::Outside);
        assert_eq!(classify(&points, t * p(1.0, 0.5, 0.0)), PointClassification::OnEdge);
        assert_eq!(classify(&points, t * p(0.5, 0.5, 0.5)), PointClassification::NotOnPlane);
    }

    #[test]
    fn duplicate_leading_vertex_is_tolerated() {
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ];
        assert_eq!(classify(&points, p(0.5, 0.5, 0.0)), PointClassification::Inside);
    }

    // ── preconditions ──

    #[test]
    fn too_few_points_fail() {
        assert!(classify_point(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)], p(0.5, 0.0, 0.0)).is_err());
    }

    #[test]
    fn colinear_loop_fails() {
        let points = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert!(classify_point(&points, p(0.5, 0.0, 0.0)).is_err());
    }
}
