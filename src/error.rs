use thiserror::Error;

/// Top-level error type for the modelgeom kernel.
///
/// Every variant is a precondition violation: the caller passed an operand
/// the operation cannot work with. Geometric "no answer" outcomes (parallel
/// lines, disjoint segments) are reported as `None`, never as an error.
#[derive(Debug, Error)]
pub enum ModelGeomError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Errors raised by vector, point, line and plane operations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{operation}: division by near-zero value {divisor}")]
    DivisionByZero {
        operation: &'static str,
        divisor: f64,
    },

    #[error("{operation}: zero-length vector")]
    ZeroVector { operation: &'static str },

    #[error("{operation}: need at least {required} points, got {actual}")]
    InsufficientPoints {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{operation}: degenerate geometry: {reason}")]
    Degenerate {
        operation: &'static str,
        reason: String,
    },
}

/// Errors raised by [`Transformation`](crate::geometry::Transformation) operations.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{operation}: matrix is singular")]
    Singular { operation: &'static str },

    #[error("{operation}: homogeneous scale is zero")]
    ZeroHomogeneousScale { operation: &'static str },
}

/// Convenience type alias for results using [`ModelGeomError`].
pub type Result<T> = std::result::Result<T, ModelGeomError>;
