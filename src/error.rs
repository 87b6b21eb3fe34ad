//! Error types for triangulation operations.

use thiserror::Error;

/// Result type alias using [`TriangulationError`].
pub type Result<T> = std::result::Result<T, TriangulationError>;

/// Errors that can occur while building or querying a triangulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriangulationError {
    /// The point is not covered by the enclosing triangle.
    #[error("point {index} lies outside the enclosing triangle")]
    OutOfBounds {
        /// Input index of the point.
        index: usize,
    },

    /// Three collinear points were found where a proper triangle was required.
    #[error("degenerate input: triangle corners are collinear")]
    DegenerateTriangle,

    /// The point coincides with a vertex already in the mesh.
    #[error("point {index} duplicates an existing vertex")]
    DuplicateInput {
        /// Input index of the point.
        index: usize,
    },

    /// Location returned a leaf count the split step cannot handle.
    #[error("point {index} was located in {count} triangles")]
    AmbiguousLocation {
        /// Input index of the point.
        index: usize,
        /// Number of leaf faces returned by location.
        count: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// A structural mesh invariant does not hold.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

impl TriangulationError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        TriangulationError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns true for errors the batch build skips instead of aborting on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TriangulationError::DuplicateInput { .. } | TriangulationError::DegenerateTriangle
        )
    }
}
