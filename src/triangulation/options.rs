//! Build options for the incremental triangulator.

use num_traits::Float;

use crate::error::{Result, TriangulationError};
use crate::primitives::Point2;

/// How the enclosing triangle is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuperTriangle<F> {
    /// Derived from the bounding box of the input, with corners at infinity.
    ///
    /// See [`Aabb2::enclosing_triangle`](crate::bounds::Aabb2::enclosing_triangle)
    /// for the construction. The corners are evaluated as points at infinity
    /// seen from the box center, so `margin` only sets their directions and
    /// every finite point lies inside. `margin` must be at least 2.
    Auto {
        /// Size of the triangle relative to the larger side of the input box.
        margin: F,
    },

    /// A caller-supplied triangle. Input points outside it fail with
    /// [`TriangulationError::OutOfBounds`]; input points equal to one of its
    /// corners take that corner over instead of being inserted.
    Fixed([Point2<F>; 3]),
}

/// Options for [`Triangulation::new`](super::Triangulation::new).
///
/// # Example
///
/// ```
/// use delaunum::triangulation::{DelaunayOptions, SuperTriangle};
/// use delaunum::Point2;
///
/// let options = DelaunayOptions::<f64>::default()
///     .with_eps(1e-9)
///     .with_super_triangle(SuperTriangle::Fixed([
///         Point2::new(-1.0, -1.0),
///         Point2::new(2049.0, -1.0),
///         Point2::new(-1.0, 2049.0),
///     ]));
///
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaunayOptions<F> {
    /// Tolerance shared by all predicates.
    ///
    /// Relative to the magnitude of the products in each orientation and
    /// circumcircle determinant. Point identity uses `eps` times the larger
    /// side of the input's bounding box as a distance. `0` gives plain
    /// floating-point sign tests.
    pub eps: F,

    /// Enclosing triangle selection.
    pub super_triangle: SuperTriangle<F>,
}

impl<F: Float> Default for DelaunayOptions<F> {
    fn default() -> Self {
        Self {
            eps: F::from(1e-12).unwrap_or_else(F::epsilon),
            super_triangle: SuperTriangle::Auto {
                margin: F::from(10.0).unwrap_or_else(|| F::one() + F::one()),
            },
        }
    }
}

impl<F: Float> DelaunayOptions<F> {
    /// Replaces the predicate tolerance.
    pub fn with_eps(mut self, eps: F) -> Self {
        self.eps = eps;
        self
    }

    /// Replaces the enclosing triangle selection.
    pub fn with_super_triangle(mut self, super_triangle: SuperTriangle<F>) -> Self {
        self.super_triangle = super_triangle;
        self
    }

    /// Checks that the options describe a usable configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps < F::zero() {
            return Err(TriangulationError::invalid_param(
                "eps",
                self.eps.to_f64().unwrap_or(f64::NAN),
                "must be finite and non-negative",
            ));
        }

        match self.super_triangle {
            SuperTriangle::Auto { margin } => {
                let two = F::one() + F::one();
                if !margin.is_finite() || margin < two {
                    return Err(TriangulationError::invalid_param(
                        "margin",
                        margin.to_f64().unwrap_or(f64::NAN),
                        "must be finite and at least 2",
                    ));
                }
            }
            SuperTriangle::Fixed(corners) => {
                if !corners.iter().all(|c| c.is_finite()) {
                    return Err(TriangulationError::invalid_param(
                        "super_triangle",
                        "Fixed",
                        "corners must be finite",
                    ));
                }
            }
        }

        Ok(())
    }
}
