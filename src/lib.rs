//! delaunum - Incremental Delaunay triangulation
//!
//! Points are inserted one at a time into a half-edge mesh, located through
//! the history of every triangle ever created, and legalized by edge flips.
//! Floating-point predicates take an explicit tolerance instead of relying
//! on exact arithmetic.
//!
//! # Example
//!
//! ```
//! use delaunum::{DelaunayOptions, Point2, Triangulation};
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//!
//! let tri = Triangulation::new(&points, DelaunayOptions::default()).unwrap();
//! assert_eq!(tri.triangles().len(), 2);
//! assert!(tri.is_delaunay());
//! ```

pub mod bounds;
pub mod error;
pub mod io;
pub mod mesh;
pub mod primitives;
pub mod tolerance;
pub mod triangulation;

pub use error::{Result, TriangulationError};
pub use primitives::{Point2, Vec2};
pub use tolerance::{incircle, orient2d, CirclePosition, Orientation};
pub use triangulation::{
    delaunay_triangulation, DelaunayOptions, SuperTriangle, Triangle, Triangulation,
};
