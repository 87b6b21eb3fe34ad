//! Delaunay triangulation of point sets.
//!
//! [`Triangulation`] builds the triangulation incrementally inside an
//! enclosing super-triangle and keeps every replaced face in a history DAG
//! used for point location. [`delaunay_triangulation`] is the one-call
//! entry point returning index triples.

mod delaunay;
pub mod history;
mod kernel;
mod options;

pub use delaunay::{
    delaunay_triangulation, BuildStats, Triangle, Triangulation, TriangulationParts,
};
pub use options::{DelaunayOptions, SuperTriangle};
