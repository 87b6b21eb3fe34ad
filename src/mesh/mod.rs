//! Core mesh data structures.
//!
//! This module provides the half-edge (doubly-connected edge list)
//! representation the triangulator builds on.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Example
//!
//! ```
//! use delaunum::mesh::Mesh;
//! use delaunum::Point2;
//!
//! let mut mesh: Mesh<f64> = Mesh::new();
//! let a = mesh.add_vertex(Point2::new(0.0, 0.0), Some(0));
//! let b = mesh.add_vertex(Point2::new(1.0, 0.0), Some(1));
//! let c = mesh.add_vertex(Point2::new(0.0, 1.0), Some(2));
//!
//! let f = mesh.build_triangle(a, b, c);
//! assert_eq!(mesh.triangle_vertices(f), [a, b, c]);
//! assert!(mesh.is_leaf(f));
//! ```

mod halfedge;
mod index;

pub use halfedge::{Face, HalfEdge, Mesh, Vertex};
pub use index::{FaceId, HalfEdgeId, VertexId};
