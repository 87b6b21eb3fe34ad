//! Half-edge mesh with a face history.
//!
//! Every triangle ever created during a triangulation build is kept: a face
//! that has been split or flipped records the faces that replaced it in
//! `children`, and stays in the arena as a node of the point-location DAG.
//! Faces with no children are *leaves* and form the live triangulation.
//!
//! # Structure
//!
//! - Each triangular face owns three half-edges linked in a 3-cycle through
//!   `next` and `prev`
//! - Each half-edge knows its **origin** vertex and its **face**
//! - Each vertex stores one half-edge leaving it (any will do)
//!
//! Half-edges have no twin field. Faces come and go, so the mesh instead keeps
//! a map from each directed edge to the most recently created half-edge along
//! it. Two live faces never share a directed edge, so the latest entry is the
//! live one whenever a live one exists.

use std::collections::HashMap;

use num_traits::Float;

use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{Result, TriangulationError};
use crate::primitives::Point2;

/// A vertex of the mesh.
#[derive(Debug, Clone)]
pub struct Vertex<F> {
    /// Position in the plane.
    pub position: Point2<F>,

    /// One half-edge leaving this vertex. Invalid until a face uses it.
    pub halfedge: HalfEdgeId,

    /// Index of the input point this vertex was created from, or `None`
    /// for a synthetic corner of the enclosing triangle.
    pub input: Option<usize>,
}

/// A half-edge of a triangular face.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId,

    /// The face this half-edge belongs to.
    pub face: FaceId,
}

/// A triangular face and its place in the history DAG.
#[derive(Debug, Clone, Default)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId,

    /// Faces that replaced this one. Empty for live faces.
    pub children: Vec<FaceId>,

    /// Faces this one was created from. Empty only for the root.
    pub parents: Vec<FaceId>,
}

impl Face {
    /// Returns true if this face is part of the live triangulation.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Append-only arenas of vertices, half-edges and faces.
#[derive(Debug, Clone)]
pub struct Mesh<F> {
    pub(crate) vertices: Vec<Vertex<F>>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    edges: HashMap<(VertexId, VertexId), HalfEdgeId>,
}

impl<F: Float> Default for Mesh<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Mesh<F> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Create a mesh sized for roughly `num_points` insertions.
    pub fn with_capacity(num_points: usize) -> Self {
        // Each insertion adds 3 split faces plus a handful of flip faces.
        let num_faces = 1 + num_points * 9;
        Self {
            vertices: Vec::with_capacity(num_points + 3),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
            edges: HashMap::with_capacity(num_faces * 3),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces, historical ones included.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// All vertices, indexed by [`VertexId`].
    #[inline]
    pub fn vertices(&self) -> &[Vertex<F>] {
        &self.vertices
    }

    /// All half-edges, indexed by [`HalfEdgeId`].
    #[inline]
    pub fn halfedges(&self) -> &[HalfEdge] {
        &self.halfedges
    }

    /// All faces, indexed by [`FaceId`].
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex<F> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> Point2<F> {
        self.vertex(v).position
    }

    // ==================== Topology Queries ====================

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Returns true if the face has not been replaced.
    #[inline]
    pub fn is_leaf(&self, f: FaceId) -> bool {
        self.face(f).is_leaf()
    }

    /// The three vertices of a face in stored cyclic order.
    pub fn triangle_vertices(&self, f: FaceId) -> [VertexId; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// The positions of the three vertices of a face in stored cyclic order.
    pub fn triangle_points(&self, f: FaceId) -> [Point2<F>; 3] {
        let [v0, v1, v2] = self.triangle_vertices(f);
        [self.position(v0), self.position(v1), self.position(v2)]
    }

    /// The half-edge of face `f` leaving vertex `v`, if `v` is a corner of `f`.
    pub fn halfedge_from(&self, f: FaceId, v: VertexId) -> Option<HalfEdgeId> {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [he0, he1, he2].into_iter().find(|&he| self.origin(he) == v)
    }

    /// The live half-edge running `b -> a`, i.e. the neighbour across the
    /// directed edge `a -> b`.
    ///
    /// Returns `None` on the hull of the current triangulation.
    pub fn opposite_leaf(&self, a: VertexId, b: VertexId) -> Option<HalfEdgeId> {
        self.edges
            .get(&(b, a))
            .copied()
            .filter(|&he| self.is_leaf(self.face_of(he)))
    }

    /// Iterate over the IDs of all live faces.
    pub fn leaves(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_leaf())
            .map(|(i, _)| FaceId::new(i))
    }

    // ==================== Construction ====================

    /// Append a vertex that no face uses yet.
    pub fn add_vertex(&mut self, position: Point2<F>, input: Option<usize>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex {
            position,
            halfedge: HalfEdgeId::invalid(),
            input,
        });
        id
    }

    /// Allocate a triangular face `v1 -> v2 -> v3`.
    ///
    /// Creates three half-edges with origins `v1`, `v2`, `v3`, links them
    /// into a 3-cycle, creates the face and points each half-edge back at
    /// it. Each vertex's anchor is overwritten with its new outgoing
    /// half-edge. The face starts as a leaf with no parents.
    pub fn build_triangle(&mut self, v1: VertexId, v2: VertexId, v3: VertexId) -> FaceId {
        let face = FaceId::new(self.faces.len());
        let base = self.halfedges.len();
        let ids = [
            HalfEdgeId::new(base),
            HalfEdgeId::new(base + 1),
            HalfEdgeId::new(base + 2),
        ];
        let origins = [v1, v2, v3];

        for i in 0..3 {
            self.halfedges.push(HalfEdge {
                origin: origins[i],
                next: ids[(i + 1) % 3],
                prev: ids[(i + 2) % 3],
                face,
            });
            self.vertices[origins[i].index()].halfedge = ids[i];
            self.edges.insert((origins[i], origins[(i + 1) % 3]), ids[i]);
        }

        self.faces.push(Face {
            halfedge: ids[0],
            children: Vec::new(),
            parents: Vec::new(),
        });
        face
    }

    // ==================== Validation ====================

    /// Check the structural invariants of the mesh.
    ///
    /// - every half-edge closes a 3-cycle within a single face
    /// - every face's half-edge points back at the face
    /// - every vertex anchor leaves that vertex
    /// - parent and child links are mutual
    pub fn validate(&self) -> Result<()> {
        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::new(i);
            let n1 = he.next;
            let n2 = self.next(n1);
            if self.next(n2) != id {
                return Err(TriangulationError::InvalidMesh(format!(
                    "{:?} does not close a 3-cycle",
                    id
                )));
            }
            if self.prev(n1) != id {
                return Err(TriangulationError::InvalidMesh(format!(
                    "{:?}.next.prev is not {:?}",
                    id, id
                )));
            }
            if self.face_of(n1) != he.face || self.face_of(n2) != he.face {
                return Err(TriangulationError::InvalidMesh(format!(
                    "{:?} shares a cycle with half-edges of another face",
                    id
                )));
            }
        }

        for (i, face) in self.faces.iter().enumerate() {
            let id = FaceId::new(i);
            if self.face_of(face.halfedge) != id {
                return Err(TriangulationError::InvalidMesh(format!(
                    "{:?} is not the face of its own half-edge",
                    id
                )));
            }
            for &child in &face.children {
                if !self.face(child).parents.contains(&id) {
                    return Err(TriangulationError::InvalidMesh(format!(
                        "{:?} lists child {:?} which does not list it as parent",
                        id, child
                    )));
                }
            }
            for &parent in &face.parents {
                if !self.face(parent).children.contains(&id) {
                    return Err(TriangulationError::InvalidMesh(format!(
                        "{:?} lists parent {:?} which does not list it as child",
                        id, parent
                    )));
                }
            }
        }

        for (i, vertex) in self.vertices.iter().enumerate() {
            if vertex.halfedge.is_valid() && self.origin(vertex.halfedge).index() != i {
                return Err(TriangulationError::InvalidMesh(format!(
                    "anchor of {:?} does not leave it",
                    VertexId::new(i)
                )));
            }
        }

        Ok(())
    }
}
