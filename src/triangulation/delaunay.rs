//! Delaunay triangulation by incremental insertion and edge flips.
//!
//! Delaunay triangulation maximizes the minimum angle of all triangles,
//! avoiding skinny triangles when possible. It has the property that no
//! point lies inside the circumcircle of any triangle.
//!
//! # Algorithm
//!
//! 1. Start with a super-triangle containing all points. With automatic
//!    bounds its corners are treated as points at infinity, so triangles
//!    touching them never hide a hull edge of the input
//! 2. For each point, locate the live triangle(s) containing it through the
//!    history DAG (see [`history`](super::history))
//! 3. Split them around the point: one triangle becomes three, or, for a
//!    point on a shared edge, two triangles become four
//! 4. Flip edges opposite the new point while it lies inside the
//!    circumcircle of the triangle across them
//! 5. Report the triangles not connected to the super-triangle vertices
//!
//! Nothing is ever deleted. Split and flipped triangles stay in the mesh as
//! interior nodes of the location DAG.
//!
//! # Complexity
//!
//! - Time: O(n log n) expected for points in random order, O(n²) worst case
//! - Space: O(n) expected
//!
//! # Example
//!
//! ```
//! use delaunum::triangulation::delaunay_triangulation;
//! use delaunum::Point2;
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//!     Point2::new(0.5, 0.3),
//! ];
//!
//! let triangles = delaunay_triangulation(&points);
//!
//! // 2n - h - 2 with n = 4 points, h = 3 on the hull
//! assert_eq!(triangles.len(), 3);
//!
//! // Each triangle has 3 vertex indices
//! for tri in &triangles {
//!     assert!(tri.a < points.len());
//!     assert!(tri.b < points.len());
//!     assert!(tri.c < points.len());
//! }
//! ```

use num_traits::Float;

use super::history::{link_child, locate};
use super::kernel::Kernel;
use super::options::{DelaunayOptions, SuperTriangle};
use crate::bounds::Aabb2;
use crate::error::{Result, TriangulationError};
use crate::mesh::{Face, FaceId, HalfEdge, Mesh, Vertex, VertexId};
use crate::primitives::Point2;
use crate::tolerance::{
    incircle, is_adjacent_edge, is_degenerate_triangle, sort_ccw, CirclePosition, Orientation,
};

/// A triangle represented by indices into a point array.
///
/// Vertices are stored in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
}

impl Triangle {
    /// Creates a new triangle from vertex indices.
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    /// Returns the three edges of this triangle as pairs of indices.
    #[inline]
    pub fn edges(&self) -> [(usize, usize); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Checks if the triangle contains a specific vertex index.
    #[inline]
    pub fn contains_vertex(&self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }
}

/// Counters collected while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Points that became new vertices.
    pub inserted: usize,
    /// Points skipped because they coincide with an existing vertex.
    pub duplicates: usize,
    /// Live faces replaced by a split.
    pub split_faces: usize,
    /// Edge flips performed.
    pub flips: usize,
    /// Flip candidates skipped because a triangle was degenerate.
    pub degenerate_skips: usize,
}

/// Everything a triangulation build produced.
///
/// `faces` is the whole history DAG. Only faces with no children are part of
/// the final triangulation, and of those only the ones not touching a
/// `synthetic` vertex are real triangles.
#[derive(Debug, Clone)]
pub struct TriangulationParts<F> {
    /// All vertices, synthetic corners included.
    pub vertices: Vec<Vertex<F>>,
    /// All half-edges ever created.
    pub halfedges: Vec<HalfEdge>,
    /// All faces ever created.
    pub faces: Vec<Face>,
    /// Corners of the enclosing triangle that are not input points.
    pub synthetic: Vec<VertexId>,
}

/// An incrementally built Delaunay triangulation.
///
/// With [`SuperTriangle::Auto`] the three corners are evaluated as points at
/// infinity in the direction of their stored position, so the real triangles
/// are exactly the Delaunay triangulation of the inserted points and any
/// finite point can be inserted later. With fixed corners every vertex is an
/// ordinary point and the corners bound what can be inserted.
///
/// # Example
///
/// ```
/// use delaunum::triangulation::{DelaunayOptions, Triangulation};
/// use delaunum::Point2;
///
/// // Square with center point
/// let points: Vec<Point2<f64>> = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.5, 0.5),
/// ];
///
/// let tri = Triangulation::new(&points, DelaunayOptions::default()).unwrap();
///
/// assert_eq!(tri.triangles().len(), 4);
/// assert_eq!(tri.synthetic_vertices().len(), 3);
/// assert!(tri.is_delaunay());
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation<F> {
    mesh: Mesh<F>,
    root: FaceId,
    synthetic: Vec<VertexId>,
    kernel: Kernel<F>,
    eps: F,
    /// Coincidence distance, `eps` scaled by the extent of the input.
    tolerance: F,
    offered: usize,
    stats: BuildStats,
}

impl<F: Float> Triangulation<F> {
    /// Triangulates `points` in the given order.
    ///
    /// Points that coincide with an earlier point (within `options.eps`
    /// times the larger side of the input's bounding box) are skipped and
    /// counted in [`BuildStats::duplicates`]. Any other insertion failure
    /// aborts the build, since a partially built mesh is not a valid
    /// triangulation.
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::InvalidParameter`] for bad options or
    ///   non-finite coordinates
    /// - [`TriangulationError::DegenerateTriangle`] for a collinear fixed
    ///   super-triangle
    /// - [`TriangulationError::OutOfBounds`] for a point outside a fixed
    ///   super-triangle
    /// - [`TriangulationError::AmbiguousLocation`] when location breaks down
    pub fn new(points: &[Point2<F>], options: DelaunayOptions<F>) -> Result<Self> {
        options.validate()?;

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(TriangulationError::invalid_param(
                "points",
                index,
                "coordinates must be finite",
            ));
        }

        let eps = options.eps;
        let bounds = Aabb2::from_points(points.iter().copied())
            .unwrap_or_else(|| Aabb2::from_point(Point2::origin()));
        let (corners, kernel) = match options.super_triangle {
            SuperTriangle::Auto { margin } => (
                bounds.enclosing_triangle(margin),
                Kernel::at_infinity(eps, bounds.center()),
            ),
            SuperTriangle::Fixed(corners) => (corners, Kernel::finite(eps)),
        };

        let mesh = Mesh::with_capacity(points.len());
        let mut tri = Self::start(corners, kernel, eps * extent(bounds), mesh)?;

        for &p in points {
            match tri.insert(p) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {
                    log::debug!("skipping point {:?}: {}", coords(p), e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "triangulated {} points: {} inserted, {} duplicates, {} flips, {} live faces of {}",
            points.len(),
            tri.stats.inserted,
            tri.stats.duplicates,
            tri.stats.flips,
            tri.mesh.leaves().count(),
            tri.mesh.num_faces(),
        );

        Ok(tri)
    }

    /// Starts an empty triangulation covering `corners`.
    ///
    /// The corners are finite points stored counter-clockwise. They all
    /// count as synthetic until an inserted point coincides with one of them.
    /// Coincidence is measured against `eps` times the larger side of the
    /// corners' bounding box.
    ///
    /// # Errors
    ///
    /// [`TriangulationError::DegenerateTriangle`] if the corners are collinear.
    pub fn with_super_triangle(corners: [Point2<F>; 3], eps: F) -> Result<Self> {
        let bounds = Aabb2::from_points(corners).unwrap_or_else(|| Aabb2::from_point(corners[0]));
        Self::start(corners, Kernel::finite(eps), eps * extent(bounds), Mesh::new())
    }

    fn start(
        corners: [Point2<F>; 3],
        kernel: Kernel<F>,
        tolerance: F,
        mut mesh: Mesh<F>,
    ) -> Result<Self> {
        let eps = kernel.eps();
        let [a, b, c] = sort_ccw(corners);
        if is_degenerate_triangle(a, b, c, eps) {
            return Err(TriangulationError::DegenerateTriangle);
        }

        let synthetic = vec![
            mesh.add_vertex(a, None),
            mesh.add_vertex(b, None),
            mesh.add_vertex(c, None),
        ];
        let root = mesh.build_triangle(synthetic[0], synthetic[1], synthetic[2]);

        Ok(Self {
            mesh,
            root,
            synthetic,
            kernel,
            eps,
            tolerance,
            offered: 0,
            stats: BuildStats::default(),
        })
    }

    /// Inserts one point and restores the Delaunay property.
    ///
    /// The point gets the next input index (the number of points offered so
    /// far, failed ones included).
    ///
    /// With fixed corners, a point equal to a synthetic corner takes that
    /// corner over: the corner's vertex is returned and triangles touching it
    /// become real. Corners at infinity are never taken over.
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::OutOfBounds`] if the point is outside a fixed
    ///   super-triangle; nothing is modified
    /// - [`TriangulationError::DuplicateInput`] if the point coincides with
    ///   a vertex; nothing is modified
    /// - [`TriangulationError::AmbiguousLocation`] if more than two live
    ///   triangles claim the point
    pub fn insert(&mut self, point: Point2<F>) -> Result<VertexId> {
        let index = self.offered;
        self.offered += 1;

        let mut located = self.locate(point);
        if located.is_empty() {
            return Err(TriangulationError::OutOfBounds { index });
        }

        if let Some(existing) = self.coinciding_vertex(&located, point) {
            if let Some(pos) = self.synthetic.iter().position(|&v| v == existing) {
                self.synthetic.remove(pos);
                self.mesh.vertices[existing.index()].input = Some(index);
                log::debug!("point {} takes over corner {:?}", index, existing);
                return Ok(existing);
            }
            self.stats.duplicates += 1;
            return Err(TriangulationError::DuplicateInput { index });
        }

        self.complete_edge_neighbours(&mut located, point);
        if located.len() > 2 {
            return Err(TriangulationError::AmbiguousLocation {
                index,
                count: located.len(),
            });
        }

        let v = self.mesh.add_vertex(point, Some(index));
        let candidates = self.split(&located, v);
        self.legalize(v, candidates);
        self.stats.inserted += 1;

        Ok(v)
    }

    /// Returns a vertex of the located faces that coincides with `point`.
    fn coinciding_vertex(&self, located: &[FaceId], point: Point2<F>) -> Option<VertexId> {
        located
            .iter()
            .flat_map(|&f| self.mesh.triangle_vertices(f))
            .filter(|&v| self.kernel.is_finite(&self.mesh, v))
            .find(|&v| self.mesh.position(v).coincides(point, self.tolerance))
    }

    /// Makes sure both faces of an edge the point lies on are located.
    ///
    /// Location uses the closed containment test on each face separately, so
    /// rounding can accept a point on one side of an edge and reject it on
    /// the other. Splitting only one side would leave a T-junction.
    fn complete_edge_neighbours(&self, located: &mut Vec<FaceId>, point: Point2<F>) {
        let mut i = 0;
        while i < located.len() {
            let [v1, v2, v3] = self.mesh.triangle_vertices(located[i]);
            for (a, b) in [(v1, v2), (v2, v3), (v3, v1)] {
                if !self.on_edge(a, b, point) {
                    continue;
                }
                if let Some(he) = self.mesh.opposite_leaf(a, b) {
                    let neighbour = self.mesh.face_of(he);
                    if !located.contains(&neighbour) {
                        log::trace!("point on edge {:?}-{:?}, adding {:?}", a, b, neighbour);
                        located.push(neighbour);
                    }
                }
            }
            i += 1;
        }
    }

    /// Collinearity of `point` with edge `a`-`b`, evaluated the same way from
    /// both faces sharing the edge.
    fn on_edge(&self, a: VertexId, b: VertexId, point: Point2<F>) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.kernel.orient(&self.mesh, lo, hi, point) == Orientation::Collinear
    }

    /// Replaces each located face `(v1, v2, v3)` with `(v1, v2, p)`,
    /// `(v2, v3, p)` and `(v3, v1, p)`, leaving out the sub-triangle on an
    /// edge that contains `p`. Returns the new faces as flip candidates.
    fn split(&mut self, located: &[FaceId], p: VertexId) -> Vec<FaceId> {
        let point = self.mesh.position(p);
        let mut candidates = Vec::with_capacity(3 * located.len());

        for &face in located {
            let [v1, v2, v3] = self.mesh.triangle_vertices(face);
            for (a, b) in [(v1, v2), (v2, v3), (v3, v1)] {
                if self.on_edge(a, b, point) {
                    continue;
                }
                let child = self.mesh.build_triangle(a, b, p);
                link_child(&mut self.mesh, face, child);
                candidates.push(child);
            }
            self.stats.split_faces += 1;
        }

        log::trace!(
            "split {} face(s) around {:?} into {}",
            located.len(),
            p,
            candidates.len()
        );
        candidates
    }

    /// Flips edges opposite `p` until every candidate is locally Delaunay.
    ///
    /// Candidates are processed last-in first-out. Each candidate has `p` as
    /// a corner; the edge across from `p` is checked against the live face
    /// on its other side. When `p` is strictly inside that face's
    /// circumcircle the shared edge is replaced by the other diagonal of the
    /// quadrilateral, and the two new faces become candidates themselves.
    fn legalize(&mut self, p: VertexId, mut candidates: Vec<FaceId>) {
        let point = self.mesh.position(p);

        while let Some(t) = candidates.pop() {
            if !self.mesh.is_leaf(t) {
                continue;
            }
            let Some(he_p) = self.mesh.halfedge_from(t, p) else {
                continue;
            };

            let he_opposite = self.mesh.next(he_p);
            let e1 = self.mesh.origin(he_opposite);
            let e2 = self.mesh.dest(he_opposite);

            // No live face across: the edge is on the hull.
            let Some(twin) = self.mesh.opposite_leaf(e1, e2) else {
                continue;
            };
            let u = self.mesh.face_of(twin);
            let q = self.mesh.origin(self.mesh.prev(twin));
            let u_vertices = [e2, e1, q];

            if self.is_collinear([p, e1, e2])
                || self.is_collinear(u_vertices)
                || !self.is_finite_neighbour(point, u_vertices)
            {
                self.skip_degenerate(t, u);
                continue;
            }

            if self.kernel.incircle(&self.mesh, point, u_vertices) != CirclePosition::Inside {
                continue;
            }

            let ccw = Orientation::CounterClockwise;
            if self.kernel.orientation(&self.mesh, [p, e1, q]) != ccw
                || self.kernel.orientation(&self.mesh, [p, q, e2]) != ccw
            {
                self.skip_degenerate(t, u);
                continue;
            }

            let f1 = self.mesh.build_triangle(p, e1, q);
            let f2 = self.mesh.build_triangle(p, q, e2);
            for parent in [t, u] {
                link_child(&mut self.mesh, parent, f1);
                link_child(&mut self.mesh, parent, f2);
            }
            log::trace!("flip {:?}-{:?} to {:?}-{:?}", e1, e2, p, q);

            candidates.push(f2);
            candidates.push(f1);
            self.stats.flips += 1;
        }
    }

    fn is_collinear(&self, vertices: [VertexId; 3]) -> bool {
        self.kernel.orientation(&self.mesh, vertices) == Orientation::Collinear
    }

    /// Geometric check of the neighbour across `u_vertices[0]`-`u_vertices[1]`
    /// when all of its corners are finite points.
    fn is_finite_neighbour(&self, point: Point2<F>, u_vertices: [VertexId; 3]) -> bool {
        if !u_vertices.iter().all(|&v| self.kernel.is_finite(&self.mesh, v)) {
            return true;
        }
        let [e2, e1, q] = u_vertices.map(|v| self.mesh.position(v));
        is_adjacent_edge(point, e1, e2, [e2, e1, q], self.eps)
    }

    fn skip_degenerate(&mut self, t: FaceId, u: FaceId) {
        log::debug!(
            "skipping flip between {:?} and {:?}: {}",
            t,
            u,
            TriangulationError::DegenerateTriangle
        );
        self.stats.degenerate_skips += 1;
    }

    // ==================== Queries ====================

    /// The underlying mesh, history included.
    #[inline]
    pub fn mesh(&self) -> &Mesh<F> {
        &self.mesh
    }

    /// The root of the history DAG (the super-triangle face).
    #[inline]
    pub fn root(&self) -> FaceId {
        self.root
    }

    /// Corners of the super-triangle that are not input points.
    #[inline]
    pub fn synthetic_vertices(&self) -> &[VertexId] {
        &self.synthetic
    }

    /// The tolerance the triangulation was built with.
    #[inline]
    pub fn eps(&self) -> F {
        self.eps
    }

    /// Counters collected so far.
    #[inline]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Live faces whose closed triangle contains `point`.
    ///
    /// See [`locate`] for the meaning of the result size.
    pub fn locate(&self, point: Point2<F>) -> Vec<FaceId> {
        locate(&self.mesh, self.root, |f| self.kernel.contains(&self.mesh, f, point))
    }

    /// Returns true if the face touches a synthetic super-triangle vertex.
    pub fn is_enclosing(&self, face: FaceId) -> bool {
        self.mesh
            .triangle_vertices(face)
            .iter()
            .any(|v| self.synthetic.contains(v))
    }

    /// Every live face, phantom ones included.
    pub fn live_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.mesh.leaves()
    }

    /// Live faces that do not touch a synthetic vertex.
    pub fn real_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.mesh.leaves().filter(move |&f| !self.is_enclosing(f))
    }

    /// The triangulation as counter-clockwise triples of input indices.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.real_faces()
            .filter_map(|f| {
                let [a, b, c] = self.mesh.triangle_vertices(f);
                Some(Triangle::new(
                    self.mesh.vertex(a).input?,
                    self.mesh.vertex(b).input?,
                    self.mesh.vertex(c).input?,
                ))
            })
            .collect()
    }

    /// Checks the empty-circumcircle property of every real triangle against
    /// every real vertex.
    ///
    /// Points on a circumcircle (within tolerance) are accepted. This is
    /// quadratic and meant for validation.
    pub fn is_delaunay(&self) -> bool {
        let vertices: Vec<VertexId> = (0..self.mesh.num_vertices())
            .map(VertexId::new)
            .filter(|v| !self.synthetic.contains(v))
            .collect();

        self.real_faces().all(|f| {
            let corners = self.mesh.triangle_vertices(f);
            let points = self.mesh.triangle_points(f);
            vertices
                .iter()
                .filter(|v| !corners.contains(*v))
                .all(|&v| {
                    incircle(self.mesh.position(v), points, self.eps) != CirclePosition::Inside
                })
        })
    }

    /// Checks the structural invariants of the underlying mesh.
    pub fn validate(&self) -> Result<()> {
        self.mesh.validate()
    }

    /// Splits the triangulation into its raw arenas.
    pub fn into_parts(self) -> TriangulationParts<F> {
        TriangulationParts {
            vertices: self.mesh.vertices,
            halfedges: self.mesh.halfedges,
            faces: self.mesh.faces,
            synthetic: self.synthetic,
        }
    }
}

/// Larger side of the box, or one for a point-sized box.
fn extent<F: Float>(bounds: Aabb2<F>) -> F {
    let side = bounds.width().max(bounds.height());
    if side > F::zero() {
        side
    } else {
        F::one()
    }
}

fn coords<F: Float>(p: Point2<F>) -> (f64, f64) {
    (
        p.x.to_f64().unwrap_or(f64::NAN),
        p.y.to_f64().unwrap_or(f64::NAN),
    )
}

/// Computes the Delaunay triangulation of a set of points.
///
/// Uses incremental insertion with edge flips and default
/// [`DelaunayOptions`].
///
/// # Arguments
///
/// * `points` - The points to triangulate
///
/// # Returns
///
/// A vector of triangles. Each triangle contains indices into the input points array.
/// Triangles are in counter-clockwise orientation. Duplicate points are
/// skipped, so an index may not appear in any triangle.
///
/// Returns an empty vector if fewer than 3 points are provided or the build
/// fails (the failure is logged).
///
/// # Example
///
/// ```
/// use delaunum::triangulation::delaunay_triangulation;
/// use delaunum::Point2;
///
/// // Square with center point
/// let points: Vec<Point2<f64>> = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(0.5, 0.5),
/// ];
///
/// let triangles = delaunay_triangulation(&points);
///
/// // Square with center point should produce 4 triangles
/// assert_eq!(triangles.len(), 4);
/// ```
pub fn delaunay_triangulation<F: Float>(points: &[Point2<F>]) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    match Triangulation::new(points, DelaunayOptions::default()) {
        Ok(tri) => tri.triangles(),
        Err(e) => {
            log::warn!("delaunay triangulation failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::{orient2d, Orientation};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    /// Right triangle covering the box from (-1, -1) to (1024, 1024).
    fn viewer_box() -> [Point2<f64>; 3] {
        [
            Point2::new(-1.0, -1.0),
            Point2::new(2049.0, -1.0),
            Point2::new(-1.0, 2049.0),
        ]
    }

    fn random_like() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.1, 0.2),
            Point2::new(0.8, 0.1),
            Point2::new(0.9, 0.9),
            Point2::new(0.2, 0.85),
            Point2::new(0.5, 0.5),
            Point2::new(0.3, 0.3),
            Point2::new(0.7, 0.6),
            Point2::new(0.4, 0.8),
        ]
    }

    fn build(points: &[Point2<f64>]) -> Triangulation<f64> {
        Triangulation::new(points, DelaunayOptions::default()).unwrap()
    }

    /// Builds inside finite corners placed like the automatic ones.
    fn build_finite(points: &[Point2<f64>]) -> Triangulation<f64> {
        let corners = Aabb2::from_points(points.iter().copied())
            .unwrap()
            .enclosing_triangle(10.0);
        let mut tri = Triangulation::with_super_triangle(corners, 1e-12).unwrap();
        for &p in points {
            tri.insert(p).unwrap();
        }
        tri
    }

    /// Uniform points in `[offset, offset + scale)²` from a xorshift stream.
    fn random_points(count: usize, seed: u64, scale: f64, offset: f64) -> Vec<Point2<f64>> {
        let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        (0..count)
            .map(|_| {
                let x = next();
                let y = next();
                Point2::new(offset + scale * x, offset + scale * y)
            })
            .collect()
    }

    /// Number of strict convex hull vertices by Andrew's monotone chain.
    fn hull_size(points: &[Point2<f64>]) -> usize {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        sorted.dedup();
        if sorted.len() < 3 {
            return sorted.len();
        }

        let chain = |iter: &mut dyn Iterator<Item = Point2<f64>>| {
            let mut chain: Vec<Point2<f64>> = Vec::new();
            for p in iter {
                while chain.len() >= 2 {
                    let a = chain[chain.len() - 2];
                    let b = chain[chain.len() - 1];
                    if (b - a).cross(p - a) > 0.0 {
                        break;
                    }
                    chain.pop();
                }
                chain.push(p);
            }
            chain.len() - 1
        };

        chain(&mut sorted.iter().copied()) + chain(&mut sorted.iter().rev().copied())
    }

    fn assert_complete(points: &[Point2<f64>], tri: &Triangulation<f64>, label: &str) {
        let n = points.len();
        let h = hull_size(points);
        assert_eq!(tri.triangles().len(), 2 * n - h - 2, "{}: triangle count", label);
        assert!(tri.is_delaunay(), "{}: not Delaunay", label);
        assert!(tri.validate().is_ok(), "{}: invalid mesh", label);
    }

    fn signed_area(points: [Point2<f64>; 3]) -> f64 {
        let [a, b, c] = points;
        0.5 * (b - a).cross(c - a)
    }

    fn assert_delaunay(points: &[Point2<f64>], triangles: &[Triangle]) {
        for tri in triangles {
            let corners = [points[tri.a], points[tri.b], points[tri.c]];
            for (i, &p) in points.iter().enumerate() {
                if !tri.contains_vertex(i) {
                    assert_ne!(
                        incircle(p, corners, 1e-12),
                        CirclePosition::Inside,
                        "Point {} is inside circumcircle of triangle ({}, {}, {})",
                        i,
                        tri.a,
                        tri.b,
                        tri.c
                    );
                }
            }
        }
    }

    #[test]
    fn test_triangle_helpers() {
        let tri = Triangle::new(0, 1, 2);
        assert_eq!(tri.edges(), [(0, 1), (1, 2), (2, 0)]);
        assert!(tri.contains_vertex(2));
        assert!(!tri.contains_vertex(3));
    }

    #[test]
    fn test_delaunay_too_few_points() {
        let empty: Vec<Point2<f64>> = vec![];
        assert!(delaunay_triangulation(&empty).is_empty());
        assert!(delaunay_triangulation(&[Point2::new(0.0_f64, 0.0)]).is_empty());
        assert!(
            delaunay_triangulation(&[Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)]).is_empty()
        );
    }

    #[test]
    fn test_empty_input_keeps_root() {
        let tri = build(&[]);
        assert_eq!(tri.live_faces().collect::<Vec<_>>(), vec![tri.root()]);
        assert!(tri.is_enclosing(tri.root()));
        assert!(tri.triangles().is_empty());
    }

    #[test]
    fn test_delaunay_three_points() {
        let points = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let triangles = delaunay_triangulation(&points);
        assert_eq!(triangles.len(), 1);

        let tri = triangles[0];
        let mut indices = vec![tri.a, tri.b, tri.c];
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2]);

        // Counter-clockwise output.
        assert_eq!(
            orient2d(points[tri.a], points[tri.b], points[tri.c], 0.0),
            Orientation::CounterClockwise
        );
    }

    #[test]
    fn test_unit_square() {
        let points = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let tri = build(&points);
        let triangles = tri.triangles();
        assert_eq!(triangles.len(), 2);

        // The two triangles share exactly one diagonal.
        let shared: Vec<usize> = (0..4)
            .filter(|&v| triangles[0].contains_vertex(v) && triangles[1].contains_vertex(v))
            .collect();
        assert_eq!(shared.len(), 2);
        assert_eq!((shared[1] - shared[0]) % 2, 0, "shared edge must be a diagonal");

        // The fourth corner is cocircular with each triangle: legal, no flip.
        for t in &triangles {
            let fourth = (0..4).find(|&v| !t.contains_vertex(v)).unwrap();
            let corners = [points[t.a], points[t.b], points[t.c]];
            assert_eq!(incircle(points[fourth], corners, 0.0), CirclePosition::On);
        }
        assert!(tri.is_delaunay());
    }

    #[test]
    fn test_square_with_center() {
        let points = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.5),
        ];
        let triangles = delaunay_triangulation(&points);
        assert_eq!(triangles.len(), 4);
        assert!(triangles.iter().all(|t| t.contains_vertex(4)));
    }

    #[test]
    fn test_collinear_points_form_no_triangle() {
        let points = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let tri = build(&points);
        assert!(tri.triangles().is_empty());

        // No degenerate face was ever created.
        for f in 0..tri.mesh().num_faces() {
            let vertices = tri.mesh().triangle_vertices(FaceId::new(f));
            assert_ne!(tri.kernel.orientation(tri.mesh(), vertices), Orientation::Collinear);
        }

        let tri = build_finite(&points);
        assert!(tri.triangles().is_empty());
        for f in 0..tri.mesh().num_faces() {
            let [a, b, c] = tri.mesh().triangle_points(FaceId::new(f));
            assert!(!is_degenerate_triangle(a, b, c, 0.0));
        }
    }

    #[test]
    fn test_triangle_count_general_position() {
        // Hull: (0.1, 0.2), (0.8, 0.1), (0.9, 0.9), (0.2, 0.85)
        let points = random_like();
        let triangles = delaunay_triangulation(&points);
        let n = points.len();
        let h = 4;
        assert_eq!(triangles.len(), 2 * n - h - 2);
    }

    #[test]
    fn test_delaunay_property_random_like() {
        let points = random_like();
        let tri = build(&points);
        assert!(tri.is_delaunay());
        assert_delaunay(&points, &tri.triangles());
        assert!(tri.stats().flips > 0);
    }

    #[test]
    fn test_delaunay_grid() {
        let mut points: Vec<Point2<f64>> = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                points.push(Point2::new(i as f64, j as f64));
            }
        }

        let triangles = delaunay_triangulation(&points);

        // 3x3 squares, each split into 2 triangles
        assert_eq!(triangles.len(), 18);
        assert_delaunay(&points, &triangles);
    }

    #[test]
    fn test_delaunay_covers_all_points() {
        let points = random_like();
        let triangles = delaunay_triangulation(&points);

        let used: HashSet<usize> = triangles
            .iter()
            .flat_map(|t| [t.a, t.b, t.c])
            .collect();
        for i in 0..points.len() {
            assert!(used.contains(&i), "Point {} not used in triangulation", i);
        }
    }

    #[test]
    fn test_partition_holds_after_every_insertion() {
        let points = random_like();
        let corners = Aabb2::from_points(points.iter().copied())
            .unwrap()
            .enclosing_triangle(10.0);
        let mut tri = Triangulation::with_super_triangle(corners, 1e-12).unwrap();
        let total = signed_area(tri.mesh().triangle_points(tri.root()));

        for &p in &points {
            tri.insert(p).unwrap();

            let mut sum = 0.0;
            for f in tri.live_faces() {
                let area = signed_area(tri.mesh().triangle_points(f));
                assert!(area > 0.0, "live face {:?} is not counter-clockwise", f);
                sum += area;
            }
            assert_relative_eq!(sum, total, max_relative = 1e-9);
            assert!(tri.validate().is_ok());
        }
    }

    #[test]
    fn test_every_face_is_ccw() {
        let tri = build(&random_like());
        for f in 0..tri.mesh().num_faces() {
            let vertices = tri.mesh().triangle_vertices(FaceId::new(f));
            assert_eq!(
                tri.kernel.orientation(tri.mesh(), vertices),
                Orientation::CounterClockwise
            );
        }

        let tri = build_finite(&random_like());
        for f in 0..tri.mesh().num_faces() {
            let [a, b, c] = tri.mesh().triangle_points(FaceId::new(f));
            assert_eq!(orient2d(a, b, c, 0.0), Orientation::CounterClockwise);
        }
    }

    #[test]
    fn test_locate_vertex_returns_incident_leaf() {
        let tri = build(&random_like());
        for (i, vertex) in tri.mesh().vertices().iter().enumerate() {
            if vertex.input.is_none() {
                continue;
            }
            let v = VertexId::new(i);
            let found = tri.locate(vertex.position);
            assert!(!found.is_empty());
            assert!(found
                .iter()
                .all(|&f| tri.mesh().triangle_vertices(f).contains(&v)));
        }
    }

    #[test]
    fn test_neighbour_lookup_matches_linear_scan() {
        let tri = build_finite(&random_like());
        let mesh = tri.mesh();
        let eps = tri.eps();

        for t in tri.live_faces() {
            let [v1, v2, v3] = mesh.triangle_vertices(t);
            for (a, b, opposite) in [(v1, v2, v3), (v2, v3, v1), (v3, v1, v2)] {
                let pa = mesh.position(a);
                let pb = mesh.position(b);
                let apex = mesh.position(opposite);

                let scanned: Vec<FaceId> = tri
                    .live_faces()
                    .filter(|&f| is_adjacent_edge(apex, pa, pb, mesh.triangle_points(f), eps))
                    .collect();
                let looked_up = mesh.opposite_leaf(a, b).map(|he| mesh.face_of(he));

                assert!(scanned.len() <= 1);
                assert_eq!(looked_up, scanned.first().copied());
            }
        }
    }

    #[test]
    fn test_flip_faces_have_two_parents() {
        let tri = build(&random_like());
        let merged = tri
            .mesh()
            .faces()
            .iter()
            .filter(|f| f.parents.len() == 2)
            .count();
        assert_eq!(merged, 2 * tri.stats().flips);
        assert!(tri.mesh().face(tri.root()).parents.is_empty());
    }

    #[test]
    fn test_point_on_shared_edge_splits_both() {
        let mut tri = Triangulation::with_super_triangle(viewer_box(), 1e-12).unwrap();
        for p in [
            Point2::new(100.0, 100.0),
            Point2::new(104.0, 100.0),
            Point2::new(102.0, 102.0),
            Point2::new(102.0, 99.0),
        ] {
            tri.insert(p).unwrap();
        }

        // (102, 99) is inside the circle of the first three, so the diagonal
        // joins (102, 102) and (102, 99).
        let on_edge = Point2::new(102.0, 100.5);
        let located = tri.locate(on_edge);
        assert_eq!(located.len(), 2);

        let before = tri.stats().split_faces;
        tri.insert(on_edge).unwrap();
        assert_eq!(tri.stats().split_faces, before + 2);

        let split_children: usize = located
            .iter()
            .map(|&f| {
                tri.mesh()
                    .face(f)
                    .children
                    .iter()
                    .filter(|&&c| tri.mesh().face(c).parents.len() == 1)
                    .count()
            })
            .sum();
        assert_eq!(split_children, 4);
        assert!(tri.is_delaunay());
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut points = random_like();
        points.push(points[3]);
        points.insert(2, points[0]);

        let tri = build(&points);
        assert_eq!(tri.stats().duplicates, 2);
        assert_eq!(tri.stats().inserted, points.len() - 2);
        assert_eq!(tri.triangles().len(), 10);
        assert!(tri.triangles().iter().all(|t| !t.contains_vertex(2)));
    }

    #[test]
    fn test_insert_duplicate_reports_error() {
        let mut tri = Triangulation::with_super_triangle(viewer_box(), 0.0).unwrap();
        tri.insert(Point2::new(5.0, 5.0)).unwrap();
        assert_eq!(
            tri.insert(Point2::new(5.0, 5.0)),
            Err(TriangulationError::DuplicateInput { index: 1 })
        );
        assert_eq!(tri.mesh().num_vertices(), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let options =
            DelaunayOptions::default().with_super_triangle(SuperTriangle::Fixed(viewer_box()));
        let points = vec![
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 10.0),
            Point2::new(3000.0, 3000.0),
        ];
        assert_eq!(
            Triangulation::new(&points, options).unwrap_err(),
            TriangulationError::OutOfBounds { index: 2 }
        );

        // Auto bounds cover the same input.
        assert_eq!(delaunay_triangulation(&points).len(), 1);
    }

    #[test]
    fn test_corner_takeover() {
        let options =
            DelaunayOptions::default().with_super_triangle(SuperTriangle::Fixed(viewer_box()));
        let points = vec![
            Point2::new(-1.0, -1.0),
            Point2::new(100.0, 50.0),
            Point2::new(50.0, 100.0),
        ];
        let tri = Triangulation::new(&points, options).unwrap();

        assert_eq!(tri.synthetic_vertices().len(), 2);
        assert_eq!(tri.mesh().num_vertices(), 5);
        assert_eq!(tri.triangles().len(), 1);
        assert!(tri.triangles()[0].contains_vertex(0));
    }

    #[test]
    fn test_degenerate_fixed_triangle() {
        let options = DelaunayOptions::default().with_super_triangle(SuperTriangle::Fixed([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ]));
        assert_eq!(
            Triangulation::new(&random_like(), options).unwrap_err(),
            TriangulationError::DegenerateTriangle
        );
    }

    #[test]
    fn test_non_finite_input() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)];
        assert!(matches!(
            Triangulation::new(&points, DelaunayOptions::default()),
            Err(TriangulationError::InvalidParameter { name: "points", .. })
        ));
    }

    #[test]
    fn test_into_parts() {
        let points = random_like();
        let tri = build(&points);
        let num_faces = tri.mesh().num_faces();
        let parts = tri.into_parts();

        assert_eq!(parts.vertices.len(), points.len() + 3);
        assert_eq!(parts.halfedges.len(), 3 * num_faces);
        assert_eq!(parts.faces.len(), num_faces);
        assert_eq!(parts.synthetic.len(), 3);
        assert!(parts.synthetic.iter().all(|v| parts.vertices[v.index()].input.is_none()));
    }

    #[test]
    fn test_delaunay_f32() {
        let points: Vec<Point2<f32>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let triangles = delaunay_triangulation(&points);
        assert_eq!(triangles.len(), 1);
    }

    #[test]
    fn test_circle_points() {
        // Cocircular input: any fan is Delaunay, count is still 2n - h - 2.
        let n = 12;
        let points: Vec<Point2<f64>> = (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                Point2::new(10.0 * angle.cos(), 10.0 * angle.sin())
            })
            .collect();
        let tri = build(&points);
        assert_eq!(tri.triangles().len(), n - 2);
        assert!(tri.is_delaunay());
    }

    #[test]
    fn test_triangle_count_matches_hull_on_random_sets() {
        for count in [100, 300] {
            for seed in 1..=12 {
                let points = random_points(count, seed, 1.0, 0.0);
                let tri = build(&points);
                assert_complete(&points, &tri, &format!("{} points, seed {}", count, seed));
                assert_eq!(tri.stats().inserted, count);
            }
        }
    }

    #[test]
    fn test_random_sets_at_every_scale() {
        for (scale, offset) in [(1e-7, 0.0), (1.0, 0.0), (1e7, 0.0), (1e3, 1e7)] {
            for seed in [3, 17, 42] {
                let points = random_points(200, seed, scale, offset);
                let tri = build(&points);
                let label = format!("scale {:e}, offset {:e}, seed {}", scale, offset, seed);
                assert_complete(&points, &tri, &label);
                assert_delaunay(&points, &tri.triangles());
            }
        }
    }

    #[test]
    fn test_square_with_center_at_extreme_scales() {
        for scale in [1e-7, 1e7] {
            let unit = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.5)];
            let points: Vec<Point2<f64>> = unit
                .iter()
                .map(|&(x, y)| Point2::new(x * scale, y * scale))
                .collect();

            let tri = build(&points);
            assert_eq!(tri.stats().duplicates, 0, "scale {:e}", scale);
            let triangles = tri.triangles();
            assert_eq!(triangles.len(), 4, "scale {:e}", scale);
            assert!(triangles.iter().all(|t| t.contains_vertex(4)));
        }
    }

    #[test]
    fn test_partition_holds_on_random_sets() {
        for scale in [1e-7, 1.0, 1e7] {
            let points = random_points(100, 7, scale, 0.0);
            let tri = build_finite(&points);
            let total = signed_area(tri.mesh().triangle_points(tri.root()));

            let mut sum = 0.0;
            for f in tri.live_faces() {
                let area = signed_area(tri.mesh().triangle_points(f));
                assert!(area > 0.0, "scale {:e}: face {:?} is not counter-clockwise", scale, f);
                sum += area;
            }
            assert_relative_eq!(sum, total, max_relative = 1e-9);
            assert!(tri.validate().is_ok());
        }
    }

    #[test]
    fn test_insert_far_outside_initial_bounds() {
        let mut points = random_like();
        let mut tri = build(&points);

        for p in [Point2::new(1e4, -1e4), Point2::new(-50.0, 3.0)] {
            tri.insert(p).unwrap();
            points.push(p);
        }
        assert_complete(&points, &tri, "far points");
    }
}
