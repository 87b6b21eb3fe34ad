//! Orientation and circumcircle tests over mesh vertices.
//!
//! With automatic bounds the synthetic corners are points at infinity: the
//! corner stored at `c` stands for `origin + R * (c - origin)` in the limit
//! `R -> ∞`. Every test touching such a corner evaluates the leading
//! non-vanishing term of that limit instead of the determinant on the stored
//! coordinates. Triangles touching a corner then behave as if the corners
//! were arbitrarily far away, and the real triangles form the Delaunay
//! triangulation of the input alone, hull included.
//!
//! With fixed bounds every vertex is an ordinary point.

use num_traits::Float;

use crate::mesh::{FaceId, Mesh, VertexId};
use crate::primitives::{Point2, Vec2};
use crate::tolerance::{incircle, orient2d, CirclePosition, Orientation};

#[derive(Debug, Clone, Copy)]
enum Site<F> {
    Finite(Point2<F>),
    /// Direction of a corner at infinity, taken from the origin.
    Infinite(Vec2<F>),
}

impl<F> Site<F> {
    fn is_infinite(&self) -> bool {
        matches!(self, Site::Infinite(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Kernel<F> {
    eps: F,
    origin: Option<Point2<F>>,
}

impl<F: Float> Kernel<F> {
    /// All vertices are evaluated at their stored position.
    pub(crate) fn finite(eps: F) -> Self {
        Self { eps, origin: None }
    }

    /// Synthetic vertices are evaluated at infinity, in the direction of
    /// their stored position seen from `origin`.
    pub(crate) fn at_infinity(eps: F, origin: Point2<F>) -> Self {
        Self {
            eps,
            origin: Some(origin),
        }
    }

    pub(crate) fn eps(&self) -> F {
        self.eps
    }

    /// Returns true if the vertex is evaluated at its stored position.
    pub(crate) fn is_finite(&self, mesh: &Mesh<F>, v: VertexId) -> bool {
        !self.site(mesh, v).is_infinite()
    }

    fn site(&self, mesh: &Mesh<F>, v: VertexId) -> Site<F> {
        let vertex = mesh.vertex(v);
        match self.origin {
            Some(origin) if vertex.input.is_none() => Site::Infinite(vertex.position - origin),
            _ => Site::Finite(vertex.position),
        }
    }

    fn sites(&self, mesh: &Mesh<F>, vertices: [VertexId; 3]) -> [Site<F>; 3] {
        vertices.map(|v| self.site(mesh, v))
    }

    /// Orientation of the triangle `(a, b, point)`.
    pub(crate) fn orient(
        &self,
        mesh: &Mesh<F>,
        a: VertexId,
        b: VertexId,
        point: Point2<F>,
    ) -> Orientation {
        self.orient_sites([self.site(mesh, a), self.site(mesh, b), Site::Finite(point)])
    }

    /// Orientation of a triangle given by its vertices.
    pub(crate) fn orientation(&self, mesh: &Mesh<F>, vertices: [VertexId; 3]) -> Orientation {
        self.orient_sites(self.sites(mesh, vertices))
    }

    /// Closed containment of `point` in a face.
    pub(crate) fn contains(&self, mesh: &Mesh<F>, face: FaceId, point: Point2<F>) -> bool {
        let [a, b, c] = self.sites(mesh, mesh.triangle_vertices(face));
        let p = Site::Finite(point);
        let signs = [
            self.orient_sites([a, b, p]),
            self.orient_sites([b, c, p]),
            self.orient_sites([c, a, p]),
        ];

        let has_ccw = signs.contains(&Orientation::CounterClockwise);
        let has_cw = signs.contains(&Orientation::Clockwise);
        !(has_ccw && has_cw)
    }

    /// Position of `point` against the circumcircle of a counter-clockwise
    /// triangle.
    pub(crate) fn incircle(
        &self,
        mesh: &Mesh<F>,
        point: Point2<F>,
        vertices: [VertexId; 3],
    ) -> CirclePosition {
        let origin = self.origin.unwrap_or_else(Point2::origin);
        let eps = self.eps;

        match infinite_first(self.sites(mesh, vertices)) {
            [Site::Finite(a), Site::Finite(b), Site::Finite(c)] => incircle(point, [a, b, c], eps),

            // The circle through b, c and a far point tends to the half-plane
            // left of b -> c.
            [Site::Infinite(d), Site::Finite(b), Site::Finite(c)] => {
                let b = b - point;
                let c = c - point;
                let lead = [b.x * c.y, -(b.y * c.x)];
                if let Some(pos) = circle_sign(lead, eps) {
                    return pos;
                }

                let bb = b.magnitude_squared();
                let cc = c.magnitude_squared();
                let next = [
                    d.x * b.y * cc,
                    -(d.x * bb * c.y),
                    -(d.y * b.x * cc),
                    d.y * bb * c.x,
                ];
                circle_sign(next, eps).unwrap_or(CirclePosition::On)
            }

            // The circle through c and two far points tends to a half-plane
            // bounded by a line through c.
            [Site::Infinite(da), Site::Infinite(db), Site::Finite(c)] => {
                let c = c - point;
                let u = origin - point;
                let aa = da.magnitude_squared();
                let bb = db.magnitude_squared();

                let lead = [aa * db.cross(c), -(bb * da.cross(c))];
                if let Some(pos) = circle_sign(lead, eps) {
                    return pos;
                }

                let two = F::one() + F::one();
                let next = [
                    aa * u.cross(c),
                    -(bb * u.cross(c)),
                    two * da.dot(u) * db.cross(c),
                    -(two * db.dot(u) * da.cross(c)),
                    c.magnitude_squared() * da.cross(db),
                ];
                circle_sign(next, eps).unwrap_or(CirclePosition::On)
            }

            _ => CirclePosition::Outside,
        }
    }

    fn orient_sites(&self, sites: [Site<F>; 3]) -> Orientation {
        let origin = self.origin.unwrap_or_else(Point2::origin);
        let eps = self.eps;

        match infinite_first(sites) {
            [Site::Finite(a), Site::Finite(b), Site::Finite(c)] => orient2d(a, b, c, eps),

            // cross(b - o, c - o) + R * cross(d, b - c)
            [Site::Infinite(d), Site::Finite(b), Site::Finite(c)] => {
                let bc = b - c;
                match cross_sign(d, bc, eps) {
                    Orientation::Collinear => orient2d(origin, b, c, eps),
                    sign => sign,
                }
            }

            [Site::Infinite(da), Site::Infinite(db), Site::Finite(_)] => cross_sign(da, db, eps),

            [Site::Infinite(da), Site::Infinite(db), Site::Infinite(dc)] => {
                cross_sign(db - da, dc - da, eps)
            }

            _ => Orientation::Collinear,
        }
    }
}

/// Rotates the triangle so its infinite vertices come first, keeping the
/// cyclic order.
fn infinite_first<F: Copy>(sites: [Site<F>; 3]) -> [Site<F>; 3] {
    let [s0, s1, s2] = sites;
    let rotations = [[s0, s1, s2], [s1, s2, s0], [s2, s0, s1]];
    let is_prefix = |r: &[Site<F>; 3]| {
        !(!r[0].is_infinite() && r[1].is_infinite()) && !(!r[1].is_infinite() && r[2].is_infinite())
    };

    match rotations.iter().position(is_prefix) {
        Some(i) => rotations[i],
        None => sites,
    }
}

fn cross_sign<F: Float>(u: Vec2<F>, v: Vec2<F>, eps: F) -> Orientation {
    let left = u.x * v.y;
    let right = u.y * v.x;
    let cross = left - right;
    let bound = eps * (left.abs() + right.abs());

    if cross > bound {
        Orientation::CounterClockwise
    } else if cross < -bound {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Sign of a sum of products, `None` when it is within rounding of zero.
fn circle_sign<F: Float, const N: usize>(terms: [F; N], eps: F) -> Option<CirclePosition> {
    let sum = terms.iter().fold(F::zero(), |acc, &t| acc + t);
    let bound = eps * terms.iter().fold(F::zero(), |acc, &t| acc + t.abs());

    if sum > bound {
        Some(CirclePosition::Inside)
    } else if sum < -bound {
        Some(CirclePosition::Outside)
    } else {
        None
    }
}
