//! Geometric predicates with explicit tolerance.

use crate::primitives::Point2;
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Position of a point relative to the circumcircle of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirclePosition {
    /// Strictly inside the circumcircle.
    Inside,
    /// On the circumcircle (within tolerance).
    On,
    /// Strictly outside the circumcircle.
    Outside,
}

/// Computes the orientation of three points with tolerance.
///
/// Returns the orientation of the triangle formed by points `a`, `b`, `c`:
/// - `CounterClockwise` if `c` is to the left of the line from `a` to `b`
/// - `Clockwise` if `c` is to the right of the line from `a` to `b`
/// - `Collinear` if `c` is on the line (within `eps` tolerance)
///
/// The test is based on the signed area of the triangle. `eps` is relative:
/// the cross product counts as zero when its magnitude does not exceed
/// `eps` times the sum of the magnitudes of its two products, so the answer
/// does not change when all coordinates are scaled.
///
/// # Example
///
/// ```
/// use delaunum::tolerance::{orient2d, Orientation};
/// use delaunum::Point2;
///
/// let s = 1e-7_f64;
/// let a = Point2::new(0.0, 0.0);
/// let b = Point2::new(s, 0.0);
///
/// assert_eq!(orient2d(a, b, Point2::new(0.5 * s, s), 1e-12), Orientation::CounterClockwise);
/// assert_eq!(orient2d(a, b, Point2::new(2.0 * s, 0.0), 1e-12), Orientation::Collinear);
/// ```
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let ab = b - a;
    let ac = c - a;
    let left = ab.x * ac.y;
    let right = ab.y * ac.x;

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

/// Returns true if `a`, `b`, `c` are collinear within `eps`.
#[inline]
pub fn is_degenerate_triangle<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> bool {
    orient2d(a, b, c, eps) == Orientation::Collinear
}

/// Closed point-in-triangle test.
///
/// Returns `true` when `p` is inside the triangle or on its boundary. The
/// triangle may be given in either winding. The three edge orientations are
/// computed and the point is rejected only when they disagree in polarity.
///
/// Degenerate triangles are not detected here; every point on their
/// supporting line would be accepted.
///
/// # Example
///
/// ```
/// use delaunum::tolerance::point_in_triangle;
/// use delaunum::Point2;
///
/// let tri = [Point2::new(0.0_f64, 0.0), Point2::new(4.0, 0.0), Point2::new(0.0, 4.0)];
///
/// assert!(point_in_triangle(Point2::new(1.0, 1.0), tri, 0.0));
/// assert!(point_in_triangle(Point2::new(2.0, 0.0), tri, 0.0)); // on an edge
/// assert!(!point_in_triangle(Point2::new(3.0, 3.0), tri, 0.0));
/// ```
pub fn point_in_triangle<F: Float>(p: Point2<F>, triangle: [Point2<F>; 3], eps: F) -> bool {
    let [a, b, c] = triangle;
    let signs = [
        orient2d(a, b, p, eps),
        orient2d(b, c, p, eps),
        orient2d(c, a, p, eps),
    ];

    let has_ccw = signs.contains(&Orientation::CounterClockwise);
    let has_cw = signs.contains(&Orientation::Clockwise);

    !(has_ccw && has_cw)
}

/// Reorders a triangle counter-clockwise.
///
/// Clockwise input has its first and last vertex swapped. Collinear input
/// is returned unchanged.
#[inline]
pub fn sort_ccw<F: Float>(triangle: [Point2<F>; 3]) -> [Point2<F>; 3] {
    let [a, b, c] = triangle;
    if (b - a).cross(c - a) < F::zero() {
        [c, b, a]
    } else {
        triangle
    }
}

/// Classifies `p` against the circumcircle of `triangle`.
///
/// The triangle is first put in counter-clockwise order, then the sign of
/// the lifted determinant
///
/// ```text
/// | ax-px  ay-py  (ax-px)²+(ay-py)² |
/// | bx-px  by-py  (bx-px)²+(by-py)² |
/// | cx-px  cy-py  (cx-px)²+(cy-py)² |
/// ```
///
/// decides the answer (positive means inside). `eps` is relative: the
/// determinant counts as zero when its magnitude does not exceed `eps` times
/// the permanent (the same expansion taken over absolute values), which
/// bounds the rounding error of the evaluation. `eps = 0` is the plain sign
/// test.
///
/// The triangle must not be degenerate.
pub fn incircle<F: Float>(p: Point2<F>, triangle: [Point2<F>; 3], eps: F) -> CirclePosition {
    let [a, b, c] = sort_ccw(triangle);

    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    let cx = c.x - p.x;
    let cy = c.y - p.y;

    let aa = ax * ax + ay * ay;
    let bb = bx * bx + by * by;
    let cc = cx * cx + cy * cy;

    let det = ax * (by * cc - cy * bb) - ay * (bx * cc - cx * bb) + aa * (bx * cy - cx * by);

    let permanent = ax.abs() * ((by * cc).abs() + (cy * bb).abs())
        + ay.abs() * ((bx * cc).abs() + (cx * bb).abs())
        + aa * ((bx * cy).abs() + (cx * by).abs());
    let bound = eps * permanent;

    if det > bound {
        CirclePosition::Inside
    } else if det < -bound {
        CirclePosition::Outside
    } else {
        CirclePosition::On
    }
}

/// Tests if a point lies inside or on the circumcircle of a triangle.
///
/// This is the inclusive form of [`incircle`]. Legalization flips only on a
/// strict [`CirclePosition::Inside`], so cocircular quadrilaterals keep their
/// current diagonal.
///
/// # Example
///
/// ```
/// use delaunum::tolerance::in_circumcircle;
/// use delaunum::Point2;
///
/// let tri = [Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
///
/// assert!(in_circumcircle(Point2::new(0.4, 0.4), tri, 0.0));
/// assert!(in_circumcircle(Point2::new(1.0, 1.0), tri, 0.0)); // cocircular
/// assert!(!in_circumcircle(Point2::new(10.0, 10.0), tri, 0.0));
/// ```
#[inline]
pub fn in_circumcircle<F: Float>(p: Point2<F>, triangle: [Point2<F>; 3], eps: F) -> bool {
    incircle(p, triangle, eps) != CirclePosition::Outside
}

/// Returns true if `(a, b)` is an edge of `triangle` seen from a point `p`
/// that is not one of its corners.
///
/// All three conditions must hold: both `a` and `b` are corners of the
/// triangle, `p` is none of them, and the triangle is not degenerate.
/// Corner identity uses [`Point2::coincides`] with `eps`.
pub fn is_adjacent_edge<F: Float>(
    p: Point2<F>,
    a: Point2<F>,
    b: Point2<F>,
    triangle: [Point2<F>; 3],
    eps: F,
) -> bool {
    let is_corner = |q: Point2<F>| triangle.iter().any(|&t| t.coincides(q, eps));

    is_corner(a)
        && is_corner(b)
        && !is_corner(p)
        && !is_degenerate_triangle(triangle[0], triangle[1], triangle[2], eps)
}
