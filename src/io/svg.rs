//! SVG export.
//!
//! Renders the real triangles of a [`Triangulation`] as outlined paths inside
//! a standalone `<svg>` document. The view box is the bounding box of the
//! input vertices grown by the stroke width, so phantom triangles and the
//! far-away super-triangle corners do not shrink the drawing.
//!
//! # Example
//!
//! ```
//! use delaunum::io::triangulation_to_svg;
//! use delaunum::{DelaunayOptions, Point2, Triangulation};
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(5.0, 8.0),
//! ];
//! let tri = Triangulation::new(&points, DelaunayOptions::default()).unwrap();
//!
//! let svg = triangulation_to_svg(&tri, 0.1);
//! assert!(svg.starts_with("<svg"));
//! assert_eq!(svg.matches("<path").count(), 1);
//! ```

use std::fmt::{self, Write};

use num_traits::Float;

use crate::bounds::Aabb2;
use crate::primitives::Point2;
use crate::triangulation::Triangulation;

/// Converts a polyline to an SVG path string.
///
/// # Returns
///
/// An SVG path string using M and L commands.
///
/// # Example
///
/// ```
/// use delaunum::{Point2, io::polyline_to_svg_path};
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
/// ];
///
/// let svg = polyline_to_svg_path(&points, true);
/// assert!(svg.starts_with("M"));
/// assert!(svg.ends_with("Z"));
/// ```
pub fn polyline_to_svg_path<F: Float + fmt::Display>(points: &[Point2<F>], closed: bool) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };

    let mut result = format!("M {} {}", first.x, first.y);
    for p in rest {
        // Writing into a String cannot fail.
        let _ = write!(result, " L {} {}", p.x, p.y);
    }

    if closed {
        result.push_str(" Z");
    }

    result
}

/// Converts a triangle to a closed SVG path string.
pub fn triangle_to_svg_path<F: Float + fmt::Display>(triangle: [Point2<F>; 3]) -> String {
    polyline_to_svg_path(&triangle, true)
}

/// Renders the real triangles of `tri` as an SVG document.
///
/// Each triangle becomes one `<path>` with no fill and the given stroke
/// width. A triangulation with no input vertices yields an empty document
/// with a zero-sized view box.
pub fn triangulation_to_svg<F: Float + fmt::Display>(
    tri: &Triangulation<F>,
    stroke_width: F,
) -> String {
    let mesh = tri.mesh();
    let bounds = Aabb2::from_points(
        mesh.vertices()
            .iter()
            .filter(|v| v.input.is_some())
            .map(|v| v.position),
    );

    let mut out = String::new();
    match bounds {
        Some(b) => {
            let _ = writeln!(
                out,
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
                b.min.x - stroke_width,
                b.min.y - stroke_width,
                b.width() + stroke_width + stroke_width,
                b.height() + stroke_width + stroke_width,
            );
        }
        None => {
            out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 0 0">"#);
            out.push('\n');
        }
    }

    for f in tri.real_faces() {
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="none" stroke="black" stroke-width="{}"/>"#,
            triangle_to_svg_path(mesh.triangle_points(f)),
            stroke_width,
        );
    }

    out.push_str("</svg>\n");
    out
}
