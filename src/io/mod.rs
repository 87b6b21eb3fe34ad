//! Output utilities for triangulations.
//!
//! Provides SVG serialization for viewing a triangulation in a browser.

mod svg;

pub use svg::{polyline_to_svg_path, triangle_to_svg_path, triangulation_to_svg};
