//! Epsilon-aware geometric predicates.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod predicates;

pub use predicates::{
    in_circumcircle, incircle, is_adjacent_edge, is_degenerate_triangle, orient2d,
    point_in_triangle, sort_ccw, CirclePosition, Orientation,
};
