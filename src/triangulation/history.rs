//! Point location through the triangle history.
//!
//! Every face that was split or flipped keeps links to the faces that
//! replaced it, which makes the set of all faces a DAG rooted at the
//! enclosing triangle. Children of a face exactly cover its triangle, so a
//! point can be located by descending from the root through every child that
//! contains it until live faces are reached.
//!
//! A flip consumes two faces and produces two, each linked under both
//! consumed faces. Nodes can therefore be reached along several paths; the
//! descent visits each node once.

use std::collections::HashSet;

use num_traits::Float;

use crate::mesh::{FaceId, Mesh};

/// Returns every live face whose closed triangle contains the query point.
///
/// `contains` is the closed containment test of the query against a face.
///
/// - empty: the point is outside the root triangle
/// - one face: the point is interior to a live triangle (or on a hull edge)
/// - two faces: the point is on the edge shared by two live triangles
/// - more: the point coincides with a vertex
///
/// The descent is iterative so deep histories cannot exhaust the call stack.
pub fn locate<F, P>(mesh: &Mesh<F>, root: FaceId, mut contains: P) -> Vec<FaceId>
where
    F: Float,
    P: FnMut(FaceId) -> bool,
{
    let mut leaves = Vec::new();
    if !contains(root) {
        return leaves;
    }

    let mut visited = HashSet::new();
    visited.insert(root);
    let mut stack = vec![root];

    while let Some(f) = stack.pop() {
        let face = mesh.face(f);
        if face.is_leaf() {
            leaves.push(f);
            continue;
        }

        // Reversed so children are explored in stored order.
        for &child in face.children.iter().rev() {
            if visited.insert(child) && contains(child) {
                stack.push(child);
            }
        }
    }

    leaves
}

/// Records `child` as one of the faces that replaced `parent`.
pub fn link_child<F: Float>(mesh: &mut Mesh<F>, parent: FaceId, child: FaceId) {
    mesh.face_mut(parent).children.push(child);
    mesh.face_mut(child).parents.push(parent);
}
