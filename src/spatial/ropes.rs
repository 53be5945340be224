/// Rope linking: after the tree shape is fixed, every node gains six
/// neighbor ids, one per face. Propagation pushes the parent's ropes down
/// with the facing side overridden to the sibling; shortening then walks
/// each rope to the tightest node still covering the whole face.
use super::tree::{Node, NodeId, NodeKind, Side};
use crate::count_call;
#[allow(unused_imports)]
use crate::perf::FUNCTION_COUNTERS;

pub(crate) fn link<B>(nodes: &mut [Node<B>], root: NodeId, initial: [Option<NodeId>; 6]) {
    propagate(nodes, root, initial);
    for id in 0..nodes.len() {
        shorten(nodes, id as NodeId);
    }
}

fn propagate<B>(nodes: &mut [Node<B>], root: NodeId, initial: [Option<NodeId>; 6]) {
    nodes[root as usize].ropes = initial;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let (axis, left, right) = match &nodes[id as usize].kind {
            NodeKind::Interior {
                axis, left, right, ..
            } => (*axis, *left, *right),
            NodeKind::Leaf(_) => continue,
        };
        let ropes = nodes[id as usize].ropes;

        // The child on the negative side of the plane sees its sibling
        // across its +axis face, and vice versa.
        let mut left_ropes = ropes;
        left_ropes[Side::positive(axis) as usize] = Some(right);
        nodes[left as usize].ropes = left_ropes;

        let mut right_ropes = ropes;
        right_ropes[Side::negative(axis) as usize] = Some(left);
        nodes[right as usize].ropes = right_ropes;

        stack.push(left);
        stack.push(right);
    }
}

/// +1 when the node's split plane is parallel to `side` and faces the same
/// way, -1 for the opposite face, 0 for a perpendicular split.
fn parallel_to(split_axis: usize, side: Side) -> i32 {
    if side.axis() != split_axis {
        0
    } else if side.is_positive() {
        1
    } else {
        -1
    }
}

fn shorten<B>(nodes: &mut [Node<B>], id: NodeId) {
    let bounds = nodes[id as usize].bounds;
    for side in Side::ALL {
        let Some(mut r) = nodes[id as usize].ropes[side as usize] else {
            continue;
        };
        count_call!(FUNCTION_COUNTERS.rope_walks);
        loop {
            let (axis, pos, left, right) = match &nodes[r as usize].kind {
                NodeKind::Interior {
                    axis,
                    pos,
                    left,
                    right,
                } => (*axis, *pos, *left, *right),
                NodeKind::Leaf(_) => break,
            };
            match parallel_to(axis, side) {
                1 => r = left,
                -1 => r = right,
                _ => {
                    // Perpendicular split: descend only while the plane
                    // clears this node's face entirely.
                    if pos < bounds.axis_min(axis) {
                        r = right;
                    } else if pos > bounds.axis_max(axis) {
                        r = left;
                    } else {
                        break;
                    }
                }
            }
        }
        nodes[id as usize].ropes[side as usize] = Some(r);
    }
}
