/// Spatial index for integer AABB primitives: a split-kd-tree whose leaves
/// are linked through ropes for O(1) neighbor traversal
pub mod bounds;
mod ropes;
pub mod tree;

pub use bounds::{Aabb, Boundable};
pub use tree::{KdTree, Leaf, Node, NodeId, NodeKind, Side, MAX_LEAF_VOXELS};
