/// Voxel geometry kernels: greedy face meshing and a roped kd-tree
/// spatial index. Everything upstream (model loading, palettes) and
/// downstream (GPU upload, rendering) lives in the consuming application.
pub mod meshing;
pub mod perf;
pub mod spatial;
pub mod voxel;

pub use meshing::{Face, FaceSide, GreedyMesher};
pub use perf::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
pub use spatial::{Aabb, Boundable, KdTree, Leaf, Node, NodeId, NodeKind, Side};
pub use voxel::{Voxel, VoxelGrid};
