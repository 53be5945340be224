/// Greedy meshing: dense voxel grids in, merged face rectangles out
pub mod face;
pub mod greedy;

pub use face::{Face, FaceSide};
pub use greedy::GreedyMesher;
