/// Dense voxel grid with a one-cell empty border on every side.
/// The pad keeps neighbor lookups branch-free: reads at -1 or `dim` land on
/// a zero cell, which is what drives emission of outer-hull faces.
use super::Voxel;
use crate::spatial::Side;
use noise::{NoiseFn, Perlin};

/// Cell value 0 is empty; any other value is an opaque material id.
pub struct VoxelGrid {
    dims: [usize; 3],
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// Allocate an all-empty grid of `dx * dy * dz` interior cells.
    /// Extents must be 1..=256 per axis.
    pub fn new(dx: usize, dy: usize, dz: usize) -> Self {
        assert!((1..=256).contains(&dx), "dx must be in 1..=256, got {dx}");
        assert!((1..=256).contains(&dy), "dy must be in 1..=256, got {dy}");
        assert!((1..=256).contains(&dz), "dz must be in 1..=256, got {dz}");
        Self {
            dims: [dx, dy, dz],
            cells: vec![0; (dx + 2) * (dy + 2) * (dz + 2)],
        }
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Index into the padded array; accepts -1..=dim on each axis.
    #[inline]
    fn cell_index(&self, x: i32, y: i32, z: i32) -> usize {
        let [dx, dy, _] = self.dims;
        debug_assert!(x >= -1 && x <= self.dims[0] as i32);
        debug_assert!(y >= -1 && y <= self.dims[1] as i32);
        debug_assert!(z >= -1 && z <= self.dims[2] as i32);
        (x + 1) as usize + (dx + 2) * ((y + 1) as usize + (dy + 2) * (z + 1) as usize)
    }

    /// Material at an interior cell, or 0 when the padded border is read.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u8 {
        self.cells[self.cell_index(x, y, z)]
    }

    /// Write an interior cell. The pad itself is not writable.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, material: u8) {
        debug_assert!(x < self.dims[0] && y < self.dims[1] && z < self.dims[2]);
        let idx = self.cell_index(x as i32, y as i32, z as i32);
        self.cells[idx] = material;
    }

    /// The raw padded array the mesher consumes, strides
    /// `x+1 + (dx+2)*(y+1 + (dy+2)*(z+1))`.
    #[inline]
    pub fn padded_cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn solid_count(&self) -> usize {
        let [dx, dy, dz] = self.dims;
        let mut n = 0;
        for z in 0..dz {
            for y in 0..dy {
                for x in 0..dx {
                    if self.get(x as i32, y as i32, z as i32) != 0 {
                        n += 1;
                    }
                }
            }
        }
        n
    }

    /// Perlin heightmap fill for realistic test and bench inputs.
    /// Materials: 1 at the surface, 2 just below, 3 deeper down.
    pub fn terrain(dx: usize, dy: usize, dz: usize, seed: u32) -> Self {
        let mut grid = Self::new(dx, dy, dz);
        let perlin = Perlin::new(seed);
        let scale = 0.05;

        for z in 0..dz {
            for x in 0..dx {
                let noise_value = perlin.get([x as f64 * scale, z as f64 * scale]);
                let height =
                    ((dy as f64 * 0.5) + noise_value * (dy as f64 * 0.35)).round() as i32;
                let height = height.clamp(1, dy as i32);
                for y in 0..height {
                    let material = if y == height - 1 {
                        1
                    } else if y >= height - 3 {
                        2
                    } else {
                        3
                    };
                    grid.set(x, y as usize, z, material);
                }
            }
        }
        grid
    }

    /// Convert occupied cells to kd-tree primitives. Each voxel carries a
    /// `sides` bitmask (bit = `Side` index) of faces adjacent to empty
    /// space; fully-enclosed cells are skipped since no face of theirs is
    /// ever visible.
    pub fn collect_voxels(&self) -> Vec<Voxel> {
        let [dx, dy, dz] = self.dims;
        let mut voxels = Vec::new();
        for z in 0..dz as i32 {
            for y in 0..dy as i32 {
                for x in 0..dx as i32 {
                    let material = self.get(x, y, z);
                    if material == 0 {
                        continue;
                    }
                    let mut sides = 0u8;
                    if self.get(x + 1, y, z) == 0 {
                        sides |= 1 << Side::PosX as u8;
                    }
                    if self.get(x - 1, y, z) == 0 {
                        sides |= 1 << Side::NegX as u8;
                    }
                    if self.get(x, y + 1, z) == 0 {
                        sides |= 1 << Side::PosY as u8;
                    }
                    if self.get(x, y - 1, z) == 0 {
                        sides |= 1 << Side::NegY as u8;
                    }
                    if self.get(x, y, z + 1) == 0 {
                        sides |= 1 << Side::PosZ as u8;
                    }
                    if self.get(x, y, z - 1) == 0 {
                        sides |= 1 << Side::NegZ as u8;
                    }
                    if sides == 0 {
                        continue;
                    }
                    voxels
                        .push(Voxel::unit(x as u8, y as u8, z as u8, material).with_sides(sides));
                }
            }
        }
        voxels
    }
}
