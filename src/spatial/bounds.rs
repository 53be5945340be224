/// Integer bounds and the primitive contract shared by the kd-tree builder
/// and everything stored inside it
use glam::{IVec3, Vec3};

/// Capability set for primitives the kd-tree can partition.
///
/// Bounds are integer with an exclusive upper bound per axis. Split
/// operations return fresh primitives whose union covers the original;
/// the builder asserts that each half stays on its side of the plane.
pub trait Boundable: Clone {
    fn min(&self, axis: usize) -> i32;
    fn max(&self, axis: usize) -> i32;

    /// Overlap test against a float box. Closed comparisons on both sides;
    /// callers pass exclusive-upper-bound floats when they want them.
    fn intersects(&self, min: Vec3, max: Vec3) -> bool;

    fn split_left(&self, axis: usize, pos: i32) -> Self;
    fn split_right(&self, axis: usize, pos: i32) -> Self;
}

/// Integer axis-aligned bounding box with exclusive upper corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb {
    pub min: IVec3,
    pub max: IVec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that unions into anything.
    pub const fn empty() -> Self {
        Self {
            min: IVec3::splat(i32::MAX),
            max: IVec3::splat(i32::MIN),
        }
    }

    /// Componentwise union over a primitive set. Root bounds of a build.
    pub fn from_primitives<B: Boundable>(prims: &[B]) -> Self {
        let mut b = Self::empty();
        for p in prims {
            for axis in 0..3 {
                b.min[axis] = b.min[axis].min(p.min(axis));
                b.max[axis] = b.max[axis].max(p.max(axis));
            }
        }
        b
    }

    #[inline]
    pub fn axis_min(&self, axis: usize) -> i32 {
        self.min[axis]
    }

    #[inline]
    pub fn axis_max(&self, axis: usize) -> i32 {
        self.max[axis]
    }

    #[inline]
    pub fn set_axis_min(&mut self, axis: usize, v: i32) {
        self.min[axis] = v;
    }

    #[inline]
    pub fn set_axis_max(&mut self, axis: usize, v: i32) {
        self.max[axis] = v;
    }

    #[inline]
    pub fn extent(&self, axis: usize) -> i32 {
        self.max[axis] - self.min[axis]
    }

    /// Closed containment test for point location.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x as f32
            && p.y >= self.min.y as f32
            && p.z >= self.min.z as f32
            && p.x <= self.max.x as f32
            && p.y <= self.max.y as f32
            && p.z <= self.max.z as f32
    }

    /// Overlap test against a float box, closed on both sides.
    #[inline]
    pub fn intersects_box(&self, min: Vec3, max: Vec3) -> bool {
        self.max.x as f32 >= min.x
            && self.max.y as f32 >= min.y
            && self.max.z as f32 >= min.z
            && self.min.x as f32 <= max.x
            && self.min.y as f32 <= max.y
            && self.min.z as f32 <= max.z
    }
}

impl Boundable for Aabb {
    #[inline]
    fn min(&self, axis: usize) -> i32 {
        self.min[axis]
    }

    #[inline]
    fn max(&self, axis: usize) -> i32 {
        self.max[axis]
    }

    #[inline]
    fn intersects(&self, min: Vec3, max: Vec3) -> bool {
        self.intersects_box(min, max)
    }

    fn split_left(&self, _axis: usize, _pos: i32) -> Self {
        unimplemented!("plain boxes are node bounds, not splittable primitives")
    }

    fn split_right(&self, _axis: usize, _pos: i32) -> Self {
        unimplemented!("plain boxes are node bounds, not splittable primitives")
    }
}
