/// Split-kd-tree over integer AABB primitives
/// Cost-swept plane selection, straddling primitives split in two,
/// leaf neighbors linked through ropes after the shape is fixed
use super::bounds::{Aabb, Boundable};
use super::ropes;
use crate::count_call;
#[allow(unused_imports)]
use crate::perf::FUNCTION_COUNTERS;
use glam::{vec3, Vec3};

/// Index into the tree's node arena. Ropes and child links are ids, never
/// owning handles; the arena owns every node.
pub type NodeId = u32;

/// Leaves stop subdividing at this population unless the depth limit hits first.
pub const MAX_LEAF_VOXELS: usize = 2;

const VOXEL_INTERSECT_COST: f32 = 1.0;
const NODE_INTERSECT_COST: f32 = 1.0;

/// One of the six faces of a node, in rope-array order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::PosX,
        Side::NegX,
        Side::PosY,
        Side::NegY,
        Side::PosZ,
        Side::NegZ,
    ];

    #[inline]
    pub const fn axis(self) -> usize {
        match self {
            Side::PosX | Side::NegX => 0,
            Side::PosY | Side::NegY => 1,
            Side::PosZ | Side::NegZ => 2,
        }
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Side::PosX | Side::PosY | Side::PosZ)
    }

    /// The face looking along +axis.
    #[inline]
    pub const fn positive(axis: usize) -> Self {
        match axis {
            0 => Side::PosX,
            1 => Side::PosY,
            2 => Side::PosZ,
            _ => panic!("axis out of range"),
        }
    }

    /// The face looking along -axis.
    #[inline]
    pub const fn negative(axis: usize) -> Self {
        match axis {
            0 => Side::NegX,
            1 => Side::NegY,
            2 => Side::NegZ,
            _ => panic!("axis out of range"),
        }
    }
}

pub struct Leaf<B> {
    pub voxels: Vec<B>,
    /// Position of this leaf in the tree's flat leaf array.
    pub leaf_index: u32,
    /// Slots a downstream flattening pass fills in (first primitive and
    /// primitive count in upload order). The builder only allocates them.
    pub first: u32,
    pub count: u32,
}

pub enum NodeKind<B> {
    Interior {
        axis: usize,
        pos: i32,
        left: NodeId,
        right: NodeId,
    },
    Leaf(Leaf<B>),
}

pub struct Node<B> {
    pub bounds: Aabb,
    pub kind: NodeKind<B>,
    /// Neighbor links, one per face, `None` on the tree boundary. Populated
    /// by the rope pass after the tree shape is fixed.
    pub ropes: [Option<NodeId>; 6],
}

impl<B> Node<B> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    #[inline]
    pub fn rope(&self, side: Side) -> Option<NodeId> {
        self.ropes[side as usize]
    }

    pub fn leaf(&self) -> Option<&Leaf<B>> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Interior { .. } => None,
        }
    }
}

/// Immutable after build. Read-only queries may run concurrently; the
/// arena owns all nodes and the primitives stored in its leaves (which
/// may be split halves of the input primitives).
pub struct KdTree<B> {
    nodes: Vec<Node<B>>,
    root: NodeId,
    leaves: Vec<NodeId>,
}

impl<B: Boundable> KdTree<B> {
    /// Build over the given primitives. Root bounds are the componentwise
    /// union of the inputs; ropes are linked and shortened before returning.
    ///
    /// Panics on an empty primitive set, and if a split operation produces
    /// a half that crosses its plane.
    pub fn build(voxels: Vec<B>, max_depth: u32) -> Self {
        assert!(!voxels.is_empty(), "kd-tree needs at least one primitive");
        count_call!(FUNCTION_COUNTERS.tree_builds);

        let bounds = Aabb::from_primitives(&voxels);
        let mut nodes = Vec::new();
        let mut leaves = Vec::new();
        let root = build_node(&mut nodes, &mut leaves, voxels, bounds, 0, max_depth);
        ropes::link(&mut nodes, root, [None; 6]);

        Self { nodes, root, leaves }
    }

    /// Enumerate primitives overlapping the query box, closed comparisons
    /// per the `Boundable` contract. Appends clones of matching leaf
    /// entries; a primitive split during the build appears per half.
    pub fn intersects(&self, min: Vec3, max: Vec3, out: &mut Vec<B>) {
        count_call!(FUNCTION_COUNTERS.box_queries);
        self.intersects_node(self.root, min, max, out);
    }

    fn intersects_node(&self, id: NodeId, min: Vec3, max: Vec3, out: &mut Vec<B>) {
        let node = &self.nodes[id as usize];
        if !node.bounds.intersects_box(min, max) {
            return;
        }
        match &node.kind {
            NodeKind::Interior { left, right, .. } => {
                self.intersects_node(*left, min, max, out);
                self.intersects_node(*right, min, max, out);
            }
            NodeKind::Leaf(leaf) => {
                for v in &leaf.voxels {
                    if v.intersects(min, max) {
                        out.push(v.clone());
                    }
                }
            }
        }
    }
}

impl<B> KdTree<B> {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<B> {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf ids in creation order; `Leaf::leaf_index` indexes this array.
    #[inline]
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Locate the leaf enclosing `p`. A point outside the root bounds
    /// returns the root id; the caller detects that case.
    pub fn find_node(&self, p: Vec3) -> NodeId {
        count_call!(FUNCTION_COUNTERS.point_queries);
        let mut id = self.root;
        if !self.nodes[id as usize].bounds.contains(p) {
            return id;
        }
        loop {
            match &self.nodes[id as usize].kind {
                NodeKind::Interior {
                    axis,
                    pos,
                    left,
                    right,
                } => {
                    id = if p[*axis] < *pos as f32 { *left } else { *right };
                }
                NodeKind::Leaf(_) => return id,
            }
        }
    }
}

fn build_node<B: Boundable>(
    nodes: &mut Vec<Node<B>>,
    leaves: &mut Vec<NodeId>,
    voxels: Vec<B>,
    bounds: Aabb,
    depth: u32,
    max_depth: u32,
) -> NodeId {
    count_call!(FUNCTION_COUNTERS.nodes_allocated);

    if voxels.len() > MAX_LEAF_VOXELS && depth < max_depth {
        if let Some((axis, pos)) = find_split_plane(&voxels, &bounds) {
            let mut left_bounds = bounds;
            left_bounds.set_axis_max(axis, pos);
            let mut right_bounds = bounds;
            right_bounds.set_axis_min(axis, pos);

            let mut left_voxels = Vec::new();
            let mut right_voxels = Vec::new();
            for v in voxels {
                if v.min(axis) >= pos {
                    right_voxels.push(v);
                } else if v.max(axis) <= pos {
                    left_voxels.push(v);
                } else {
                    count_call!(FUNCTION_COUNTERS.primitives_split);
                    let l = v.split_left(axis, pos);
                    let r = v.split_right(axis, pos);
                    assert!(l.max(axis) <= pos, "left split half crosses the plane");
                    assert!(r.min(axis) >= pos, "right split half crosses the plane");
                    left_voxels.push(l);
                    right_voxels.push(r);
                }
            }

            let left = build_node(nodes, leaves, left_voxels, left_bounds, depth + 1, max_depth);
            let right = build_node(nodes, leaves, right_voxels, right_bounds, depth + 1, max_depth);
            let id = nodes.len() as NodeId;
            nodes.push(Node {
                bounds,
                kind: NodeKind::Interior {
                    axis,
                    pos,
                    left,
                    right,
                },
                ropes: [None; 6],
            });
            return id;
        }
    }

    let id = nodes.len() as NodeId;
    let leaf_index = leaves.len() as u32;
    nodes.push(Node {
        bounds,
        kind: NodeKind::Leaf(Leaf {
            voxels,
            leaf_index,
            first: 0,
            count: 0,
        }),
        ropes: [None; 6],
    });
    leaves.push(id);
    id
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum EventKind {
    Start,
    End,
}

struct PlaneEvent {
    kind: EventKind,
    pos: i32,
}

/// Choose the split plane for a node: widest-extent axis, then a cost sweep
/// over the (subsampled) primitive interval boundaries on that axis.
/// Returns `None` when the cheapest plane coincides with a node bound,
/// which marks the node a leaf.
fn find_split_plane<B: Boundable>(voxels: &[B], bounds: &Aabb) -> Option<(usize, i32)> {
    let xw = bounds.extent(0);
    let yw = bounds.extent(1);
    let zw = bounds.extent(2);
    let (axis, box_width) = if xw > yw && xw > zw {
        (0, xw)
    } else if yw > zw {
        (1, yw)
    } else {
        (2, zw)
    };
    if box_width == 0 {
        return None;
    }

    // Large nodes sample at most ~100 primitives for the sweep.
    let total = voxels.len();
    let divisor = (total + 99) / 100;
    let n_prims = (total / divisor) as i32;

    let mut events = Vec::with_capacity(2 * (total / divisor + 1));
    let mut i = 0;
    while i < total {
        let v = &voxels[i];
        assert!(
            bounds.intersects_box(
                vec3(v.min(0) as f32, v.min(1) as f32, v.min(2) as f32),
                vec3(v.max(0) as f32, v.max(1) as f32, v.max(2) as f32),
            ),
            "primitive does not intersect its node bounds"
        );
        events.push(PlaneEvent {
            kind: EventKind::Start,
            pos: v.min(axis),
        });
        events.push(PlaneEvent {
            kind: EventKind::End,
            pos: v.max(axis),
        });
        i += divisor;
    }
    // Stable by position; emission order breaks ties, so builds are
    // deterministic for identical input order.
    events.sort_by_key(|e| e.pos);

    let inv_width = 1.0 / box_width as f32;
    let mut open = 0i32;
    let mut done = 0i32;
    let mut min_index = 0usize;
    let mut min_cost = f32::MAX;
    for (i, ev) in events.iter().enumerate() {
        if ev.kind == EventKind::End {
            open -= 1;
            done += 1;
        }
        let alpha = (ev.pos - bounds.axis_min(axis)) as f32 * inv_width;
        let cost = VOXEL_INTERSECT_COST
            + NODE_INTERSECT_COST
                * ((done + open) as f32 * alpha + (n_prims - done) as f32 * (1.0 - alpha));
        if cost < min_cost {
            min_index = i;
            min_cost = cost;
        }
        if ev.kind == EventKind::Start {
            open += 1;
        }
    }

    let pos = events[min_index].pos;
    if pos == bounds.axis_min(axis) || pos == bounds.axis_max(axis) {
        None
    } else {
        Some((axis, pos))
    }
}
