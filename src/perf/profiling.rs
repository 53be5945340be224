/// Function call counting for the mesher and the spatial index.
/// Counters are relaxed atomics so read-only query paths stay safe to call
/// from many threads; snapshots are explicit and printing is the caller's
/// decision.
use std::sync::atomic::{AtomicU64, Ordering};

pub struct FunctionCounters {
    // Meshing counters
    pub mesh_calls: AtomicU64,
    pub mask_slices: AtomicU64,
    pub faces_emitted: AtomicU64,

    // Tree build counters
    pub tree_builds: AtomicU64,
    pub nodes_allocated: AtomicU64,
    pub primitives_split: AtomicU64,
    pub rope_walks: AtomicU64,

    // Query counters
    pub point_queries: AtomicU64,
    pub box_queries: AtomicU64,
}

impl FunctionCounters {
    pub const fn new() -> Self {
        Self {
            mesh_calls: AtomicU64::new(0),
            mask_slices: AtomicU64::new(0),
            faces_emitted: AtomicU64::new(0),
            tree_builds: AtomicU64::new(0),
            nodes_allocated: AtomicU64::new(0),
            primitives_split: AtomicU64::new(0),
            rope_walks: AtomicU64::new(0),
            point_queries: AtomicU64::new(0),
            box_queries: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.mesh_calls.store(0, Ordering::Relaxed);
        self.mask_slices.store(0, Ordering::Relaxed);
        self.faces_emitted.store(0, Ordering::Relaxed);
        self.tree_builds.store(0, Ordering::Relaxed);
        self.nodes_allocated.store(0, Ordering::Relaxed);
        self.primitives_split.store(0, Ordering::Relaxed);
        self.rope_walks.store(0, Ordering::Relaxed);
        self.point_queries.store(0, Ordering::Relaxed);
        self.box_queries.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            mesh_calls: self.mesh_calls.load(Ordering::Relaxed),
            mask_slices: self.mask_slices.load(Ordering::Relaxed),
            faces_emitted: self.faces_emitted.load(Ordering::Relaxed),
            tree_builds: self.tree_builds.load(Ordering::Relaxed),
            nodes_allocated: self.nodes_allocated.load(Ordering::Relaxed),
            primitives_split: self.primitives_split.load(Ordering::Relaxed),
            rope_walks: self.rope_walks.load(Ordering::Relaxed),
            point_queries: self.point_queries.load(Ordering::Relaxed),
            box_queries: self.box_queries.load(Ordering::Relaxed),
        }
    }
}

impl Default for FunctionCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub mesh_calls: u64,
    pub mask_slices: u64,
    pub faces_emitted: u64,
    pub tree_builds: u64,
    pub nodes_allocated: u64,
    pub primitives_split: u64,
    pub rope_walks: u64,
    pub point_queries: u64,
    pub box_queries: u64,
}

impl CounterSnapshot {
    /// Difference against an earlier snapshot, for per-phase accounting.
    pub fn since(&self, earlier: &CounterSnapshot) -> CounterSnapshot {
        CounterSnapshot {
            mesh_calls: self.mesh_calls - earlier.mesh_calls,
            mask_slices: self.mask_slices - earlier.mask_slices,
            faces_emitted: self.faces_emitted - earlier.faces_emitted,
            tree_builds: self.tree_builds - earlier.tree_builds,
            nodes_allocated: self.nodes_allocated - earlier.nodes_allocated,
            primitives_split: self.primitives_split - earlier.primitives_split,
            rope_walks: self.rope_walks - earlier.rope_walks,
            point_queries: self.point_queries - earlier.point_queries,
            box_queries: self.box_queries - earlier.box_queries,
        }
    }
}

/// Global counters shared by all mesher and tree instances
pub static FUNCTION_COUNTERS: FunctionCounters = FunctionCounters::new();

/// Increment a counter when the `profiling` feature is enabled, compile to
/// nothing otherwise.
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    };
}
