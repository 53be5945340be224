/// Instrumentation for the geometry kernels. Counting is compiled out
/// unless the `profiling` feature is enabled; nothing here prints on its
/// own.
pub mod profiling;

pub use profiling::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
