// Worker pool for task execution
//
// This crate provides:
// - WorkerPool: a fixed number of concurrent workers draining the task queue,
//   with graceful, deadline-bounded shutdown
// - SimulatedExecutor: the placeholder unit of work (random delay)

pub mod executor;
pub mod pool;

pub use executor::SimulatedExecutor;
pub use pool::{WorkerPool, WorkerPoolConfig, WorkerPoolError, WorkerPoolStatus};
