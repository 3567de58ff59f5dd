// Core domain for taskpool
//
// This crate defines the runtime domain shared by the API and the worker:
// - Task: the unit of schedulable work and its status state machine
// - TaskQueue: bounded FIFO handoff between producers and the worker pool
// - TaskStore / TaskExecutor: contracts implemented outside the core

pub mod error;
pub mod queue;
pub mod task;
pub mod traits;

pub use error::{StoreError, TaskError};
pub use queue::{EnqueueError, TaskQueue};
pub use task::{NewTask, Task, TaskStatus};
pub use traits::{ExecutionError, TaskExecutor, TaskStore};
