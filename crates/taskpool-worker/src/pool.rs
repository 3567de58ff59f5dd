// Worker pool draining the task queue
//
// A fixed number of workers share the queue and the store and nothing
// else. Each worker runs an identical loop: take a task or the stop
// signal, process the task to completion, repeat. The pool owns the
// cancellation signal and is the only component permitted to stop workers.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use taskpool_core::{Task, TaskExecutor, TaskQueue, TaskStore};

/// Worker pool configuration
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Default graceful shutdown deadline
    pub shutdown_timeout: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl WorkerPoolConfig {
    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the default shutdown deadline
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Worker pool status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPoolStatus {
    /// Not started, or stopped after shutdown
    Stopped,
    /// Workers are running and draining the queue
    Running,
    /// Shutdown signalled, waiting for in-flight work
    Draining,
}

/// Worker pool errors
#[derive(Debug, thiserror::Error)]
pub enum WorkerPoolError {
    /// Start called while the pool is running
    #[error("worker pool is already running")]
    AlreadyRunning,

    /// Shutdown called when the pool is not running
    #[error("worker pool is not running")]
    NotRunning,

    /// Workers did not exit before the shutdown deadline
    #[error("graceful shutdown timed out")]
    ShutdownTimeout,
}

/// Fixed-size pool of workers executing tasks from the queue.
///
/// # Example
///
/// ```ignore
/// let pool = WorkerPool::new(store, executor, queue.clone(), config);
/// pool.start()?;
///
/// // ... later, after producers have stopped
/// pool.shutdown(Duration::from_secs(10)).await?;
/// ```
pub struct WorkerPool {
    store: Arc<dyn TaskStore>,
    executor: Arc<dyn TaskExecutor>,
    queue: TaskQueue,
    config: WorkerPoolConfig,
    shutdown_tx: watch::Sender<bool>,
    status: RwLock<WorkerPoolStatus>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Create a new worker pool bound to a queue
    pub fn new(
        store: Arc<dyn TaskStore>,
        executor: Arc<dyn TaskExecutor>,
        queue: TaskQueue,
        config: WorkerPoolConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            store,
            executor,
            queue,
            config,
            shutdown_tx,
            status: RwLock::new(WorkerPoolStatus::Stopped),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Start exactly `workers` workers bound to the shared cancellation
    /// signal. Fails if the pool is already running.
    pub fn start(&self) -> Result<(), WorkerPoolError> {
        // Check-and-set under one write guard so concurrent starts cannot
        // both observe Stopped and spawn twice the workers.
        let mut status = self.status.write().unwrap();
        if *status != WorkerPoolStatus::Stopped {
            return Err(WorkerPoolError::AlreadyRunning);
        }

        info!(workers = self.config.workers, "starting worker pool");

        let mut handles = self.handles.lock().unwrap();
        for worker in 0..self.config.workers {
            let queue = self.queue.clone();
            let store = Arc::clone(&self.store);
            let executor = Arc::clone(&self.executor);
            let shutdown_rx = self.shutdown_tx.subscribe();

            handles.push(tokio::spawn(worker_loop(
                worker, queue, store, executor, shutdown_rx,
            )));
        }

        *status = WorkerPoolStatus::Running;
        Ok(())
    }

    /// Shutdown the pool gracefully.
    ///
    /// Signals cancellation, closes the queue (producers must already have
    /// stopped submitting; late enqueues are rejected, not crashed), then
    /// waits up to `deadline` for every worker to exit. Tasks a worker is
    /// mid-processing are drained, not aborted; queued-but-unclaimed tasks
    /// are dropped. Calling shutdown more than once is a programmer error.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), WorkerPoolError> {
        // Claim the Running -> Draining transition atomically: only one
        // caller may proceed to close the queue. The guard is dropped
        // before any await point.
        {
            let mut status = self.status.write().unwrap();
            if *status != WorkerPoolStatus::Running {
                return Err(WorkerPoolError::NotRunning);
            }
            *status = WorkerPoolStatus::Draining;
        }

        info!(deadline_ms = deadline.as_millis() as u64, "initiating graceful shutdown");

        let _ = self.shutdown_tx.send(true);
        self.queue.close();

        let handles: Vec<JoinHandle<()>> = self.handles.lock().unwrap().drain(..).collect();
        match tokio::time::timeout(deadline, futures::future::join_all(handles)).await {
            Ok(results) => {
                for (worker, result) in results.into_iter().enumerate() {
                    if let Err(e) = result {
                        warn!(worker, error = %e, "worker exited abnormally");
                    }
                }
                *self.status.write().unwrap() = WorkerPoolStatus::Stopped;
                info!("worker pool stopped");
                Ok(())
            }
            Err(_) => {
                warn!("shutdown deadline elapsed with workers still busy");
                Err(WorkerPoolError::ShutdownTimeout)
            }
        }
    }

    /// Current pool status
    pub fn status(&self) -> WorkerPoolStatus {
        *self.status.read().unwrap()
    }

    /// Configured worker count
    pub fn workers(&self) -> usize {
        self.config.workers
    }
}

/// One worker's loop: observe cancellation at the top of every iteration,
/// otherwise wait for the next task and process it to completion.
async fn worker_loop(
    worker: usize,
    queue: TaskQueue,
    store: Arc<dyn TaskStore>,
    executor: Arc<dyn TaskExecutor>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!(worker, "worker started");
    loop {
        if *shutdown_rx.borrow() {
            debug!(worker, "shutdown observed");
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // Pool dropped without shutdown; nothing left to signal us.
                    break;
                }
            }
            task = queue.dequeue() => match task {
                Some(task) => handle(worker, &store, &executor, task).await,
                None => {
                    debug!(worker, "queue closed and drained");
                    break;
                }
            }
        }
    }
    debug!(worker, "worker exited");
}

/// Process a single task: execute the unit of work, transition to the
/// terminal status, persist it. Failures stay local to this iteration.
async fn handle(
    worker: usize,
    store: &Arc<dyn TaskStore>,
    executor: &Arc<dyn TaskExecutor>,
    mut task: Task,
) {
    info!(worker, task_id = %task.id, title = %task.title, "task processing started");

    let transition = match executor.execute(&task).await {
        Ok(()) => task.complete(),
        Err(e) => {
            warn!(worker, task_id = %task.id, error = %e, "task execution failed");
            task.fail()
        }
    };

    // The worker exclusively owns the task between dequeue and the terminal
    // update, so a non-pending status here is a bug upstream.
    if let Err(e) = transition {
        error!(worker, task_id = %task.id, error = %e, "task was not pending, skipping update");
        return;
    }

    // At-most-one-attempt: an update failure is logged and swallowed. The
    // terminal status is lost for store observers; the pool keeps running.
    if let Err(e) = store.update(&task).await {
        error!(worker, task_id = %task.id, error = %e, "failed to persist terminal status");
        return;
    }

    info!(worker, task_id = %task.id, status = %task.status, "task processing finished");
}
