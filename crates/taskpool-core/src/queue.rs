// Bounded FIFO task queue
//
// A cloneable handle over a single bounded mpsc channel. Producers enqueue
// on one side, pool workers dequeue on the other. The receiver sits behind
// an async mutex so a fixed set of workers can share it; delivery stays
// FIFO relative to enqueue order and each task reaches exactly one worker.

use std::sync::{Arc, Mutex as StdMutex};

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::task::Task;

/// Enqueue failure. The rejected task is handed back to the caller.
#[derive(Debug, Error)]
pub enum EnqueueError {
    /// The queue is at capacity (rejection mode only)
    #[error("task queue is full")]
    Full(Task),

    /// The queue has been closed; producers must stop submitting
    #[error("task queue is closed")]
    Closed(Task),
}

/// Bounded FIFO handoff channel between producers and the worker pool.
///
/// Capacity is fixed at construction. Closing is a one-time lifecycle
/// event owned by the pool's shutdown path: subsequent enqueues are
/// rejected with [`EnqueueError::Closed`] and dequeue drains the remaining
/// items before signalling end-of-stream with `None`.
#[derive(Clone)]
pub struct TaskQueue {
    tx: Arc<StdMutex<Option<mpsc::Sender<Task>>>>,
    rx: Arc<Mutex<mpsc::Receiver<Task>>>,
    capacity: usize,
}

impl TaskQueue {
    /// Create a queue with a fixed capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (config validation happens upstream;
    /// a zero-capacity queue is a programmer error).
    pub fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "task queue capacity must be positive");
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Arc::new(StdMutex::new(Some(tx))),
            rx: Arc::new(Mutex::new(rx)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enqueue with back-pressure: waits for space while the queue is at
    /// capacity, fails fast once the queue has been closed.
    pub async fn enqueue(&self, task: Task) -> Result<(), EnqueueError> {
        let Some(tx) = self.sender() else {
            return Err(EnqueueError::Closed(task));
        };
        tx.send(task).await.map_err(|e| EnqueueError::Closed(e.0))
    }

    /// Enqueue without waiting: rejects immediately when full or closed.
    pub fn try_enqueue(&self, task: Task) -> Result<(), EnqueueError> {
        let Some(tx) = self.sender() else {
            return Err(EnqueueError::Closed(task));
        };
        tx.try_send(task).map_err(|e| match e {
            mpsc::error::TrySendError::Full(task) => EnqueueError::Full(task),
            mpsc::error::TrySendError::Closed(task) => EnqueueError::Closed(task),
        })
    }

    /// Take the next task in FIFO order, waiting until one is available.
    /// Returns `None` once the queue is closed and fully drained.
    pub async fn dequeue(&self) -> Option<Task> {
        self.rx.lock().await.recv().await
    }

    /// Close the queue. Enqueues fail from here on; dequeue keeps
    /// delivering until the backlog is drained, then reports end-of-stream.
    ///
    /// # Panics
    ///
    /// Panics when called twice. Close is owned by the lifecycle
    /// coordinator and must happen exactly once.
    pub fn close(&self) {
        let mut tx = self.tx.lock().expect("queue sender lock poisoned");
        if tx.take().is_none() {
            panic!("task queue closed twice");
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<Task>> {
        self.tx.lock().expect("queue sender lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        Task::new(title, "test")
    }

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let queue = TaskQueue::bounded(4);
        let a = task("a");
        let b = task("b");
        queue.enqueue(a.clone()).await.unwrap();
        queue.enqueue(b.clone()).await.unwrap();

        assert_eq!(queue.dequeue().await.unwrap().id, a.id);
        assert_eq!(queue.dequeue().await.unwrap().id, b.id);
    }

    #[tokio::test]
    async fn try_enqueue_rejects_when_full() {
        let queue = TaskQueue::bounded(1);
        queue.try_enqueue(task("a")).unwrap();

        let rejected = task("b");
        match queue.try_enqueue(rejected.clone()) {
            Err(EnqueueError::Full(returned)) => assert_eq!(returned.id, rejected.id),
            other => panic!("expected Full, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn enqueue_waits_for_space() {
        let queue = TaskQueue::bounded(1);
        queue.enqueue(task("a")).await.unwrap();

        let producer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.enqueue(task("b")).await })
        };

        // Producer is blocked on capacity until we drain one item.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!producer.is_finished());

        queue.dequeue().await.unwrap();
        producer.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn close_drains_then_signals_end_of_stream() {
        let queue = TaskQueue::bounded(4);
        let a = task("a");
        queue.enqueue(a.clone()).await.unwrap();
        queue.close();

        assert_eq!(queue.dequeue().await.unwrap().id, a.id);
        assert!(queue.dequeue().await.is_none());
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_close_is_rejected() {
        let queue = TaskQueue::bounded(4);
        queue.close();

        let late = task("late");
        match queue.enqueue(late.clone()).await {
            Err(EnqueueError::Closed(returned)) => assert_eq!(returned.id, late.id),
            other => panic!("expected Closed, got {other:?}"),
        }
        assert!(matches!(
            queue.try_enqueue(task("late2")),
            Err(EnqueueError::Closed(_))
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "task queue closed twice")]
    async fn double_close_panics() {
        let queue = TaskQueue::bounded(1);
        queue.close();
        queue.close();
    }
}
