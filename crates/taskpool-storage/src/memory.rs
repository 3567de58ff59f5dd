// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
//
// Provides a Postgres-compatible TaskStore backed by a HashMap, allowing
// the service (and the worker pool tests) to run without a database.
// All data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use taskpool_core::{NewTask, StoreError, Task, TaskStore};

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, input: NewTask) -> Result<Task, StoreError> {
        let task = Task::from(input);
        self.tasks.write().insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self.tasks.read().values().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                stored.status = task.status;
                stored.updated_at = task.updated_at;
                Ok(())
            }
            None => Err(StoreError::NotFound(task.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpool_core::TaskStatus;

    #[tokio::test]
    async fn create_then_find() {
        let store = MemoryTaskStore::new();
        let task = store
            .create(NewTask {
                title: "Test Task".into(),
                description: "Test Description".into(),
            })
            .await
            .unwrap();

        let found = store.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(found, task);
        assert_eq!(found.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let store = MemoryTaskStore::new();
        let task = store
            .create(NewTask {
                title: "t".into(),
                description: "d".into(),
            })
            .await
            .unwrap();

        let first = store.find_by_id(task.id).await.unwrap();
        let second = store.find_by_id(task.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn update_persists_only_mutable_fields() {
        let store = MemoryTaskStore::new();
        let created = store
            .create(NewTask {
                title: "t".into(),
                description: "d".into(),
            })
            .await
            .unwrap();

        let mut task = created.clone();
        task.complete().unwrap();
        task.title = "ignored".into();
        store.update(&task).await.unwrap();

        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert_eq!(stored.title, "t");
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let store = MemoryTaskStore::new();
        let task = Task::new("t", "d");
        let err = store.update(&task).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == task.id));
    }

    #[tokio::test]
    async fn find_all_lists_newest_first() {
        let store = MemoryTaskStore::new();
        let a = store
            .create(NewTask {
                title: "a".into(),
                description: "d".into(),
            })
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let b = store
            .create(NewTask {
                title: "b".into(),
                description: "d".into(),
            })
            .await
            .unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, b.id);
        assert_eq!(all[1].id, a.id);
    }
}
