// Task entity and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

/// Task status. Transitions are monotonic and one-way:
/// `Pending -> Completed` or `Pending -> Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether no further transition can occur from this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            _ => anyhow::bail!("unknown task status: {}", s),
        }
    }
}

/// Input for creating a task (producer side)
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

/// The unit of schedulable work.
///
/// Created pending by the store, handed to the queue by the producer, and
/// owned exclusively by one worker from dequeue until the terminal status
/// is persisted. The core does not retain tasks after delivery to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task with a fresh time-ordered id.
    /// A task can never be constructed in a terminal status.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `Completed`. Only valid from `Pending`.
    pub fn complete(&mut self) -> Result<(), TaskError> {
        self.transition(TaskStatus::Completed)
    }

    /// Transition to `Failed`. Only valid from `Pending`.
    pub fn fail(&mut self) -> Result<(), TaskError> {
        self.transition(TaskStatus::Failed)
    }

    fn transition(&mut self, to: TaskStatus) -> Result<(), TaskError> {
        if self.status.is_terminal() {
            return Err(TaskError::InvalidTransition { from: self.status });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl From<NewTask> for Task {
    fn from(input: NewTask) -> Self {
        Task::new(input.title, input.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_pending() {
        let task = Task::new("Test Task", "Test Description");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.status.is_terminal());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn pending_completes() {
        let mut task = Task::new("t", "d");
        task.complete().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn pending_fails() {
        let mut task = Task::new("t", "d");
        task.fail().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
    }

    #[test]
    fn terminal_status_rejects_further_transitions() {
        let mut task = Task::new("t", "d");
        task.complete().unwrap();

        let err = task.fail().unwrap_err();
        assert!(matches!(
            err,
            TaskError::InvalidTransition {
                from: TaskStatus::Completed
            }
        ));

        let err = task.complete().unwrap_err();
        assert!(matches!(err, TaskError::InvalidTransition { .. }));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [TaskStatus::Pending, TaskStatus::Completed, TaskStatus::Failed] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("running".parse::<TaskStatus>().is_err());
    }
}
