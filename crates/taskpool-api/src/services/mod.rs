// Service layer between HTTP handlers and the domain

mod task;

pub use task::{TaskService, TaskServiceError};
