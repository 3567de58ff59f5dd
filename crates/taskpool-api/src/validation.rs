// Input validation for the task API
//
// Hard limits, not configurable. A task that fails validation is rejected
// before anything is persisted or enqueued.

use axum::http::StatusCode;

/// Maximum size for the task title field.
pub const MAX_TITLE_BYTES: usize = 200;

/// Maximum size for the task description field.
pub const MAX_DESCRIPTION_BYTES: usize = 2000;

/// Validation error - maps to 400 Bad Request
pub struct ValidationError;

impl From<ValidationError> for StatusCode {
    fn from(_: ValidationError) -> Self {
        StatusCode::BAD_REQUEST
    }
}

/// Validate the task title: non-empty, bounded length
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        tracing::warn!("task title is empty");
        return Err(ValidationError);
    }
    if title.len() > MAX_TITLE_BYTES {
        tracing::warn!(
            "task title exceeds limit: {} bytes (max: {})",
            title.len(),
            MAX_TITLE_BYTES
        );
        return Err(ValidationError);
    }
    Ok(())
}

/// Validate the task description: non-empty, bounded length
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        tracing::warn!("task description is empty");
        return Err(ValidationError);
    }
    if description.len() > MAX_DESCRIPTION_BYTES {
        tracing::warn!(
            "task description exceeds limit: {} bytes (max: {})",
            description.len(),
            MAX_DESCRIPTION_BYTES
        );
        return Err(ValidationError);
    }
    Ok(())
}
