use serde_json::Value;
use thiserror::Error;

/// Message used when the backend gives us nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Domain marker the backend uses for an empty category listing.
pub const ARTICLES_NOT_FOUND_FOR_CATEGORY: &str = "ArticlesNotFoundForCategoryException";

// ============================================================================
// Error Types
// ============================================================================

/// Every failure surfaced to the UI carries exactly one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Submission(String),
    #[error("{0}")]
    Fetch(String),
    #[error("{0}")]
    Deletion(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Submission(m) | Self::Fetch(m) | Self::Deletion(m) => m,
        }
    }
}

/// A backend error payload reduced to what callers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// Name of the domain exception, when the payload carried one.
    pub domain: Option<String>,
    pub message: String,
}

impl BackendError {
    pub fn generic() -> Self {
        Self {
            domain: None,
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_domain(&self, name: &str) -> bool {
        self.domain.as_deref() == Some(name)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Reduce an error response body to a single message.
///
/// First match wins:
/// 1. `detail.error` + `detail.message` (domain exception)
/// 2. `detail.msg`, or `msg` of the first entry of a `detail` array (validation)
/// 3. top-level `message`
/// 4. `detail` as a plain string
/// 5. [`GENERIC_ERROR_MESSAGE`]
pub fn normalize_error_body(body: &str) -> BackendError {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize_error_value(&value),
        Err(_) => BackendError::generic(),
    }
}

pub fn normalize_error_value(value: &Value) -> BackendError {
    let detail = value.get("detail");

    if let Some(detail) = detail.filter(|d| d.is_object()) {
        if let (Some(name), Some(message)) = (
            detail.get("error").and_then(Value::as_str),
            detail.get("message").and_then(Value::as_str),
        ) {
            return BackendError {
                domain: Some(name.to_string()),
                message: message.to_string(),
            };
        }
    }

    let validation_msg = match detail {
        Some(Value::Object(map)) => map.get("msg").and_then(Value::as_str),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str)),
        _ => None,
    };
    if let Some(msg) = validation_msg {
        return plain(msg);
    }

    if let Some(msg) = value.get("message").and_then(Value::as_str) {
        return plain(msg);
    }

    if let Some(msg) = detail.and_then(Value::as_str) {
        return plain(msg);
    }

    BackendError::generic()
}

fn plain(message: &str) -> BackendError {
    BackendError {
        domain: None,
        message: message.to_string(),
    }
}
