/// Errors raised by the object store gateway and the stores built on it.
///
/// # Examples
///
/// ```rust
/// use caseiro_storage::error::StorageError;
///
/// let err = StorageError::UnknownTrigger("trigger lava".to_string());
/// assert!(err.is_validation());
/// assert!(err.to_string().contains("trigger lava"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object matched the request.
    #[error("{0}")]
    NotFound(String),

    /// The trigger label is not in the trigger table.
    #[error("Unknown trigger label: {0}")]
    UnknownTrigger(String),

    /// The storage service rejected a call or could not be reached.
    /// `message` carries the service's own error text.
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },

    /// Serializing a document before upload failed.
    #[error("Storage: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn service(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Service {
            operation,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnknownTrigger(_))
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
