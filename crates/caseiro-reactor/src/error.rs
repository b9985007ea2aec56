use caseiro_ai::AgentError;
use caseiro_notify::error::NotifyError;
use caseiro_storage::error::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ReactorError {
    /// An expected field of the storage event is absent or not a string.
    #[error("Missing required parameter: {0}")]
    MissingField(String),

    /// The triggering object's body is not UTF-8 text.
    #[error("Source object {key} is not valid UTF-8: {source}")]
    SourceNotUtf8 {
        key: String,
        source: std::string::FromUtf8Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Reactor: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReactorError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

pub type Result<T> = std::result::Result<T, ReactorError>;
