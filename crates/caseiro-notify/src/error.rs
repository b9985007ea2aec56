/// Errors that can occur within the notification subsystem.
///
/// # Examples
///
/// ```rust
/// use caseiro_notify::error::NotifyError;
///
/// assert!(NotifyError::NoRecipients.is_validation());
/// let err = NotifyError::provider("SES", "MessageRejected: Email address is not verified");
/// assert!(!err.is_validation());
/// assert!(err.to_string().contains("not verified"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// No sender address configured for email.
    #[error("Email sender is not set.")]
    MissingSender,

    /// Recipient list was empty after trimming blank entries.
    #[error("No recipients provided.")]
    NoRecipients,

    /// No destination phone number configured for SMS.
    #[error("SMS destination number is not set.")]
    MissingDestination,

    /// A message part could not be assembled for the provider API.
    #[error("Notify: invalid message: {0}")]
    InvalidMessage(String),

    /// The delivery service rejected the request or could not be reached.
    #[error("Notify: {service} error: {message}")]
    Provider {
        service: &'static str,
        message: String,
    },

    /// Rendering a notification template failed.
    #[error("Notify: template rendering error: {0}")]
    Template(String),
}

impl NotifyError {
    pub fn provider(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Provider {
            service,
            message: err.to_string(),
        }
    }

    /// Caller-side problems that were caught before any service call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingSender | Self::NoRecipients | Self::MissingDestination
        )
    }
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
