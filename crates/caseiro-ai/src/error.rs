/// Errors raised while calling the hosted agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent identity is empty or still holds a placeholder value.
    #[error("Agent is not configured: {0}")]
    NotConfigured(String),

    #[error("{provider} InvokeAgent failed: {message}")]
    Invoke {
        provider: &'static str,
        message: String,
    },

    /// The response stream broke off after the call was accepted.
    #[error("{provider} response stream failed: {message}")]
    Stream {
        provider: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, AgentError>;
