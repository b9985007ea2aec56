pub mod error;
pub mod providers;

use async_trait::async_trait;
use caseiro_common::types::AgentIdentity;
use error::Result;

pub use error::AgentError;
pub use providers::bedrock::{AgentSettings, BedrockAgent};

/// A managed conversational agent that turns a prompt into an answer.
#[async_trait]
pub trait HostedAgent: Send + Sync {
    fn provider(&self) -> &str;

    fn agent_id(&self) -> &str;

    fn agent_alias_id(&self) -> &str;

    fn region(&self) -> &str;

    /// Sends `prompt` in the session `session_id` and returns the streamed
    /// answer chunks joined in arrival order.
    async fn invoke(&self, prompt: &str, session_id: &str) -> Result<String>;

    /// Identity recorded alongside every answer.
    fn identity(&self, session_id: &str) -> AgentIdentity {
        AgentIdentity {
            agent_id: self.agent_id().to_string(),
            agent_alias_id: self.agent_alias_id().to_string(),
            region: self.region().to_string(),
            session_id: session_id.to_string(),
        }
    }
}
