use crate::error::{AgentError, Result};
use crate::HostedAgent;
use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::ResponseStream;
use aws_sdk_bedrockagentruntime::Client;
use caseiro_common::aws::{default_region, AwsSettings};
use serde::{Deserialize, Serialize};

const PLACEHOLDER_MARKER: &str = "REPLACE_WITH";

/// Published agent coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub agent_alias_id: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl AgentSettings {
    /// Rejects empty ids and unfilled `REPLACE_WITH...` placeholders.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("agent_id", &self.agent_id),
            ("agent_alias_id", &self.agent_alias_id),
        ] {
            let value = value.trim();
            if value.is_empty() || value.contains(PLACEHOLDER_MARKER) {
                return Err(AgentError::NotConfigured(format!("{name} is not set")));
            }
        }
        Ok(())
    }
}

/// Amazon Bedrock Agents runtime client.
#[derive(Clone)]
pub struct BedrockAgent {
    client: Client,
    settings: AgentSettings,
}

impl BedrockAgent {
    /// Identity is checked on every [`HostedAgent::invoke`], not here.
    pub fn new(client: Client, settings: AgentSettings) -> Self {
        Self { client, settings }
    }

    /// Builds a client in the agent's own region using the default
    /// credential chain.
    pub async fn connect(settings: AgentSettings) -> Self {
        let sdk_config = AwsSettings::with_region(settings.region.clone()).load().await;
        Self::new(Client::new(&sdk_config), settings)
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }
}

/// Joins chunk payloads in arrival order. Invalid UTF-8 is replaced.
pub fn join_chunks<I>(chunks: I) -> String
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let bytes: Vec<u8> = chunks.into_iter().flatten().collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[async_trait]
impl HostedAgent for BedrockAgent {
    fn provider(&self) -> &str {
        "bedrock"
    }

    fn agent_id(&self) -> &str {
        &self.settings.agent_id
    }

    fn agent_alias_id(&self) -> &str {
        &self.settings.agent_alias_id
    }

    fn region(&self) -> &str {
        &self.settings.region
    }

    async fn invoke(&self, prompt: &str, session_id: &str) -> Result<String> {
        self.settings.validate()?;
        tracing::debug!(
            agent_id = %self.settings.agent_id,
            agent_alias_id = %self.settings.agent_alias_id,
            session_id,
            prompt_length = prompt.len(),
            "Calling Bedrock InvokeAgent"
        );

        let output = self
            .client
            .invoke_agent()
            .agent_id(&self.settings.agent_id)
            .agent_alias_id(&self.settings.agent_alias_id)
            .session_id(session_id)
            .input_text(prompt)
            .end_session(false)
            .enable_trace(false)
            .send()
            .await
            .map_err(|e| AgentError::Invoke {
                provider: "Bedrock",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let mut completion = output.completion;
        let mut chunks = Vec::new();
        loop {
            let event = completion.recv().await.map_err(|e| AgentError::Stream {
                provider: "Bedrock",
                message: DisplayErrorContext(&e).to_string(),
            })?;
            match event {
                Some(ResponseStream::Chunk(part)) => {
                    if let Some(blob) = part.bytes {
                        chunks.push(blob.into_inner());
                    }
                }
                // traces and other event kinds carry no answer text
                Some(_) => {}
                None => break,
            }
        }

        let answer = join_chunks(chunks);
        tracing::debug!(answer_length = answer.len(), "Bedrock agent answered");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(agent_id: &str, alias: &str) -> AgentSettings {
        AgentSettings {
            agent_id: agent_id.into(),
            agent_alias_id: alias.into(),
            region: "us-east-1".into(),
        }
    }

    #[test]
    fn validate_accepts_real_ids() {
        assert!(settings("QAYKR34TMW", "TSTALIASID").validate().is_ok());
    }

    #[test]
    fn validate_rejects_placeholders_and_blanks() {
        for (id, alias) in [
            ("", "TSTALIASID"),
            ("  ", "TSTALIASID"),
            ("REPLACE_WITH_AGENT_ID", "TSTALIASID"),
            ("QAYKR34TMW", "REPLACE_WITH_ALIAS"),
            ("QAYKR34TMW", ""),
        ] {
            let err = settings(id, alias).validate().unwrap_err();
            assert!(matches!(err, AgentError::NotConfigured(_)), "{id}/{alias}");
        }
    }

    #[test]
    fn join_chunks_keeps_order_across_split_characters() {
        let text = "Ventilação imediata";
        let bytes = text.as_bytes();
        // split inside the two-byte "ç"
        let split = text.find('ç').unwrap() + 1;
        let chunks = vec![bytes[..split].to_vec(), bytes[split..].to_vec()];

        assert_eq!(join_chunks(chunks), text);
        assert_eq!(join_chunks(Vec::<Vec<u8>>::new()), "");
    }

    #[test]
    fn settings_region_defaults() {
        let parsed: AgentSettings =
            toml::from_str("agent_id = \"A\"\nagent_alias_id = \"B\"\n").unwrap();
        assert_eq!(parsed.region, "us-east-1");
    }
}
