use caseiro_ai::AgentSettings;
use caseiro_common::aws::AwsSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_ENV: &str = "CASEIRO_REACTOR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/reactor.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorConfig {
    #[serde(default = "default_agent")]
    pub agent: AgentSettings,
    /// Bucket that receives alert documents.
    #[serde(default = "default_output_bucket")]
    pub output_bucket: String,
    #[serde(default = "default_alerts_prefix")]
    pub alerts_prefix: String,
    #[serde(default)]
    pub sms: SmsConfig,
    /// Region and credentials for the S3 and SNS clients.
    #[serde(default)]
    pub storage: AwsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    /// E.164 number, e.g. `+351912345678`.
    #[serde(default)]
    pub destination_number: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            sender_id: default_sender_id(),
            destination_number: String::new(),
        }
    }
}

fn default_agent() -> AgentSettings {
    AgentSettings {
        agent_id: String::new(),
        agent_alias_id: String::new(),
        region: caseiro_common::aws::default_region(),
    }
}

fn default_output_bucket() -> String {
    "alertas-caseiro".to_string()
}

fn default_alerts_prefix() -> String {
    "alerts/".to_string()
}

fn default_sender_id() -> String {
    "CAISEIRO".to_string()
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            output_bucket: default_output_bucket(),
            alerts_prefix: default_alerts_prefix(),
            sms: SmsConfig::default(),
            storage: AwsSettings::default(),
        }
    }
}

impl ReactorConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{}': {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from `$CASEIRO_REACTOR_CONFIG` or `config/reactor.toml`. A missing
    /// file yields the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            tracing::warn!(path = %path, "Reactor config not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
output_bucket = "alertas-caseiro"

[agent]
agent_id = "QAYKR34TMW"
agent_alias_id = "TSTALIASID"
region = "us-west-2"

[sms]
sender_id = "CASEIRO"
destination_number = "+351912345678"

[storage]
region = "eu-west-1"
"#
        )
        .unwrap();

        let config = ReactorConfig::load(file.path()).unwrap();

        assert_eq!(config.agent.agent_id, "QAYKR34TMW");
        assert_eq!(config.agent.region, "us-west-2");
        assert_eq!(config.alerts_prefix, "alerts/");
        assert_eq!(config.sms.destination_number, "+351912345678");
        assert_eq!(config.storage.region, "eu-west-1");
        assert!(!config.storage.has_static_credentials());
    }

    #[test]
    fn shipped_config_needs_agent_ids() {
        let config: ReactorConfig =
            toml::from_str(include_str!("../../../config/reactor.toml")).unwrap();
        assert_eq!(config.output_bucket, "alertas-caseiro");
        assert!(config.agent.validate().is_err());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: ReactorConfig = toml::from_str("").unwrap();
        assert_eq!(config.output_bucket, "alertas-caseiro");
        assert_eq!(config.sms.sender_id, "CAISEIRO");
        assert_eq!(config.agent.region, "us-east-1");
        assert!(config.agent.validate().is_err());
    }
}
