use caseiro_common::aws::AwsSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Lifetime of the links shown next to each alert.
    #[serde(default = "default_presign_minutes")]
    pub presign_minutes: u64,
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub triggers: TriggersConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

/// Bucket holding agent-written alert documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alerts_bucket")]
    pub bucket: String,
    #[serde(default = "default_alerts_prefix")]
    pub prefix: String,
    #[serde(flatten)]
    pub aws: AwsSettings,
}

/// Bucket receiving trigger events and holding related messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggersConfig {
    #[serde(default = "default_triggers_bucket")]
    pub bucket: String,
    #[serde(default = "default_triggers_prefix")]
    pub prefix: String,
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    #[serde(flatten)]
    pub aws: AwsSettings,
}

/// SES settings. Credentials come from `[alerts]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Falls back to the alerts region.
    #[serde(default)]
    pub region: Option<String>,
    /// Verified SES identity, e.g. `Caseiro Alerts <alerts@example.com>`.
    #[serde(default)]
    pub sender: String,
    /// Pre-filled recipients of the email form.
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// SigV4 presigned URLs expire after at most seven days.
pub const MAX_PRESIGN_MINUTES: u64 = 7 * 24 * 60;

fn default_http_port() -> u16 {
    8080
}

fn default_presign_minutes() -> u64 {
    caseiro_storage::store::alerts::DEFAULT_PRESIGN_MINUTES
}

fn default_alerts_bucket() -> String {
    "alertas-caseiro".to_string()
}

fn default_alerts_prefix() -> String {
    caseiro_storage::store::alerts::DEFAULT_ALERTS_PREFIX.to_string()
}

fn default_triggers_bucket() -> String {
    "aviario-metrics".to_string()
}

fn default_triggers_prefix() -> String {
    caseiro_storage::store::triggers::DEFAULT_TRIGGERS_PREFIX.to_string()
}

fn default_source_tag() -> String {
    caseiro_storage::store::triggers::DEFAULT_SOURCE_TAG.to_string()
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            bucket: default_alerts_bucket(),
            prefix: default_alerts_prefix(),
            aws: AwsSettings::default(),
        }
    }
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            bucket: default_triggers_bucket(),
            prefix: default_triggers_prefix(),
            source_tag: default_source_tag(),
            aws: AwsSettings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            presign_minutes: default_presign_minutes(),
            cors_allowed_origins: Vec::new(),
            alerts: AlertsConfig::default(),
            triggers: TriggersConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{}': {}", path, e))?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_PRESIGN_MINUTES).contains(&self.presign_minutes) {
            anyhow::bail!(
                "presign_minutes must be between 1 and {}, got {}",
                MAX_PRESIGN_MINUTES,
                self.presign_minutes
            );
        }
        Ok(())
    }

    /// SES client settings: the alerts credential pair in the email region.
    pub fn email_aws(&self) -> AwsSettings {
        let mut aws = self.alerts.aws.clone();
        if let Some(region) = self.email.region.as_ref().filter(|r| !r.trim().is_empty()) {
            aws.region = region.clone();
        }
        aws
    }

    /// Recipients field default, e.g. `a@x.com, b@x.com`.
    pub fn default_recipients(&self) -> String {
        self.email.recipients.join(", ")
    }
}
