use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use serde::{Deserialize, Serialize};

/// Region and optional static credentials for one AWS client.
///
/// When the key pair is absent the default provider chain is used
/// (environment, profile, instance/Lambda role).
#[derive(Clone, Serialize, Deserialize)]
pub struct AwsSettings {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

pub fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self::with_region(default_region())
    }
}

impl AwsSettings {
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            access_key_id: None,
            secret_access_key: None,
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        matches!(
            (&self.access_key_id, &self.secret_access_key),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }

    /// Resolves an SDK config for this region and credential pair.
    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));

        if let (Some(id), Some(secret)) = (&self.access_key_id, &self.secret_access_key) {
            if !id.is_empty() && !secret.is_empty() {
                loader = loader.credentials_provider(Credentials::new(
                    id.clone(),
                    secret.clone(),
                    None,
                    None,
                    "caseiro-config",
                ));
            }
        }

        loader.load().await
    }
}

impl std::fmt::Debug for AwsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSettings")
            .field("region", &self.region)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(|_| "***"),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}
