//! Provider configuration
//!
//! Settings come from the `provider` block of the configuration file and may be
//! overridden by the host (command-line flags, environment). Anything left
//! unset falls back to the standard AWS resolution chain in `aws-config`.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use serde::Deserialize;

/// AWS provider settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// AWS region (e.g., "us-east-1")
    pub region: Option<String>,
    /// Named profile from the shared config files
    pub profile: Option<String>,
    /// Override for the Macie API endpoint (e.g., a local mock)
    pub macie_endpoint: Option<String>,
    /// Override for the Cloud Control API endpoint
    pub cloudcontrol_endpoint: Option<String>,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no AWS region configured; set `region` in the provider block or AWS_REGION")]
    MissingRegion,

    #[error("no AWS credentials available")]
    MissingCredentials,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ProviderConfig {
    /// Overlay another configuration; values set in `other` win
    pub fn merge(mut self, other: ProviderConfig) -> Self {
        if other.region.is_some() {
            self.region = other.region;
        }
        if other.profile.is_some() {
            self.profile = other.profile;
        }
        if other.macie_endpoint.is_some() {
            self.macie_endpoint = other.macie_endpoint;
        }
        if other.cloudcontrol_endpoint.is_some() {
            self.cloudcontrol_endpoint = other.cloudcontrol_endpoint;
        }
        self
    }

    /// Resolve the shared AWS SDK configuration
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        loader.load().await
    }
}
