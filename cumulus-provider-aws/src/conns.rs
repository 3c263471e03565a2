//! Connection object handed to every resource handler

use std::sync::Arc;

use crate::cloudcontrol::{CloudControlApi, SdkCloudControl};
use crate::config::{ConfigError, ProviderConfig};
use crate::service::macie::api::MacieApi;
use crate::service::macie::client::HttpMacieClient;

/// API clients and settings shared by all handlers of the AWS provider
#[derive(Clone)]
pub struct AwsClient {
    region: String,
    macie: Arc<dyn MacieApi>,
    cloudcontrol: Arc<dyn CloudControlApi>,
}

impl AwsClient {
    /// Resolve AWS settings and build the service clients
    pub async fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let sdk_config = config.load_sdk_config().await;
        let region = sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .ok_or(ConfigError::MissingRegion)?;

        let http = reqwest::Client::builder().build()?;
        let macie =
            HttpMacieClient::from_sdk_config(&sdk_config, config.macie_endpoint.as_deref(), http)?;
        let cloudcontrol =
            SdkCloudControl::from_sdk_config(&sdk_config, config.cloudcontrol_endpoint.as_deref());

        log::debug!("Configured AWS clients for region {}", region);

        Ok(Self::with_clients(
            region,
            Arc::new(macie),
            Arc::new(cloudcontrol),
        ))
    }

    pub fn with_clients(
        region: impl Into<String>,
        macie: Arc<dyn MacieApi>,
        cloudcontrol: Arc<dyn CloudControlApi>,
    ) -> Self {
        Self {
            region: region.into(),
            macie,
            cloudcontrol,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn macie(&self) -> &dyn MacieApi {
        self.macie.as_ref()
    }

    pub fn cloudcontrol(&self) -> &dyn CloudControlApi {
        self.cloudcontrol.as_ref()
    }
}
