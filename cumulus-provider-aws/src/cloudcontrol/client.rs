//! Cloud Control API client on top of the AWS SDK

use std::time::Duration;

use aws_config::SdkConfig;
use aws_sdk_cloudcontrol::Client as CloudControlClient;
use aws_sdk_cloudcontrol::types::{HandlerErrorCode, OperationStatus};
use cumulus_core::provider::{BoxFuture, ProviderError, ProviderResult};

use super::CloudControlApi;

/// Cloud Control client that waits for each mutating request to settle
pub struct SdkCloudControl {
    client: CloudControlClient,
    max_attempts: u32,
    delay: Duration,
}

impl SdkCloudControl {
    pub fn new(client: CloudControlClient) -> Self {
        Self {
            client,
            max_attempts: 120,
            delay: Duration::from_secs(5),
        }
    }

    /// Build a client from the shared SDK configuration
    pub fn from_sdk_config(config: &SdkConfig, endpoint_override: Option<&str>) -> Self {
        let mut builder = aws_sdk_cloudcontrol::config::Builder::from(config);
        if let Some(url) = endpoint_override {
            builder = builder.endpoint_url(url);
        }
        Self::new(CloudControlClient::from_conf(builder.build()))
    }

    /// Get a resource by identifier
    async fn cc_get_resource(
        &self,
        type_name: &str,
        identifier: &str,
    ) -> ProviderResult<Option<serde_json::Value>> {
        log::debug!("Reading {} ({})", type_name, identifier);

        let result = self
            .client
            .get_resource()
            .type_name(type_name)
            .identifier(identifier)
            .send()
            .await;

        match result {
            Ok(response) => {
                if let Some(desc) = response.resource_description()
                    && let Some(props_str) = desc.properties()
                {
                    let props: serde_json::Value = serde_json::from_str(props_str).map_err(|e| {
                        ProviderError::new(format!(
                            "reading {} ({}): invalid properties: {}",
                            type_name, identifier, e
                        ))
                        .with_cause(e)
                    })?;
                    Ok(Some(props))
                } else {
                    Ok(None)
                }
            }
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception())
                {
                    Ok(None)
                } else {
                    Err(ProviderError::new(format!(
                        "reading {} ({}): {:?}",
                        type_name, identifier, e
                    )))
                }
            }
        }
    }

    /// Create a resource
    async fn cc_create_resource(
        &self,
        type_name: &str,
        desired_state: serde_json::Value,
    ) -> ProviderResult<String> {
        log::debug!("Creating {}: {}", type_name, desired_state);

        let result = self
            .client
            .create_resource()
            .type_name(type_name)
            .desired_state(desired_state.to_string())
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("creating {}: {:?}", type_name, e)))?;

        let request_token = result
            .progress_event()
            .and_then(|p| p.request_token())
            .ok_or_else(|| ProviderError::new("No request token returned"))?;

        self.wait_for_operation(request_token, false).await
    }

    /// Update a resource with a JSON Patch document
    async fn cc_update_resource(
        &self,
        type_name: &str,
        identifier: &str,
        patch_ops: Vec<serde_json::Value>,
    ) -> ProviderResult<()> {
        if patch_ops.is_empty() {
            return Ok(());
        }

        let patch_document = serde_json::to_string(&patch_ops)
            .map_err(|e| ProviderError::new(format!("Failed to build patch: {}", e)))?;

        log::debug!("Updating {} ({}): {}", type_name, identifier, patch_document);

        let result = self
            .client
            .update_resource()
            .type_name(type_name)
            .identifier(identifier)
            .patch_document(patch_document)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(format!("updating {} ({}): {:?}", type_name, identifier, e))
            })?;

        if let Some(request_token) = result.progress_event().and_then(|p| p.request_token()) {
            self.wait_for_operation(request_token, false).await?;
        }

        Ok(())
    }

    /// Delete a resource
    async fn cc_delete_resource(&self, type_name: &str, identifier: &str) -> ProviderResult<()> {
        log::debug!("Deleting {} ({})", type_name, identifier);

        let result = self
            .client
            .delete_resource()
            .type_name(type_name)
            .identifier(identifier)
            .send()
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) =>
            {
                log::warn!("{} ({}) already deleted", type_name, identifier);
                return Ok(());
            }
            Err(e) => {
                return Err(ProviderError::new(format!(
                    "deleting {} ({}): {:?}",
                    type_name, identifier, e
                )));
            }
        };

        if let Some(request_token) = result.progress_event().and_then(|p| p.request_token()) {
            self.wait_for_operation(request_token, true).await?;
        }

        Ok(())
    }

    /// Wait for a Cloud Control operation to complete
    ///
    /// Returns the identifier reported by the final progress event.
    async fn wait_for_operation(
        &self,
        request_token: &str,
        tolerate_not_found: bool,
    ) -> ProviderResult<String> {
        for _ in 0..self.max_attempts {
            let status = self
                .client
                .get_resource_request_status()
                .request_token(request_token)
                .send()
                .await
                .map_err(|e| {
                    ProviderError::new(format!("Failed to get operation status: {:?}", e))
                })?;

            if let Some(progress) = status.progress_event() {
                match progress.operation_status() {
                    Some(OperationStatus::Success) => {
                        return Ok(progress.identifier().unwrap_or("").to_string());
                    }
                    Some(OperationStatus::Failed) => {
                        if tolerate_not_found
                            && progress.error_code() == Some(&HandlerErrorCode::NotFound)
                        {
                            return Ok(progress.identifier().unwrap_or("").to_string());
                        }
                        let msg = progress.status_message().unwrap_or("Unknown error");
                        return Err(ProviderError::new(format!("Operation failed: {}", msg)));
                    }
                    Some(OperationStatus::CancelComplete) => {
                        return Err(ProviderError::new("Operation was cancelled"));
                    }
                    _ => {}
                }
            }

            tokio::time::sleep(self.delay).await;
        }

        Err(ProviderError::new("Operation timed out"))
    }
}

impl CloudControlApi for SdkCloudControl {
    fn get_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<serde_json::Value>>> {
        Box::pin(self.cc_get_resource(type_name, identifier))
    }

    fn create_resource<'a>(
        &'a self,
        type_name: &'a str,
        desired_state: serde_json::Value,
    ) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(self.cc_create_resource(type_name, desired_state))
    }

    fn update_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
        patch_ops: Vec<serde_json::Value>,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.cc_update_resource(type_name, identifier, patch_ops))
    }

    fn delete_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.cc_delete_resource(type_name, identifier))
    }
}
