//! AWS provider implementation
//!
//! [`AwsProvider`] folds every service package into one registry and routes
//! each host call to the handler registered for the resource type.

use cumulus_core::provider::{
    BoxFuture, Provider, ProviderError, ProviderResult, ResourceType,
};
use cumulus_core::resource::{Resource, ResourceId, State};
use cumulus_core::schema::ResourceSchema;
use cumulus_core::service::{Registry, RegistryError, ResourceHandler, ServicePackage};

use crate::config::ProviderConfig;
use crate::conns::AwsClient;
use crate::service::{macie, medialive};

/// All service packages of this provider
pub fn service_packages() -> Vec<Box<dyn ServicePackage<AwsClient>>> {
    vec![macie::service_package(), medialive::service_package()]
}

/// A registered resource type as seen by the host
struct RegisteredType {
    name: String,
    schema: ResourceSchema,
}

impl ResourceType for RegisteredType {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> ResourceSchema {
        self.schema.clone()
    }
}

/// AWS Provider
pub struct AwsProvider {
    client: AwsClient,
    registry: Registry<AwsClient>,
}

impl AwsProvider {
    /// Create a provider from configuration, resolving credentials and region
    pub async fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = AwsClient::new(config).await.map_err(|e| {
            ProviderError::new(format!("configuring AWS provider: {}", e)).with_cause(e)
        })?;
        Self::with_client(client).map_err(|e| {
            ProviderError::new(format!("registering AWS resources: {}", e)).with_cause(e)
        })
    }

    /// Create a provider around existing API clients
    pub fn with_client(client: AwsClient) -> Result<Self, RegistryError> {
        let registry = Registry::from_packages(&service_packages())?;
        Ok(Self { client, registry })
    }

    pub fn region(&self) -> &str {
        self.client.region()
    }

    pub fn registry(&self) -> &Registry<AwsClient> {
        &self.registry
    }

    fn handler(&self, id: &ResourceId) -> ProviderResult<&dyn ResourceHandler<AwsClient>> {
        self.registry.resource(&id.resource_type).ok_or_else(|| {
            ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
                .for_resource(id.clone())
        })
    }
}

fn with_resource_id(id: &ResourceId) -> impl FnOnce(ProviderError) -> ProviderError + '_ {
    move |e| {
        if e.resource_id.is_some() {
            e
        } else {
            e.for_resource(id.clone())
        }
    }
}

impl Provider for AwsProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        self.registry
            .resource_type_names()
            .into_iter()
            .filter_map(|name| {
                self.registry.resource(name).map(|handler| {
                    Box::new(RegisteredType {
                        name: name.to_string(),
                        schema: handler.schema(),
                    }) as Box<dyn ResourceType>
                })
            })
            .collect()
    }

    fn schema(&self, resource_type: &str) -> Option<ResourceSchema> {
        self.registry.resource(resource_type).map(|h| h.schema())
    }

    fn read(&self, prior: &State) -> BoxFuture<'_, ProviderResult<State>> {
        let prior = prior.clone();
        Box::pin(async move {
            let handler = self.handler(&prior.id)?;
            handler
                .read(&self.client, &prior)
                .await
                .map_err(with_resource_id(&prior.id))
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            let handler = self.handler(&resource.id)?;
            handler
                .create(&self.client, &resource)
                .await
                .map_err(with_resource_id(&resource.id))
        })
    }

    fn update(&self, from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move {
            let handler = self.handler(&to.id)?;
            handler
                .update(&self.client, &from, &to)
                .await
                .map_err(with_resource_id(&to.id))
        })
    }

    fn delete(&self, state: &State) -> BoxFuture<'_, ProviderResult<()>> {
        let state = state.clone();
        Box::pin(async move {
            let handler = self.handler(&state.id)?;
            handler
                .delete(&self.client, &state)
                .await
                .map_err(with_resource_id(&state.id))
        })
    }
}
