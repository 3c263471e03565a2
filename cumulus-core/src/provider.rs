//! Provider - Trait abstracting resource operations
//!
//! A Provider defines operations for a specific infrastructure (AWS, GCP, etc.).
//! The host drives it one resource operation at a time.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, State};
use crate::schema::ResourceSchema;

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}.{}] {}", id.resource_type, id.name, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "aws_medialive_input")
    fn name(&self) -> &str;

    /// Attribute schema for this resource type
    fn schema(&self) -> ResourceSchema;
}

/// Main Provider trait
///
/// Each infrastructure provider (AWS, GCP, etc.) implements this trait.
/// All operations are async and involve side effects.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "aws")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Schema of a single resource type, if this Provider handles it
    fn schema(&self, resource_type: &str) -> Option<ResourceSchema> {
        self.resource_types()
            .into_iter()
            .find(|t| t.name() == resource_type)
            .map(|t| t.schema())
    }

    /// Get the current state of a resource
    ///
    /// `prior` carries the identifier and the last known attributes.
    /// Returns `State::not_found()` if the resource no longer exists.
    fn read(&self, prior: &State) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource
    ///
    /// Returns State with identifier set to the provider-side ID
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource in place
    fn update(&self, from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource
    fn delete(&self, state: &State) -> BoxFuture<'_, ProviderResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockType;

    impl ResourceType for MockType {
        fn name(&self) -> &str {
            "mock_thing"
        }

        fn schema(&self) -> ResourceSchema {
            ResourceSchema::new("mock_thing")
        }
    }

    /// Knows one type and nothing else
    struct SingleTypeProvider;

    impl Provider for SingleTypeProvider {
        fn name(&self) -> &'static str {
            "single"
        }

        fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
            vec![Box::new(MockType)]
        }

        fn read(&self, prior: &State) -> BoxFuture<'_, ProviderResult<State>> {
            let id = prior.id.clone();
            Box::pin(async move { Ok(State::not_found(id)) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let id = resource.id.clone();
            Box::pin(async move { Err(ProviderError::new("read-only provider").for_resource(id)) })
        }

        fn update(&self, _from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            self.create(to)
        }

        fn delete(&self, _state: &State) -> BoxFuture<'_, ProviderResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn default_schema_lookup_uses_resource_types() {
        let provider = SingleTypeProvider;
        assert!(provider.schema("mock_thing").is_some());
        assert!(provider.schema("other").is_none());
    }

    #[tokio::test]
    async fn errors_carry_resource_id_through_futures() {
        let err = SingleTypeProvider
            .update(
                &State::not_found(ResourceId::new("mock_thing", "a")),
                &Resource::new("mock_thing", "a"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "[mock_thing.a] read-only provider");
    }

    #[test]
    fn cause_is_exposed_as_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let err = ProviderError::new("listing").with_cause(io);
        assert_eq!(err.source().map(|e| e.to_string()), Some("slow".to_string()));
    }

    #[test]
    fn error_display_names_resource() {
        let err = ProviderError::new("boom").for_resource(ResourceId::new("aws_x", "y"));
        assert_eq!(err.to_string(), "[aws_x.y] boom");
        assert_eq!(ProviderError::new("boom").to_string(), "boom");
    }
}
