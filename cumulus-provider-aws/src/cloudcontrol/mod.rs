//! AWS Cloud Control API support
//!
//! ## Module Structure
//!
//! - `client` - [`CloudControlApi`] implementation on top of `aws-sdk-cloudcontrol`
//! - `convert` - Attribute <-> CloudFormation property conversion
//! - `resource` - Generic schema-driven resource handler

pub mod client;
pub mod convert;
pub mod resource;

pub use client::SdkCloudControl;
pub use resource::CloudControlResource;

use cumulus_core::provider::{BoxFuture, ProviderResult};
use cumulus_core::schema::ResourceSchema;

/// How a CloudFormation type represents its tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    /// `[{"Key": "k", "Value": "v"}, ...]`
    KeyValueList,
    /// `{"k": "v", ...}`
    JsonObject,
}

/// Cloud Control schema configuration
///
/// Combines a ResourceSchema with the CloudFormation metadata the generic
/// handler needs.
pub struct CcSchemaConfig {
    /// Host-facing type name (e.g., "aws_medialive_input")
    pub type_name: &'static str,
    /// AWS CloudFormation type name (e.g., "AWS::MediaLive::Input")
    pub aws_type_name: &'static str,
    /// Tag representation, `None` when the type is not taggable
    pub tag_format: Option<TagFormat>,
    /// The resource schema with attribute definitions
    pub schema: ResourceSchema,
}

/// The Cloud Control operations used by the generic handler
pub trait CloudControlApi: Send + Sync {
    /// Current properties of a resource, `None` when it does not exist
    fn get_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<serde_json::Value>>>;

    /// Create a resource and wait for completion; returns its identifier
    fn create_resource<'a>(
        &'a self,
        type_name: &'a str,
        desired_state: serde_json::Value,
    ) -> BoxFuture<'a, ProviderResult<String>>;

    /// Apply a JSON Patch document and wait for completion
    fn update_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
        patch_ops: Vec<serde_json::Value>,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Delete a resource and wait for completion; a missing resource is not an error
    fn delete_resource<'a>(
        &'a self,
        type_name: &'a str,
        identifier: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;
}
