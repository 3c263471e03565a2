//! Schema-driven resource handler backed by the Cloud Control API

use std::collections::HashMap;

use cumulus_core::provider::{BoxFuture, ProviderError, ProviderResult};
use cumulus_core::resource::{Resource, ResourceId, State, Value};
use cumulus_core::schema::ResourceSchema;
use cumulus_core::service::ResourceHandler;
use serde_json::json;

use super::CcSchemaConfig;
use super::convert::{build_tags, from_aws, parse_tags, property_name, to_aws};
use crate::conns::AwsClient;

const TAGS_ATTRIBUTE: &str = "tags";
const TAGS_PROPERTY: &str = "Tags";

/// Generic handler for one CloudFormation resource type
pub struct CloudControlResource {
    config: CcSchemaConfig,
    self_named: bool,
}

impl CloudControlResource {
    pub fn new(config: CcSchemaConfig) -> Self {
        Self {
            config,
            self_named: false,
        }
    }

    /// Report the type name from the handler, for framework-style registration
    pub fn self_named(mut self) -> Self {
        self.self_named = true;
        self
    }

    pub fn aws_type_name(&self) -> &'static str {
        self.config.aws_type_name
    }

    async fn read_resource(
        &self,
        conn: &AwsClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let props = match conn
            .cloudcontrol()
            .get_resource(self.config.aws_type_name, identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))?
        {
            Some(props) => props,
            None => {
                log::warn!(
                    "{} ({}) not found, removing from state",
                    self.config.aws_type_name,
                    identifier
                );
                return Ok(State::not_found(id.clone()));
            }
        };

        let mut attributes = HashMap::new();

        for (name, attr_schema) in &self.config.schema.attributes {
            if name == TAGS_ATTRIBUTE {
                continue;
            }
            if let Some(value) = props.get(property_name(attr_schema).as_str())
                && let Some(v) = from_aws(&attr_schema.attr_type, value)
            {
                attributes.insert(name.clone(), v);
            }
        }

        if let Some(format) = self.config.tag_format
            && let Some(tags) = props.get(TAGS_PROPERTY)
        {
            let tags_map = parse_tags(format, tags);
            if !tags_map.is_empty() {
                attributes.insert(TAGS_ATTRIBUTE.to_string(), Value::Map(tags_map));
            }
        }

        Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
    }

    async fn create_resource(&self, conn: &AwsClient, resource: &Resource) -> ProviderResult<State> {
        let attributes = self.config.schema.apply_defaults(&resource.attributes);
        let mut desired_state = serde_json::Map::new();

        for (name, attr_schema) in &self.config.schema.attributes {
            if name == TAGS_ATTRIBUTE || attr_schema.read_only {
                continue;
            }
            if let Some(value) = attributes.get(name) {
                desired_state.insert(
                    property_name(attr_schema),
                    to_aws(&attr_schema.attr_type, value),
                );
            }
        }

        if let Some(format) = self.config.tag_format
            && let Some(Value::Map(tags)) = attributes.get(TAGS_ATTRIBUTE)
            && !tags.is_empty()
        {
            desired_state.insert(TAGS_PROPERTY.to_string(), build_tags(format, tags));
        }

        let identifier = conn
            .cloudcontrol()
            .create_resource(
                self.config.aws_type_name,
                serde_json::Value::Object(desired_state),
            )
            .await
            .map_err(|e| e.for_resource(resource.id.clone()))?;

        let state = self.read_resource(conn, &resource.id, &identifier).await?;
        if !state.exists {
            return Err(ProviderError::new(format!(
                "{} ({}) not found after creation",
                self.config.aws_type_name, identifier
            ))
            .for_resource(resource.id.clone()));
        }
        Ok(state)
    }

    async fn update_resource(
        &self,
        conn: &AwsClient,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let identifier = from.identifier.as_deref().ok_or_else(|| {
            ProviderError::new("Resource identifier is required for update")
                .for_resource(to.id.clone())
        })?;

        let desired = self.config.schema.apply_defaults(&to.attributes);

        let replaced = self
            .config
            .schema
            .replacement_attributes(&from.attributes, &desired);
        if !replaced.is_empty() {
            return Err(ProviderError::new(format!(
                "changing {} requires replacement, delete and recreate",
                replaced.join(", ")
            ))
            .for_resource(to.id.clone()));
        }

        let patch_ops = self.patch_operations(&from.attributes, &desired);

        conn.cloudcontrol()
            .update_resource(self.config.aws_type_name, identifier, patch_ops)
            .await
            .map_err(|e| e.for_resource(to.id.clone()))?;

        self.read_resource(conn, &to.id, identifier).await
    }

    /// JSON Patch operations turning `current` into `desired`
    fn patch_operations(
        &self,
        current: &HashMap<String, Value>,
        desired: &HashMap<String, Value>,
    ) -> Vec<serde_json::Value> {
        let mut names: Vec<&String> = self.config.schema.attributes.keys().collect();
        names.sort();

        let mut patch_ops = Vec::new();
        for name in names {
            let attr_schema = &self.config.schema.attributes[name];
            if attr_schema.read_only {
                continue;
            }

            let path = if name == TAGS_ATTRIBUTE {
                if self.config.tag_format.is_none() {
                    continue;
                }
                format!("/{}", TAGS_PROPERTY)
            } else {
                format!("/{}", property_name(attr_schema))
            };

            match (current.get(name), desired.get(name)) {
                (old, Some(new)) if old != Some(new) => {
                    let value = match (name.as_str(), self.config.tag_format, new) {
                        (TAGS_ATTRIBUTE, Some(format), Value::Map(tags)) => build_tags(format, tags),
                        _ => to_aws(&attr_schema.attr_type, new),
                    };
                    let op = if old.is_some() { "replace" } else { "add" };
                    patch_ops.push(json!({"op": op, "path": path, "value": value}));
                }
                (Some(_), None) if !attr_schema.computed => {
                    patch_ops.push(json!({"op": "remove", "path": path}));
                }
                _ => {}
            }
        }
        patch_ops
    }

    async fn delete_resource(&self, conn: &AwsClient, state: &State) -> ProviderResult<()> {
        let Some(identifier) = state.identifier.as_deref() else {
            log::warn!("{} has no identifier, nothing to delete", state.id);
            return Ok(());
        };

        conn.cloudcontrol()
            .delete_resource(self.config.aws_type_name, identifier)
            .await
            .map_err(|e| e.for_resource(state.id.clone()))
    }
}

impl ResourceHandler<AwsClient> for CloudControlResource {
    fn type_name(&self) -> Option<&'static str> {
        self.self_named.then_some(self.config.type_name)
    }

    fn schema(&self) -> ResourceSchema {
        self.config.schema.clone()
    }

    fn read<'a>(
        &'a self,
        conn: &'a AwsClient,
        prior: &'a State,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(async move {
            match prior.identifier.as_deref() {
                Some(identifier) => self.read_resource(conn, &prior.id, identifier).await,
                None => Ok(State::not_found(prior.id.clone())),
            }
        })
    }

    fn create<'a>(
        &'a self,
        conn: &'a AwsClient,
        resource: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(self.create_resource(conn, resource))
    }

    fn update<'a>(
        &'a self,
        conn: &'a AwsClient,
        from: &'a State,
        to: &'a Resource,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(self.update_resource(conn, from, to))
    }

    fn delete<'a>(
        &'a self,
        conn: &'a AwsClient,
        state: &'a State,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.delete_resource(conn, state))
    }
}
