//! Conversion between attribute values and CloudFormation properties
//!
//! Attribute names are snake_case, CloudFormation property names are
//! PascalCase. Struct fields use their `provider_name` when set and fall back
//! to a case conversion. Free-form documents have every key converted.

use std::collections::HashMap;

use cumulus_core::resource::Value;
use cumulus_core::schema::{AttributeSchema, AttributeType};
use heck::{ToSnakeCase, ToUpperCamelCase};
use serde_json::json;

use super::TagFormat;

/// CloudFormation property name of an attribute
pub fn property_name(schema: &AttributeSchema) -> String {
    schema
        .provider_name
        .clone()
        .unwrap_or_else(|| schema.name.to_upper_camel_case())
}

/// Convert an attribute value to its CloudFormation JSON form
pub fn to_aws(attr_type: &AttributeType, value: &Value) -> serde_json::Value {
    match (attr_type, value) {
        (AttributeType::Custom { base, .. }, v) => to_aws(base, v),
        (AttributeType::Struct(fields), Value::Map(map)) => {
            let mut out = serde_json::Map::new();
            for (key, v) in map {
                match fields.iter().find(|f| &f.name == key) {
                    Some(field) => {
                        out.insert(property_name(field), to_aws(&field.attr_type, v));
                    }
                    None => {
                        out.insert(key.to_upper_camel_case(), document_to_aws(v));
                    }
                }
            }
            serde_json::Value::Object(out)
        }
        (AttributeType::List(inner), Value::List(items)) => {
            serde_json::Value::Array(items.iter().map(|v| to_aws(inner, v)).collect())
        }
        (AttributeType::Map(inner), Value::Map(map)) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_aws(inner, v)))
                .collect(),
        ),
        (AttributeType::Document, v) => document_to_aws(v),
        (_, v) => v.to_json(),
    }
}

/// Convert a CloudFormation JSON value to an attribute value
pub fn from_aws(attr_type: &AttributeType, json: &serde_json::Value) -> Option<Value> {
    match (attr_type, json) {
        (_, serde_json::Value::Null) => None,
        (AttributeType::Custom { base, .. }, j) => from_aws(base, j),
        (AttributeType::Struct(fields), serde_json::Value::Object(obj)) => {
            let mut out = HashMap::new();
            for (key, j) in obj {
                let converted = match fields.iter().find(|f| property_name(f) == *key) {
                    Some(field) => from_aws(&field.attr_type, j).map(|v| (field.name.clone(), v)),
                    None => document_from_aws(j).map(|v| (key.to_snake_case(), v)),
                };
                if let Some((name, v)) = converted {
                    out.insert(name, v);
                }
            }
            Some(Value::Map(out))
        }
        (AttributeType::List(inner), serde_json::Value::Array(items)) => Some(Value::List(
            items.iter().filter_map(|j| from_aws(inner, j)).collect(),
        )),
        (AttributeType::Map(inner), serde_json::Value::Object(obj)) => Some(Value::Map(
            obj.iter()
                .filter_map(|(k, j)| from_aws(inner, j).map(|v| (k.clone(), v)))
                .collect(),
        )),
        (AttributeType::Document, j) => document_from_aws(j),
        (_, j) => Value::from_json(j),
    }
}

fn document_to_aws(value: &Value) -> serde_json::Value {
    match value {
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_upper_camel_case(), document_to_aws(v)))
                .collect(),
        ),
        Value::List(items) => serde_json::Value::Array(items.iter().map(document_to_aws).collect()),
        other => other.to_json(),
    }
}

fn document_from_aws(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Object(obj) => Some(Value::Map(
            obj.iter()
                .filter_map(|(k, j)| document_from_aws(j).map(|v| (k.to_snake_case(), v)))
                .collect(),
        )),
        serde_json::Value::Array(items) => {
            Some(Value::List(items.iter().filter_map(document_from_aws).collect()))
        }
        other => Value::from_json(other),
    }
}

/// Build the CloudFormation tags property from a `tags` attribute
pub fn build_tags(format: TagFormat, tags: &HashMap<String, Value>) -> serde_json::Value {
    let mut pairs: Vec<(&String, &str)> = tags
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|v| (k, v)))
        .collect();
    pairs.sort();

    match format {
        TagFormat::KeyValueList => serde_json::Value::Array(
            pairs
                .into_iter()
                .map(|(key, value)| json!({"Key": key, "Value": value}))
                .collect(),
        ),
        TagFormat::JsonObject => serde_json::Value::Object(
            pairs
                .into_iter()
                .map(|(key, value)| (key.clone(), json!(value)))
                .collect(),
        ),
    }
}

/// Parse the CloudFormation tags property into a `tags` map
pub fn parse_tags(format: TagFormat, json: &serde_json::Value) -> HashMap<String, Value> {
    let mut tags_map = HashMap::new();
    match format {
        TagFormat::KeyValueList => {
            for tag in json.as_array().into_iter().flatten() {
                if let (Some(key), Some(value)) = (
                    tag.get("Key").and_then(|v| v.as_str()),
                    tag.get("Value").and_then(|v| v.as_str()),
                ) {
                    tags_map.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }
        TagFormat::JsonObject => {
            for (key, value) in json.as_object().into_iter().flatten() {
                if let Some(value) = value.as_str() {
                    tags_map.insert(key.clone(), Value::String(value.to_string()));
                }
            }
        }
    }
    tags_map
}
