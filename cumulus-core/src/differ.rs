//! Differ - Compare desired state with current state
//!
//! Compares the "desired state" declared in configuration with the "current
//! state" fetched from the Provider and decides which operation is required.

use std::collections::HashMap;

use crate::resource::{Resource, ResourceId, State, Value};
use crate::schema::{ResourceSchema, normalized};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists but a force-new attribute changed -> delete then create
    Replace {
        id: ResourceId,
        from: State,
        to: Resource,
        replaced_by: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
///
/// Defaults from the schema are applied to the desired attributes first, so an
/// omitted attribute that defaults to the current value is not a change.
pub fn diff(desired: &Resource, current: &State, schema: &ResourceSchema) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let desired_attrs = schema.apply_defaults(&desired.attributes);

    let replaced_by = schema.replacement_attributes(&current.attributes, &desired_attrs);
    if !replaced_by.is_empty() {
        return Diff::Replace {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            replaced_by,
        };
    }

    let changed = find_changed_attributes(&desired_attrs, &current.attributes);

    if changed.is_empty() {
        Diff::NoChange(desired.id.clone())
    } else {
        Diff::Update {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find changed attributes between desired and current state.
/// An empty string matches an absent value.
fn find_changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, desired_value) in desired {
        if normalized(Some(desired_value)) != normalized(current.get(key)) {
            changed.push(key.clone());
        }
    }

    changed.sort();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, AttributeType};

    fn schema() -> ResourceSchema {
        ResourceSchema::new("test_thing")
            .attribute(AttributeSchema::new("name", AttributeType::String).force_new())
            .attribute(AttributeSchema::new("size", AttributeType::Int))
            .attribute(
                AttributeSchema::new("mode", AttributeType::String)
                    .with_default(Value::String("auto".to_string())),
            )
    }

    fn current(attrs: &[(&str, Value)]) -> State {
        State::existing(
            ResourceId::new("test_thing", "t"),
            attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn missing_resource_is_created() {
        let desired = Resource::new("test_thing", "t");
        let state = State::not_found(desired.id.clone());
        assert!(matches!(diff(&desired, &state, &schema()), Diff::Create(_)));
    }

    #[test]
    fn defaulted_attribute_is_not_a_change() {
        let desired = Resource::new("test_thing", "t")
            .with_attribute("name", Value::String("a".to_string()));
        let state = current(&[
            ("name", Value::String("a".to_string())),
            ("mode", Value::String("auto".to_string())),
        ]);
        let d = diff(&desired, &state, &schema());
        assert!(!d.is_change());
    }

    #[test]
    fn changed_attribute_is_update() {
        let desired = Resource::new("test_thing", "t")
            .with_attribute("name", Value::String("a".to_string()))
            .with_attribute("size", Value::Int(2));
        let state = current(&[
            ("name", Value::String("a".to_string())),
            ("size", Value::Int(1)),
            ("mode", Value::String("auto".to_string())),
        ]);
        match diff(&desired, &state, &schema()) {
            Diff::Update {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["size".to_string()]),
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn force_new_change_is_replace() {
        let desired = Resource::new("test_thing", "t")
            .with_attribute("name", Value::String("b".to_string()))
            .with_attribute("size", Value::Int(2));
        let state = current(&[("name", Value::String("a".to_string()))]);
        match diff(&desired, &state, &schema()) {
            Diff::Replace { replaced_by, .. } => assert_eq!(replaced_by, vec!["name".to_string()]),
            other => panic!("expected replace, got {:?}", other),
        }
    }

    #[test]
    fn empty_string_matches_absent_value() {
        let schema = schema().attribute(AttributeSchema::new("label", AttributeType::String));
        let desired = Resource::new("test_thing", "t")
            .with_attribute("name", Value::String("a".to_string()))
            .with_attribute("label", Value::String(String::new()));
        let state = current(&[
            ("name", Value::String("a".to_string())),
            ("mode", Value::String("auto".to_string())),
        ]);
        assert!(!diff(&desired, &state, &schema).is_change());
    }

    #[test]
    fn empty_string_against_set_value_is_update() {
        let schema = schema().attribute(AttributeSchema::new("label", AttributeType::String));
        let desired = Resource::new("test_thing", "t")
            .with_attribute("name", Value::String("a".to_string()))
            .with_attribute("label", Value::String(String::new()));
        let state = current(&[
            ("name", Value::String("a".to_string())),
            ("mode", Value::String("auto".to_string())),
            ("label", Value::String("x".to_string())),
        ]);
        match diff(&desired, &state, &schema) {
            Diff::Update {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["label".to_string()]),
            other => panic!("expected update, got {:?}", other),
        }
    }
}
