//! Configuration file
//!
//! ```json
//! { "provider": { "region": "us-east-1" },
//!   "resources": [ { "type": "aws_macie_s3_bucket_association", "name": "logs",
//!                    "attributes": { "bucket_name": "my-logs" } } ] }
//! ```

use std::collections::HashSet;
use std::path::Path;

use cumulus_core::resource::{Resource, Value};
use cumulus_provider_aws::ProviderConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Like [`ConfigFile::load`], but a missing file is an empty configuration
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|e| format!("{}: {}", path.display(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(format!("Failed to read {}: {}", path.display(), e)),
        }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Parse error: {}", e))
    }

    /// Desired resources, in configuration order
    pub fn resources(&self) -> Result<Vec<Resource>, String> {
        let mut seen = HashSet::new();
        let mut resources = Vec::new();

        for block in &self.resources {
            if !seen.insert((block.resource_type.as_str(), block.name.as_str())) {
                return Err(format!(
                    "Duplicate resource {}.{}",
                    block.resource_type, block.name
                ));
            }

            let mut resource = Resource::new(&block.resource_type, &block.name);
            for (key, value) in &block.attributes {
                // null leaves the attribute unset
                if let Some(v) = Value::from_json(value) {
                    resource.attributes.insert(key.clone(), v);
                }
            }
            resources.push(resource);
        }

        Ok(resources)
    }
}
