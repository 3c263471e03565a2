//! State file structures for persisting resource state

use std::collections::HashMap;
use std::path::Path;

use cumulus_core::resource::{ResourceId, State, Value};
use serde::{Deserialize, Serialize};

/// Default state file name
pub const DEFAULT_STATE_FILE: &str = "cumulus.state.json";

/// State file error
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse state file {path}: {message}")]
    InvalidState { path: String, message: String },

    #[error("unsupported state file version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// The state file persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Version of Cumulus that last modified this state
    pub cumulus_version: String,
    /// All managed resources
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    /// Current state file format version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            cumulus_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Load a state file; a missing file is an empty state
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| StateError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let state: StateFile =
            serde_json::from_str(&content).map_err(|e| StateError::InvalidState {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if state.version != Self::CURRENT_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
                expected: Self::CURRENT_VERSION,
            });
        }
        Ok(state)
    }

    /// Write the state file, bumping the serial
    pub fn save(&mut self, path: &Path) -> Result<(), StateError> {
        self.serial += 1;
        self.cumulus_version = env!("CARGO_PKG_VERSION").to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| StateError::InvalidState {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| StateError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn find_resource(&self, id: &ResourceId) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == id.resource_type && r.name == id.name)
    }

    /// Add or replace the entry for a resource
    pub fn upsert(&mut self, state: &State) {
        let entry = ResourceState::from_state(state);
        match self
            .resources
            .iter_mut()
            .find(|r| r.resource_type == entry.resource_type && r.name == entry.name)
        {
            Some(existing) => *existing = entry,
            None => self.resources.push(entry),
        }
    }

    pub fn remove(&mut self, id: &ResourceId) -> Option<ResourceState> {
        let pos = self
            .resources
            .iter()
            .position(|r| r.resource_type == id.resource_type && r.name == id.name)?;
        Some(self.resources.remove(pos))
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_type: String,
    pub name: String,
    /// Provider-side identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    pub fn from_state(state: &State) -> Self {
        Self {
            resource_type: state.id.resource_type.clone(),
            name: state.id.name.clone(),
            identifier: state.identifier.clone(),
            attributes: state
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        }
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::new(&self.resource_type, &self.name)
    }

    /// The recorded state, as last seen by the provider
    pub fn to_state(&self) -> State {
        let attributes: HashMap<String, Value> = self
            .attributes
            .iter()
            .filter_map(|(k, v)| Value::from_json(v).map(|v| (k.clone(), v)))
            .collect();
        let state = State::existing(self.id(), attributes);
        match &self.identifier {
            Some(identifier) => state.with_identifier(identifier),
            None => state,
        }
    }
}
