//! Cleaning options.
//!
//! Options are built once per run, either from defaults, from a YAML config
//! file, or from command-line flags layered on top, and are read-only after.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CleanupError;

/// Which half of the resource state to keep when preservation is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMode {
    /// Keep user intent; drop platform-assigned fields.
    #[default]
    Desired,
    /// Keep platform-assigned fields; drop user intent.
    Runtime,
}

impl std::fmt::Display for StateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateMode::Desired => write!(f, "desired"),
            StateMode::Runtime => write!(f, "runtime"),
        }
    }
}

/// CleanOptions controls which fields the rule sets remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanOptions {
    pub remove_managed_fields: bool,
    pub remove_status: bool,
    pub remove_namespace: bool,
    /// Run the structural pruner after the rule sets.
    pub remove_empty: bool,
    pub cleanup_finalizers: bool,
    /// Turn orphaned ReplicaSet pods back into Deployments.
    pub revert_pod_to_controller: bool,
    /// Gate removals through the per-kind state tables.
    pub preserve_resource_state: bool,
    pub resource_state_mode: StateMode,
    /// Label keys to drop, matched exactly.
    pub remove_labels: Vec<String>,
    /// Annotation keys to drop, matched exactly, on top of the built-in list.
    pub remove_annotations: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            remove_managed_fields: true,
            remove_status: true,
            remove_namespace: false,
            remove_empty: true,
            cleanup_finalizers: true,
            revert_pod_to_controller: false,
            preserve_resource_state: false,
            resource_state_mode: StateMode::Desired,
            remove_labels: Vec::new(),
            remove_annotations: Vec::new(),
        }
    }
}

impl CleanOptions {
    /// Parses options from YAML. Missing keys take their default value.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(CleanOptions::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Loads options from a YAML config file.
    pub fn load(path: &Path) -> Result<Self, CleanupError> {
        let content = fs::read_to_string(path).map_err(|source| CleanupError::Io {
            context: format!("failed to read config file {}", path.display()),
            source,
        })?;
        CleanOptions::from_yaml(&content).map_err(|source| CleanupError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// Enables state preservation in the given mode.
    pub fn with_preserved_state(mut self, mode: StateMode) -> Self {
        self.preserve_resource_state = true;
        self.resource_state_mode = mode;
        self
    }

    /// Returns the preservation mode if preservation is enabled.
    pub fn preserved_mode(&self) -> Option<StateMode> {
        self.preserve_resource_state.then_some(self.resource_state_mode)
    }
}
