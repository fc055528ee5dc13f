//! Document - a single Kubernetes resource as decoded from a manifest.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{Map, Value};

pub const API_VERSION: &str = "apiVersion";
pub const KIND: &str = "kind";
pub const METADATA: &str = "metadata";
pub const SPEC: &str = "spec";
pub const STATUS: &str = "status";
pub const DATA: &str = "data";
pub const STRING_DATA: &str = "stringData";
pub const TYPE: &str = "type";

/// Document wraps the root map of a resource.
///
/// Only the well-known top-level fields get accessors; anything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map,
}

impl Document {
    /// Wraps a decoded value. Returns `None` for anything but a map.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(root) => Some(Document { root }),
            _ => None,
        }
    }

    pub fn api_version(&self) -> &str {
        self.root.get_str(API_VERSION).unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.root.get_str(KIND).unwrap_or_default()
    }

    /// A document with neither kind nor apiVersion is not a resource.
    pub fn is_resource(&self) -> bool {
        !self.kind().is_empty() || !self.api_version().is_empty()
    }

    pub fn name(&self) -> &str {
        self.metadata()
            .and_then(|m| m.get_str("name"))
            .unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.get_str("namespace"))
    }

    pub fn metadata(&self) -> Option<&Map> {
        self.root.get_map(METADATA)
    }

    pub fn metadata_mut(&mut self) -> Option<&mut Map> {
        self.root.get_map_mut(METADATA)
    }

    pub fn spec(&self) -> Option<&Map> {
        self.root.get_map(SPEC)
    }

    pub fn spec_mut(&mut self) -> Option<&mut Map> {
        self.root.get_map_mut(SPEC)
    }

    pub fn data_mut(&mut self) -> Option<&mut Map> {
        self.root.get_map_mut(DATA)
    }

    pub fn secret_type(&self) -> Option<&str> {
        self.root.get_str(TYPE)
    }

    pub fn set_kind(&mut self, kind: &str) {
        self.root.set(KIND, kind);
    }

    pub fn set_api_version(&mut self, api_version: &str) {
        self.root.set(API_VERSION, api_version);
    }

    /// Removes a top-level field entirely.
    pub fn clear(&mut self, field: &str) -> Option<Value> {
        self.root.delete(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.root.set(field, value);
    }

    pub fn root(&self) -> &Map {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Map {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        Value::Map(self.root)
    }
}

impl From<Map> for Document {
    fn from(root: Map) -> Self {
        Document { root }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        if name.is_empty() {
            write!(f, "{}/<unnamed>", self.kind())
        } else {
            write!(f, "{}/{}", self.kind(), name)
        }
    }
}
