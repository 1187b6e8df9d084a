//! Inventory records
//!
//! Hosts and groups are plain attribute maps. Loading and resolving live
//! inventories belongs to the task runner; this module only holds what the
//! inventory printer renders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Whether a record describes a host or a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Host,
    Group,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Host => f.write_str("host"),
            RecordKind::Group => f.write_str("group"),
        }
    }
}

/// A named host or group with arbitrary attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub name: String,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl InventoryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute; `name` falls back to the record name
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.attributes.get(key) {
            Some(value) => Some(value.clone()),
            None if key == "name" => Some(Value::String(self.name.clone())),
            None => None,
        }
    }
}

/// Host and group records in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub hosts: Vec<InventoryRecord>,

    #[serde(default)]
    pub groups: Vec<InventoryRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: InventoryRecord) -> Self {
        self.hosts.push(host);
        self
    }

    pub fn with_group(mut self, group: InventoryRecord) -> Self {
        self.groups.push(group);
        self
    }

    /// Load an inventory dump from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Hosts first, then groups
    pub fn records(&self) -> impl Iterator<Item = (RecordKind, &InventoryRecord)> {
        self.hosts
            .iter()
            .map(|r| (RecordKind::Host, r))
            .chain(self.groups.iter().map(|r| (RecordKind::Group, r)))
    }

    pub fn len(&self) -> usize {
        self.hosts.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.groups.is_empty()
    }
}
