//! Core volume types: records, summaries, and driver capabilities.
//!
//! These types form the data model shared by the registry, dispatcher, and
//! backend implementations.  The wire-facing projections use the protocol's
//! PascalCase field names so they can be embedded directly in the response
//! envelope.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Volume record
// ---------------------------------------------------------------------------

/// Full metadata for a registered volume.
///
/// `name`, `mount_point`, and `options` are fixed at creation; `status` is
/// owned by the backend and refreshed on every `Get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRecord {
    /// Unique volume name, never empty for a stored record.
    #[serde(rename = "Name")]
    pub name: String,
    /// Filesystem path assigned by the backend at provision time.
    #[serde(rename = "Mountpoint")]
    pub mount_point: String,
    /// Creation-time parameters forwarded to the backend.
    #[serde(rename = "Options", default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, String>,
    /// Backend-reported metadata (e.g. free capacity, mount state).
    #[serde(rename = "Status", default, skip_serializing_if = "HashMap::is_empty")]
    pub status: HashMap<String, serde_json::Value>,
}

/// The `List` projection of a [`VolumeRecord`]: name and mount point only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeSummary {
    /// Volume name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Mount point path.
    #[serde(rename = "Mountpoint", default, skip_serializing_if = "String::is_empty")]
    pub mount_point: String,
}

impl From<&VolumeRecord> for VolumeSummary {
    fn from(record: &VolumeRecord) -> Self {
        Self {
            name: record.name.clone(),
            mount_point: record.mount_point.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Visibility scope of the volumes managed by a driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Volumes exist only on the local host.
    Local,
    /// Volumes are shared across a cluster.
    Global,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// Capabilities advertised by the driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    /// Volume visibility scope.
    #[serde(rename = "Scope")]
    pub scope: Scope,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { scope: Scope::Local }
    }
}
