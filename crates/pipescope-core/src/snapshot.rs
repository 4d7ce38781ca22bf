//! Graph snapshot document (stable v1)
//!
//! A snapshot bundles the node, edge and flow lists the engine works on.
//! It is what the storage layer hands over per request, serialized as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::model::{Edge, Flow, Node};

/// Snapshot schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl SnapshotVersion {
    /// Current snapshot schema version
    pub const CURRENT: SnapshotVersion = SnapshotVersion { major: 1, minor: 0 };
}

impl Default for SnapshotVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl std::fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Immutable view of the full lineage graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub version: SnapshotVersion,

    /// Timestamp (RFC 3339)
    #[serde(default = "now_rfc3339")]
    pub generated_at: String,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default)]
    pub flows: Vec<Flow>,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl GraphSnapshot {
    /// Create a snapshot from already-loaded lists
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, flows: Vec<Flow>) -> Self {
        Self {
            version: SnapshotVersion::CURRENT,
            generated_at: now_rfc3339(),
            nodes,
            edges,
            flows,
        }
    }

    /// Load snapshot from file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SnapshotError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse snapshot from JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)
            .map_err(|e| SnapshotError::ParseError(e.to_string()))?;

        if snapshot.version.major != SnapshotVersion::CURRENT.major {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        Ok(snapshot)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializeError(e.to_string()))
    }

    /// Save to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| SnapshotError::IoError(path.display().to_string(), e.to_string()))
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id, falling back to an exact name match
    pub fn resolve_node(&self, id_or_name: &str) -> Option<&Node> {
        self.node(id_or_name)
            .or_else(|| self.nodes.iter().find(|n| n.name == id_or_name))
    }

    /// Look up a flow by id
    pub fn flow(&self, id: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.id == id)
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

/// Snapshot loading errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse snapshot JSON: {0}")]
    ParseError(String),

    #[error("Failed to serialize snapshot: {0}")]
    SerializeError(String),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(SnapshotVersion),
}
