//! Lineage graph types
//!
//! Nodes, edges and flows are produced by the ingestion side (manifest/DAG/SQL
//! parsers and storage) and are read-only inputs to everything in this workspace.

use serde::{Deserialize, Serialize};

/// Kind of asset a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Physical table
    Table,

    /// Database view
    View,

    /// dbt model (or similar transformation)
    Model,

    /// Declared source
    Source,

    /// Seed file loaded into the warehouse
    Seed,

    /// Anything living outside the pipeline (reverse ETL targets, BI tools, ...)
    External,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Model => "model",
            Self::Source => "source",
            Self::Seed => "seed",
            Self::External => "external",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse pipeline-stage label inferred from naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticLayer {
    Source,
    Staging,
    Intermediate,
    Mart,
    Report,
    Transform,
    External,
}

impl SemanticLayer {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Staging => "staging",
            Self::Intermediate => "intermediate",
            Self::Mart => "mart",
            Self::Report => "report",
            Self::Transform => "transform",
            Self::External => "external",
        }
    }

    /// Label with a leading capital, used in human-readable text
    pub fn title(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Staging => "Staging",
            Self::Intermediate => "Intermediate",
            Self::Mart => "Mart",
            Self::Report => "Report",
            Self::Transform => "Transform",
            Self::External => "External",
        }
    }
}

impl std::fmt::Display for SemanticLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SemanticLayer {
    type Err = UnknownSemanticLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "staging" => Ok(Self::Staging),
            "intermediate" => Ok(Self::Intermediate),
            "mart" => Ok(Self::Mart),
            "report" => Ok(Self::Report),
            "transform" => Ok(Self::Transform),
            "external" => Ok(Self::External),
            _ => Err(UnknownSemanticLayer(s.to_string())),
        }
    }
}

/// Returned when parsing an unrecognized semantic layer label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown semantic layer: {0}")]
pub struct UnknownSemanticLayer(pub String);

/// A table, model or other asset in the lineage graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, stable identifier
    pub id: String,

    /// Display name (e.g. "stg_sfdc__accounts")
    pub name: String,

    /// Asset kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Precomputed layout layer, only consulted when rendering a flow without an anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_layer: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_layer: Option<SemanticLayer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_score: Option<f64>,
}

impl Node {
    /// Create a node with only the required fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            subtype: None,
            group_id: None,
            layout_layer: None,
            semantic_layer: None,
            importance_score: None,
        }
    }

    /// Set the precomputed layout layer
    pub fn with_layout_layer(mut self, layer: i32) -> Self {
        self.layout_layer = Some(layer);
        self
    }

    /// Set the persisted semantic layer
    pub fn with_semantic_layer(mut self, layer: SemanticLayer) -> Self {
        self.semantic_layer = Some(layer);
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }
}

/// A directed dependency: `from` feeds `to`
///
/// Parallel edges between the same pair are allowed as long as ids differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,

    /// Relationship kind (e.g. "ref", "source", "sql")
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            edge_type: edge_type.into(),
        }
    }
}

/// A named, precomputed slice of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub name: String,

    /// Ids of the nodes belonging to this flow
    #[serde(default)]
    pub member_nodes: Vec<String>,
}

impl Flow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, member_nodes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            member_nodes,
        }
    }

    /// Check whether a node id is a member of this flow
    pub fn contains(&self, node_id: &str) -> bool {
        self.member_nodes.iter().any(|id| id == node_id)
    }
}
