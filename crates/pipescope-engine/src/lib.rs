//! Pipescope engine - lineage exploration logic
//!
//! This crate implements the decisions behind the lineage dashboard:
//! - Visibility composition (anchor, focus stretching, flows, node cap)
//! - Edge partitioning around a node
//! - Semantic layer classification
//! - Importance scoring for anchor suggestions

pub mod visibility;
pub mod edges;
pub mod classifier;
pub mod importance;

pub use visibility::{
    compute_visibility, get_visibility_description, LayerRange, VisibilityComposer,
    VisibilityReason, VisibilityResult, VisibilityState, VisibleNode,
};
pub use edges::{get_node_edges, NodeEdges};
pub use classifier::{classify_all_nodes, classify_semantic_layer, NodeClassification, SemanticClassifier};
pub use importance::{
    compute_connectivity, compute_importance_scores, get_top_anchor_candidates, Connectivity,
    ImportanceScore, ImportanceScorer,
};
