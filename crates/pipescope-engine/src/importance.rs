//! Connectivity and importance scoring for anchor suggestions

use std::collections::HashMap;
use serde::Serialize;
use pipescope_core::{Edge, Node, SemanticLayer};
use crate::classifier::SemanticClassifier;

/// Share of the score driven by total degree
const DEGREE_WEIGHT: f64 = 0.5;

/// Share of the score driven by the weaker of the two sides
const HUB_WEIGHT: f64 = 0.25;

/// Degree counts for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectivity {
    /// Edges ending at the node
    pub upstream_count: usize,

    /// Edges starting at the node
    pub downstream_count: usize,
}

impl Connectivity {
    pub fn total(&self) -> usize {
        self.upstream_count + self.downstream_count
    }

    /// Degree on the weaker side; high values mark hubs
    pub fn balance(&self) -> usize {
        self.upstream_count.min(self.downstream_count)
    }
}

/// Count in/out degree for every node in a single pass over the edges
///
/// Every node in `nodes` gets an entry, isolated ones with zero counts.
pub fn compute_connectivity(nodes: &[Node], edges: &[Edge]) -> HashMap<String, Connectivity> {
    let mut counts: HashMap<String, Connectivity> = nodes
        .iter()
        .map(|n| (n.id.clone(), Connectivity::default()))
        .collect();

    for edge in edges {
        if let Some(c) = counts.get_mut(&edge.to) {
            c.upstream_count += 1;
        }
        if let Some(c) = counts.get_mut(&edge.from) {
            c.downstream_count += 1;
        }
    }

    counts
}

/// Importance of one node as an exploration anchor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportanceScore {
    pub node_id: String,

    /// Bounded to [0, 1]
    pub score: f64,

    pub upstream_count: usize,
    pub downstream_count: usize,
    pub semantic_layer: SemanticLayer,

    /// Comma-separated explanation, e.g. "High connectivity, Mart table"
    pub reason: String,
}

/// Ranks nodes by connectivity and semantic layer
#[derive(Debug, Clone, Default)]
pub struct ImportanceScorer {
    classifier: SemanticClassifier,
}

impl ImportanceScorer {
    pub fn new(classifier: SemanticClassifier) -> Self {
        Self { classifier }
    }

    /// Score every node, preserving input order
    pub fn score(&self, nodes: &[Node], edges: &[Edge]) -> Vec<ImportanceScore> {
        let connectivity = compute_connectivity(nodes, edges);
        let max_connections = connectivity
            .values()
            .map(Connectivity::total)
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        nodes
            .iter()
            .map(|node| {
                let c = connectivity.get(&node.id).copied().unwrap_or_default();
                // Persisted labels take precedence over reclassifying
                let layer = node
                    .semantic_layer
                    .unwrap_or_else(|| self.classifier.classify(node));

                let base = (c.total() as f64 / max_connections) * DEGREE_WEIGHT;
                let hub_bonus = (c.balance() as f64 / max_connections) * HUB_WEIGHT;
                let score = (base + hub_bonus + semantic_bonus(layer)).min(1.0);

                ImportanceScore {
                    node_id: node.id.clone(),
                    score,
                    upstream_count: c.upstream_count,
                    downstream_count: c.downstream_count,
                    semantic_layer: layer,
                    reason: explain(c, layer, max_connections),
                }
            })
            .collect()
    }

    /// Highest-scoring nodes first; ties keep input order
    pub fn top_candidates(&self, nodes: &[Node], edges: &[Edge], limit: usize) -> Vec<ImportanceScore> {
        let mut scores = self.score(nodes, edges);
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores.truncate(limit);
        scores
    }
}

fn semantic_bonus(layer: SemanticLayer) -> f64 {
    match layer {
        SemanticLayer::Mart => 0.25,
        SemanticLayer::Report => 0.2,
        SemanticLayer::Intermediate => 0.1,
        _ => 0.0,
    }
}

fn explain(c: Connectivity, layer: SemanticLayer, max_connections: f64) -> String {
    let mut reasons = Vec::new();

    if c.total() as f64 > max_connections * 0.5 {
        reasons.push("High connectivity".to_string());
    }
    if c.balance() > 3 {
        reasons.push("Hub node".to_string());
    }
    if matches!(layer, SemanticLayer::Mart | SemanticLayer::Report) {
        reasons.push(format!("{} table", layer.title()));
    }

    if reasons.is_empty() {
        "Standard node".to_string()
    } else {
        reasons.join(", ")
    }
}

/// Score every node with the default naming conventions
pub fn compute_importance_scores(nodes: &[Node], edges: &[Edge]) -> Vec<ImportanceScore> {
    ImportanceScorer::default().score(nodes, edges)
}

/// Best anchor candidates with the default naming conventions
pub fn get_top_anchor_candidates(nodes: &[Node], edges: &[Edge], limit: usize) -> Vec<ImportanceScore> {
    ImportanceScorer::default().top_candidates(nodes, edges, limit)
}
