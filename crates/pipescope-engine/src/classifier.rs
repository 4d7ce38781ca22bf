//! Semantic layer classification from naming conventions

use std::sync::LazyLock;
use serde::Serialize;
use pipescope_core::{ClassifierConfig, Node, NodeType, SemanticLayer};

static DEFAULT_CLASSIFIER: LazyLock<SemanticClassifier> = LazyLock::new(SemanticClassifier::default);

/// Semantic layer assigned to one node, ready to be persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClassification {
    pub node_id: String,
    pub semantic_layer: SemanticLayer,
}

/// Maps node names and types to pipeline-layer labels
///
/// Precedence: external type, source/seed type, staging prefix,
/// intermediate prefix, mart prefix or final suffix, report prefix,
/// then a type-based fallback (views are reports, all-uppercase tables
/// are sources) and finally `transform`.
#[derive(Debug, Clone)]
pub struct SemanticClassifier {
    rules: ClassifierConfig,
}

impl Default for SemanticClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl SemanticClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        fn lowered(patterns: &[String]) -> Vec<String> {
            patterns.iter().map(|p| p.to_ascii_lowercase()).collect()
        }

        Self {
            rules: ClassifierConfig {
                staging_prefixes: lowered(&config.staging_prefixes),
                intermediate_prefixes: lowered(&config.intermediate_prefixes),
                mart_prefixes: lowered(&config.mart_prefixes),
                final_suffixes: lowered(&config.final_suffixes),
                report_prefixes: lowered(&config.report_prefixes),
            },
        }
    }

    /// Classify a single node
    pub fn classify(&self, node: &Node) -> SemanticLayer {
        match node.node_type {
            NodeType::External => return SemanticLayer::External,
            NodeType::Source | NodeType::Seed => return SemanticLayer::Source,
            _ => {}
        }

        // "analytics.stg_orders" is matched on "stg_orders"
        let short = node
            .name
            .rsplit('.')
            .next()
            .unwrap_or(node.name.as_str())
            .to_ascii_lowercase();
        let rules = &self.rules;

        if starts_with_any(&short, &rules.staging_prefixes) {
            SemanticLayer::Staging
        } else if starts_with_any(&short, &rules.intermediate_prefixes) {
            SemanticLayer::Intermediate
        } else if starts_with_any(&short, &rules.mart_prefixes)
            || rules.final_suffixes.iter().any(|s| short.ends_with(s.as_str()))
        {
            SemanticLayer::Mart
        } else if starts_with_any(&short, &rules.report_prefixes) {
            SemanticLayer::Report
        } else {
            match node.node_type {
                NodeType::View => SemanticLayer::Report,
                NodeType::Table if is_all_uppercase(&node.name) => SemanticLayer::Source,
                _ => SemanticLayer::Transform,
            }
        }
    }

    /// Classify every node, preserving input order
    pub fn classify_all(&self, nodes: &[Node]) -> Vec<NodeClassification> {
        nodes
            .iter()
            .map(|node| NodeClassification {
                node_id: node.id.clone(),
                semantic_layer: self.classify(node),
            })
            .collect()
    }
}

fn starts_with_any(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

/// Warehouse-native tables tend to be shouted: "RAW.SALESFORCE_ACCOUNT"
fn is_all_uppercase(name: &str) -> bool {
    name.chars().any(|c| c.is_alphabetic()) && !name.chars().any(|c| c.is_lowercase())
}

/// Classify a node with the default naming conventions
pub fn classify_semantic_layer(node: &Node) -> SemanticLayer {
    DEFAULT_CLASSIFIER.classify(node)
}

/// Classify all nodes with the default naming conventions
pub fn classify_all_nodes(nodes: &[Node]) -> Vec<NodeClassification> {
    DEFAULT_CLASSIFIER.classify_all(nodes)
}
