//! Edge-list partitioning around a single node

use serde::Serialize;
use pipescope_core::Edge;

/// Edges touching one node, split by direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeEdges<'a> {
    /// Edges ending at the node
    pub incoming: Vec<&'a Edge>,

    /// Edges starting at the node
    pub outgoing: Vec<&'a Edge>,
}

/// Partition `edges` into those entering and leaving `node_id`
///
/// A self-loop appears in both lists.
pub fn get_node_edges<'a>(node_id: &str, edges: &'a [Edge]) -> NodeEdges<'a> {
    NodeEdges {
        incoming: edges.iter().filter(|e| e.to == node_id).collect(),
        outgoing: edges.iter().filter(|e| e.from == node_id).collect(),
    }
}
