//! Dense adjacency index over a node/edge snapshot
//!
//! Every id is interned to a `NodeIndex` once per request; neighbor lists are
//! plain vectors in edge insertion order, so traversals over the same
//! snapshot always visit nodes in the same order.

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use pipescope_core::{Edge, Node};

/// Dense position of a node inside a [`GraphIndex`]
pub type NodeIndex = usize;

/// Traversal direction relative to an origin node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges backwards (towards the things feeding a node)
    Upstream,

    /// Follow edges forwards (towards the things a node feeds)
    Downstream,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
        }
    }

    /// Sign applied to hop counts to get a relative layer
    pub fn sign(&self) -> i64 {
        match self {
            Self::Upstream => -1,
            Self::Downstream => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only forward and reverse adjacency built from an edge list
#[derive(Debug, Clone)]
pub struct GraphIndex<'a> {
    /// Interned ids, nodes first then unknown edge endpoints
    ids: Vec<&'a str>,

    positions: HashMap<&'a str, NodeIndex>,

    /// Keyed by edge `to`, listing the `from`s
    upstream: Vec<Vec<NodeIndex>>,

    /// Keyed by edge `from`, listing the `to`s
    downstream: Vec<Vec<NodeIndex>>,

    edge_count: usize,
}

impl<'a> GraphIndex<'a> {
    /// Index the whole graph
    pub fn build(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        Self::build_restricted(nodes, edges, None)
    }

    /// Index the graph, ignoring edges with an endpoint outside `candidates`
    pub fn build_restricted(
        nodes: &'a [Node],
        edges: &'a [Edge],
        candidates: Option<&HashSet<&str>>,
    ) -> Self {
        let mut index = Self {
            ids: Vec::with_capacity(nodes.len()),
            positions: HashMap::with_capacity(nodes.len()),
            upstream: Vec::with_capacity(nodes.len()),
            downstream: Vec::with_capacity(nodes.len()),
            edge_count: 0,
        };

        for node in nodes {
            index.intern(&node.id);
        }

        for edge in edges {
            if let Some(allowed) = candidates {
                if !allowed.contains(edge.from.as_str()) || !allowed.contains(edge.to.as_str()) {
                    continue;
                }
            }

            // Endpoints missing from the node list are still traversable
            let from = index.intern(&edge.from);
            let to = index.intern(&edge.to);

            index.downstream[from].push(to);
            index.upstream[to].push(from);
            index.edge_count += 1;
        }

        tracing::trace!(
            nodes = index.ids.len(),
            edges = index.edge_count,
            restricted = candidates.is_some(),
            "built graph index"
        );

        index
    }

    fn intern(&mut self, id: &'a str) -> NodeIndex {
        if let Some(&ix) = self.positions.get(id) {
            return ix;
        }

        let ix = self.ids.len();
        self.ids.push(id);
        self.positions.insert(id, ix);
        self.upstream.push(Vec::new());
        self.downstream.push(Vec::new());
        ix
    }

    /// Dense index for a node id, if the id appears anywhere in the graph
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.positions.get(id).copied()
    }

    /// Node id for a dense index
    pub fn id(&self, ix: NodeIndex) -> &'a str {
        self.ids[ix]
    }

    /// Immediate neighbors in the given direction, in edge insertion order
    pub fn neighbors(&self, ix: NodeIndex, direction: Direction) -> &[NodeIndex] {
        match direction {
            Direction::Upstream => &self.upstream[ix],
            Direction::Downstream => &self.downstream[ix],
        }
    }

    /// Immediate parents (nodes feeding `id`)
    pub fn parents(&self, id: &str) -> Vec<&'a str> {
        self.neighbor_ids(id, Direction::Upstream)
    }

    /// Immediate children (nodes fed by `id`)
    pub fn children(&self, id: &str) -> Vec<&'a str> {
        self.neighbor_ids(id, Direction::Downstream)
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&'a str> {
        self.index_of(id)
            .map(|ix| self.neighbors(ix, direction).iter().map(|&n| self.ids[n]).collect())
            .unwrap_or_default()
    }

    /// Number of interned ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of edges that made it into the index
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
