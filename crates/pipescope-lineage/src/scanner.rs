//! Bounded lineage scanning
//!
//! Breadth-first search from a single origin, run separately upstream and
//! downstream with independent hop limits and independent visited sets.

use std::collections::VecDeque;
use serde::Serialize;
use crate::adjacency::{Direction, GraphIndex, NodeIndex};

/// A node reached from the origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEntry {
    pub node_id: String,

    /// Minimal number of edges between origin and node
    pub hops: usize,

    /// Ids from the origin to this node, both inclusive
    pub path: Vec<String>,

    pub direction: Direction,
}

/// Lineage of one origin, split by direction
///
/// On a cyclic graph the same node may show up in both lists; deciding which
/// one wins is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lineage {
    /// Upstream entries in BFS discovery order
    pub upstream: Vec<LineageEntry>,

    /// Downstream entries in BFS discovery order
    pub downstream: Vec<LineageEntry>,
}

impl Lineage {
    /// All entries, upstream first, each list in discovery order
    pub fn entries(&self) -> impl Iterator<Item = &LineageEntry> {
        self.upstream.iter().chain(self.downstream.iter())
    }

    /// Entries found in one direction
    pub fn in_direction(&self, direction: Direction) -> &[LineageEntry] {
        match direction {
            Direction::Upstream => &self.upstream,
            Direction::Downstream => &self.downstream,
        }
    }

    /// Find a node's entry in one direction
    pub fn get(&self, node_id: &str, direction: Direction) -> Option<&LineageEntry> {
        self.in_direction(direction).iter().find(|e| e.node_id == node_id)
    }

    pub fn len(&self) -> usize {
        self.upstream.len() + self.downstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty() && self.downstream.is_empty()
    }
}

/// Scan the lineage of `origin` up to the given hop limits
///
/// The origin itself is never part of the result. An origin that does not
/// occur in the index yields an empty lineage.
pub fn scan_lineage(
    index: &GraphIndex<'_>,
    origin: &str,
    upstream_depth: usize,
    downstream_depth: usize,
) -> Lineage {
    let Some(start) = index.index_of(origin) else {
        tracing::debug!(origin, "lineage origin not in graph");
        return Lineage::default();
    };

    let lineage = Lineage {
        upstream: bfs(index, start, Direction::Upstream, upstream_depth),
        downstream: bfs(index, start, Direction::Downstream, downstream_depth),
    };

    tracing::trace!(
        origin,
        upstream = lineage.upstream.len(),
        downstream = lineage.downstream.len(),
        "scanned lineage"
    );

    lineage
}

fn bfs(
    index: &GraphIndex<'_>,
    start: NodeIndex,
    direction: Direction,
    max_depth: usize,
) -> Vec<LineageEntry> {
    let mut result = Vec::new();
    if max_depth == 0 {
        return result;
    }

    let mut visited = vec![false; index.len()];
    let mut parent: Vec<Option<NodeIndex>> = vec![None; index.len()];
    let mut hops = vec![0usize; index.len()];
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if hops[current] >= max_depth {
            continue;
        }

        for &next in index.neighbors(current, direction) {
            if visited[next] {
                continue;
            }

            visited[next] = true;
            parent[next] = Some(current);
            hops[next] = hops[current] + 1;

            result.push(LineageEntry {
                node_id: index.id(next).to_string(),
                hops: hops[next],
                path: trace_path(index, &parent, next),
                direction,
            });

            queue.push_back(next);
        }
    }

    result
}

/// Walk parent pointers back to the root and return ids root-first
pub(crate) fn trace_path(
    index: &GraphIndex<'_>,
    parent: &[Option<NodeIndex>],
    target: NodeIndex,
) -> Vec<String> {
    let mut path = vec![index.id(target).to_string()];
    let mut current = target;

    while let Some(prev) = parent[current] {
        path.push(index.id(prev).to_string());
        current = prev;
    }

    path.reverse();
    path
}
