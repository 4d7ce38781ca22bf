//! Shortest path between two nodes in a single direction

use std::collections::VecDeque;
use crate::adjacency::{Direction, GraphIndex, NodeIndex};
use crate::scanner::trace_path;

/// A path found between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    /// Ids from start to end, both inclusive
    pub nodes: Vec<String>,

    pub direction: Direction,
}

impl FoundPath {
    /// Number of edges on the path
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Breadth-first search from `start` to `end` following `direction`
///
/// Returns the first path found with at most `max_depth` hops, or `None`
/// when `end` is unreachable within that bound.
pub fn find_shortest_path(
    index: &GraphIndex<'_>,
    start: &str,
    end: &str,
    direction: Direction,
    max_depth: usize,
) -> Option<Vec<String>> {
    let from = index.index_of(start)?;
    let to = index.index_of(end)?;

    if from == to {
        return Some(vec![start.to_string()]);
    }

    let mut visited = vec![false; index.len()];
    let mut parent: Vec<Option<NodeIndex>> = vec![None; index.len()];
    let mut hops = vec![0usize; index.len()];
    let mut queue = VecDeque::new();

    visited[from] = true;
    queue.push_back(from);

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

            if next == to {
                return Some(trace_path(index, &parent, next));
            }

            queue.push_back(next);
        }
    }

    None
}

/// Connect two nodes, trying upstream first and then downstream
pub fn connect(
    index: &GraphIndex<'_>,
    start: &str,
    end: &str,
    max_depth: usize,
) -> Option<FoundPath> {
    [Direction::Upstream, Direction::Downstream]
        .into_iter()
        .find_map(|direction| {
            find_shortest_path(index, start, end, direction, max_depth)
                .map(|nodes| FoundPath { nodes, direction })
        })
}
