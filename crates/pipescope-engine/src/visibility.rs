//! Visibility composition
//!
//! Decides which nodes and edges of the full lineage graph are shown for a
//! given exploration state, and at which relative layer each node sits.
//!
//! Four cases, checked in order:
//! - no anchor and no flow: nothing is visible
//! - flow only: the flow's members at their precomputed layout layers
//! - anchor (focus absent or equal): the anchor's bounded lineage
//! - anchor and a distinct focus: the anchor's lineage stretched along the
//!   path to the focus and past it
//!
//! Anchor views are capped at `max_visible_nodes`, keeping the nodes closest
//! to the anchor. Unknown anchors, flows or unreachable focus nodes degrade to
//! a smaller view instead of an error.

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use pipescope_core::{Edge, Flow, Node, VisibilityConfig};
use pipescope_lineage::{connect, scan_lineage, Direction, GraphIndex, Lineage};

fn default_upstream_depth() -> usize {
    VisibilityConfig::default().default_upstream_depth
}

fn default_downstream_depth() -> usize {
    VisibilityConfig::default().default_downstream_depth
}

/// Exploration controls for one request
///
/// Depths missing from a serialized state fall back to the built-in defaults
/// (3 upstream, 2 downstream), not to a composer's configured
/// `default_*_depth`. Callers holding a [`VisibilityConfig`] fill the depths
/// in themselves before computing, as the CLI does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityState {
    /// Node the view is centered on
    #[serde(default)]
    pub anchor: Option<String>,

    /// Node to stretch towards; treated as the anchor when absent
    #[serde(default)]
    pub focus: Option<String>,

    /// Flow id
    #[serde(default)]
    pub flow: Option<String>,

    #[serde(default = "default_upstream_depth")]
    pub upstream_depth: usize,

    #[serde(default = "default_downstream_depth")]
    pub downstream_depth: usize,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            anchor: None,
            focus: None,
            flow: None,
            upstream_depth: default_upstream_depth(),
            downstream_depth: default_downstream_depth(),
        }
    }
}

impl VisibilityState {
    /// State centered on `anchor` with default depths
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: Some(anchor.into()),
            ..Self::default()
        }
    }

    /// State showing a flow without an anchor
    pub fn for_flow(flow: impl Into<String>) -> Self {
        Self {
            flow: Some(flow.into()),
            ..Self::default()
        }
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    pub fn with_flow(mut self, flow: impl Into<String>) -> Self {
        self.flow = Some(flow.into());
        self
    }

    pub fn with_depths(mut self, upstream: usize, downstream: usize) -> Self {
        self.upstream_depth = upstream;
        self.downstream_depth = downstream;
        self
    }
}

/// Why a node is part of the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum VisibilityReason {
    /// The anchor itself
    Anchor,

    /// Reached by following edges backwards from the anchor
    Upstream { hops: usize, path: Vec<String> },

    /// Reached by following edges forwards from the anchor
    Downstream { hops: usize, path: Vec<String> },

    /// Member of the selected flow
    FlowMember { flow_name: String },
}

impl VisibilityReason {
    fn traversed(direction: Direction, hops: usize, path: Vec<String>) -> Self {
        match direction {
            Direction::Upstream => Self::Upstream { hops, path },
            Direction::Downstream => Self::Downstream { hops, path },
        }
    }

    /// Human-readable description
    pub fn describe(&self) -> String {
        fn plural(hops: usize) -> &'static str {
            if hops == 1 { "" } else { "s" }
        }

        match self {
            Self::Anchor => "Selected anchor".to_string(),
            Self::Upstream { hops, .. } => format!("{} hop{} upstream", hops, plural(*hops)),
            Self::Downstream { hops, .. } => format!("{} hop{} downstream", hops, plural(*hops)),
            Self::FlowMember { flow_name } => format!("Part of flow \"{}\"", flow_name),
        }
    }
}

/// Presentation helper for a visibility reason
pub fn get_visibility_description(reason: &VisibilityReason) -> String {
    reason.describe()
}

/// A node included in the view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleNode {
    #[serde(flatten)]
    pub node: Node,

    pub visibility_reason: VisibilityReason,

    /// 0 for the anchor, negative upstream, positive downstream
    pub relative_layer: i64,
}

/// Smallest and largest relative layer in a view, always spanning 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRange {
    pub min: i64,
    pub max: i64,
}

impl LayerRange {
    fn of<'a>(layers: impl IntoIterator<Item = &'a VisibleNode>) -> Self {
        layers.into_iter().fold(Self::default(), |range, v| Self {
            min: range.min.min(v.relative_layer),
            max: range.max.max(v.relative_layer),
        })
    }
}

/// Output of a visibility computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityResult {
    pub visible_nodes: Vec<VisibleNode>,

    pub visible_edges: Vec<Edge>,

    pub anchor_node: Option<Node>,

    pub layer_range: LayerRange,

    /// Set when the node cap dropped candidates
    #[serde(default)]
    pub truncated: bool,
}

impl VisibilityResult {
    /// Ids of the visible nodes, in result order
    pub fn node_ids(&self) -> Vec<&str> {
        self.visible_nodes.iter().map(|v| v.node.id.as_str()).collect()
    }

    /// Check whether a node id is visible
    pub fn contains(&self, node_id: &str) -> bool {
        self.visible_nodes.iter().any(|v| v.node.id == node_id)
    }

    /// Look up a visible node by id
    pub fn get(&self, node_id: &str) -> Option<&VisibleNode> {
        self.visible_nodes.iter().find(|v| v.node.id == node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.visible_nodes.is_empty()
    }
}

/// Ordered, first-insert-wins accumulator of traversal results
#[derive(Debug, Default)]
struct MergedLineage {
    entries: Vec<(String, Direction, usize, Vec<String>)>,
    seen: HashSet<String>,
}

impl MergedLineage {
    fn seeded_with(anchor: &str) -> Self {
        let mut merged = Self::default();
        merged.seen.insert(anchor.to_string());
        merged
    }

    fn insert(&mut self, node_id: &str, direction: Direction, hops: usize, path: Vec<String>) -> bool {
        if !self.seen.insert(node_id.to_string()) {
            return false;
        }
        self.entries.push((node_id.to_string(), direction, hops, path));
        true
    }

    fn extend_from(&mut self, lineage: &Lineage) {
        for entry in lineage.entries() {
            self.insert(&entry.node_id, entry.direction, entry.hops, entry.path.clone());
        }
    }
}

/// Visibility engine configured with request limits
#[derive(Debug, Clone, Default)]
pub struct VisibilityComposer {
    config: VisibilityConfig,
}

impl VisibilityComposer {
    pub fn new(config: VisibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    /// Compute the visible subgraph for `state`
    ///
    /// Pure over its inputs: identical arguments always produce an identical result.
    pub fn compute(
        &self,
        state: &VisibilityState,
        nodes: &[Node],
        edges: &[Edge],
        flows: &[Flow],
    ) -> VisibilityResult {
        let flow = state.flow.as_deref().and_then(|id| {
            let found = flows.iter().find(|f| f.id == id);
            if found.is_none() {
                tracing::debug!(flow = id, "flow not found, ignoring");
            }
            found
        });

        match (state.anchor.as_deref(), flow) {
            (None, None) => VisibilityResult::default(),
            (None, Some(flow)) => flow_view(flow, nodes, edges),
            (Some(anchor), flow) => self.anchor_view(state, anchor, flow, nodes, edges),
        }
    }

    fn anchor_view(
        &self,
        state: &VisibilityState,
        anchor: &str,
        flow: Option<&Flow>,
        nodes: &[Node],
        edges: &[Edge],
    ) -> VisibilityResult {
        let node_map: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let Some(anchor_node) = node_map.get(anchor).copied() else {
            tracing::debug!(anchor, "anchor not found, returning empty view");
            return VisibilityResult::default();
        };

        let candidates: Option<HashSet<&str>> = flow
            .filter(|_| self.config.prune_to_flow)
            .map(|f| {
                f.member_nodes
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(anchor))
                    .collect()
            });
        let index = GraphIndex::build_restricted(nodes, edges, candidates.as_ref());

        let mut merged = MergedLineage::seeded_with(anchor);
        merged.extend_from(&scan_lineage(
            &index,
            anchor,
            state.upstream_depth,
            state.downstream_depth,
        ));

        if let Some(focus) = state.focus.as_deref().filter(|f| *f != anchor) {
            self.stretch_to_focus(&index, state, anchor, focus, &mut merged);
        } else {
            tracing::debug!(anchor, "computing anchor lineage view");
        }

        let mut visible_nodes = Vec::with_capacity(merged.entries.len() + 1);
        visible_nodes.push(VisibleNode {
            node: anchor_node.clone(),
            visibility_reason: VisibilityReason::Anchor,
            relative_layer: 0,
        });

        for (node_id, direction, hops, path) in merged.entries {
            // Ids only known from edges cannot be rendered
            let Some(node) = node_map.get(node_id.as_str()) else {
                continue;
            };

            visible_nodes.push(VisibleNode {
                node: (*node).clone(),
                relative_layer: direction.sign() * hops as i64,
                visibility_reason: VisibilityReason::traversed(direction, hops, path),
            });
        }

        let max = self.config.max_visible_nodes.max(1);
        let truncated = visible_nodes.len() > max;
        if truncated {
            tracing::debug!(
                candidates = visible_nodes.len(),
                max,
                "truncating visible nodes"
            );
            visible_nodes.sort_by_key(|v| v.relative_layer.abs());
            visible_nodes.truncate(max);
        }

        let visible_edges = edges_between(&visible_nodes, edges);

        VisibilityResult {
            layer_range: LayerRange::of(&visible_nodes),
            visible_nodes,
            visible_edges,
            anchor_node: Some(anchor_node.clone()),
            truncated,
        }
    }

    /// Extend the anchor's lineage along the path to `focus` and beyond it
    fn stretch_to_focus(
        &self,
        index: &GraphIndex<'_>,
        state: &VisibilityState,
        anchor: &str,
        focus: &str,
        merged: &mut MergedLineage,
    ) {
        let Some(path) = connect(index, anchor, focus, self.config.focus_path_max_depth) else {
            tracing::debug!(anchor, focus, "focus unreachable, using anchor lineage only");
            return;
        };

        let direction = path.direction;
        let focus_hops = path.hops();
        tracing::debug!(anchor, focus, %direction, focus_hops, "stretching towards focus");

        let (upstream_depth, downstream_depth) = match direction {
            Direction::Upstream => (state.upstream_depth, 0),
            Direction::Downstream => (0, state.downstream_depth),
        };

        // Path nodes sit at their path position even when the extension loops back to them
        for (position, node_id) in path.nodes.iter().enumerate().skip(1) {
            merged.insert(node_id, direction, position, path.nodes[..=position].to_vec());
        }

        let extension = scan_lineage(index, focus, upstream_depth, downstream_depth);
        for entry in extension.in_direction(direction) {
            let full_path = path
                .nodes
                .iter()
                .chain(entry.path.iter().skip(1))
                .cloned()
                .collect();
            merged.insert(&entry.node_id, direction, focus_hops + entry.hops, full_path);
        }
    }
}

/// Show a flow's members at their precomputed layout layers
fn flow_view(flow: &Flow, nodes: &[Node], edges: &[Edge]) -> VisibilityResult {
    tracing::debug!(flow = %flow.id, members = flow.member_nodes.len(), "computing flow view");

    let members: HashSet<&str> = flow.member_nodes.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    let visible_nodes: Vec<VisibleNode> = nodes
        .iter()
        .filter(|n| members.contains(n.id.as_str()) && seen.insert(n.id.as_str()))
        .map(|n| VisibleNode {
            node: n.clone(),
            visibility_reason: VisibilityReason::FlowMember {
                flow_name: flow.name.clone(),
            },
            relative_layer: i64::from(n.layout_layer.unwrap_or(0)),
        })
        .collect();

    let visible_edges = edges_between(&visible_nodes, edges);

    VisibilityResult {
        layer_range: LayerRange::of(&visible_nodes),
        visible_nodes,
        visible_edges,
        anchor_node: None,
        truncated: false,
    }
}

/// Input edges whose endpoints are both visible, in input order
fn edges_between(visible_nodes: &[VisibleNode], edges: &[Edge]) -> Vec<Edge> {
    let ids: HashSet<&str> = visible_nodes.iter().map(|v| v.node.id.as_str()).collect();

    edges
        .iter()
        .filter(|e| ids.contains(e.from.as_str()) && ids.contains(e.to.as_str()))
        .cloned()
        .collect()
}

/// Compute visibility with the default limits
pub fn compute_visibility(
    state: &VisibilityState,
    nodes: &[Node],
    edges: &[Edge],
    flows: &[Flow],
) -> VisibilityResult {
    VisibilityComposer::default().compute(state, nodes, edges, flows)
}
