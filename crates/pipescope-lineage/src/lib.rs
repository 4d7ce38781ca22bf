//! Lineage traversal primitives
//!
//! This crate handles:
//! - Building forward/reverse adjacency over a graph snapshot
//! - Bounded upstream/downstream lineage scans with hop counts and paths
//! - Shortest directional paths between two nodes

pub mod adjacency;
pub mod scanner;
pub mod path;

pub use adjacency::{Direction, GraphIndex, NodeIndex};
pub use scanner::{scan_lineage, Lineage, LineageEntry};
pub use path::{connect, find_shortest_path, FoundPath};
