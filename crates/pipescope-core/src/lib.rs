//! Pipescope Core
//!
//! Lineage graph data model, graph snapshots and configuration shared by the
//! traversal and visibility crates.

pub mod model;
pub mod snapshot;
pub mod config;

pub use model::{Node, NodeType, Edge, Flow, SemanticLayer, UnknownSemanticLayer};
pub use snapshot::{GraphSnapshot, SnapshotVersion, SnapshotError};
pub use config::{Config, ConfigError, VisibilityConfig, ClassifierConfig};
