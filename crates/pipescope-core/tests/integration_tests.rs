//! Integration tests for snapshot and config loading

use pipescope_core::{Config, GraphSnapshot, NodeType, SnapshotVersion};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures").join(name)
}

#[test]
fn test_load_sample_graph() {
    let snapshot = GraphSnapshot::from_file(&fixture("sample-graph.json")).unwrap();

    assert_eq!(snapshot.version, SnapshotVersion::CURRENT);
    assert_eq!(snapshot.generated_at, "2026-01-15T09:30:00+00:00");
    assert_eq!(snapshot.nodes.len(), 8);
    assert_eq!(snapshot.edges.len(), 7);

    let mart = snapshot.resolve_node("mart_growth__lsw_lead_data").unwrap();
    assert_eq!(mart.id, "model.crm.mart_growth__lsw_lead_data");
    assert_eq!(mart.node_type, NodeType::Table);
    assert_eq!(mart.group_id.as_deref(), Some("growth"));
    assert_eq!(mart.layout_layer, Some(3));

    let sync = snapshot.node("external.census.hubspot_sync").unwrap();
    assert_eq!(sync.subtype.as_deref(), Some("census_sync"));

    let flow = snapshot.flow("flow.lead_scoring").unwrap();
    assert_eq!(flow.name, "Lead scoring");
    assert!(flow.contains("model.crm.int_leads_enriched"));
}

#[test]
fn test_snapshot_file_roundtrip() {
    let original = GraphSnapshot::from_file(&fixture("sample-graph.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");

    original.save_to_file(&path).unwrap();
    let reloaded = GraphSnapshot::from_file(&path).unwrap();

    assert_eq!(original, reloaded);
}

#[test]
fn test_missing_snapshot_file() {
    let err = GraphSnapshot::from_file(&fixture("does-not-exist.json")).unwrap_err();
    assert!(err.to_string().contains("does-not-exist.json"));
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipescope.toml");

    let mut config = Config::default();
    config.visibility.max_visible_nodes = 120;
    config.visibility.prune_to_flow = true;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.visibility, config.visibility);
    assert_eq!(loaded.classifier, config.classifier);
    assert_eq!(loaded.project_root, dir.path());
}

#[test]
fn test_graph_path_resolves_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pipescope.toml");
    Config::default().save_to_file(&config_path).unwrap();

    let original = GraphSnapshot::from_file(&fixture("sample-graph.json")).unwrap();
    original.save_to_file(&dir.path().join("graph.json")).unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let graph_path = config.resolve_path(std::path::Path::new("graph.json"));
    assert_eq!(graph_path, dir.path().join("graph.json"));

    let loaded = GraphSnapshot::from_file(&graph_path).unwrap();
    assert_eq!(loaded.nodes.len(), 8);

    let absolute = fixture("sample-graph.json");
    assert_eq!(config.resolve_path(&absolute), absolute);
}
