use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pipescope_core::{Config, GraphSnapshot};
use pipescope_engine::{
    get_node_edges, get_visibility_description, ImportanceScorer, SemanticClassifier,
    VisibilityComposer, VisibilityResult, VisibilityState,
};

/// Pipescope - explore data-pipeline lineage graphs
#[derive(Parser)]
#[command(name = "pipescope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: pipescope.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the graph snapshot JSON (relative paths resolve against the config file's directory)
    #[arg(short, long, global = true, default_value = "graph.json")]
    graph: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the nodes and edges visible around an anchor or within a flow
    Visibility {
        /// Anchor node (id or exact name)
        #[arg(short, long)]
        anchor: Option<String>,

        /// Focus node to stretch towards (id or exact name)
        #[arg(long)]
        focus: Option<String>,

        /// Flow id
        #[arg(long)]
        flow: Option<String>,

        /// Upstream hop limit
        #[arg(short, long)]
        upstream: Option<usize>,

        /// Downstream hop limit
        #[arg(short, long)]
        downstream: Option<usize>,

        /// Write the full result as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify every node into a semantic layer
    Classify {
        /// Write classifications as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest anchor nodes ranked by importance
    Anchors {
        /// Number of candidates to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// List incoming and outgoing edges of a node
    Edges {
        /// Node id or exact name
        node: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("pipescope.toml").exists() {
        Config::from_file(Path::new("pipescope.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    let graph_path = config.resolve_path(&cli.graph);
    if cli.verbose {
        eprintln!("{} {}", "Loading graph from:".cyan(), graph_path.display());
    }

    let snapshot = GraphSnapshot::from_file(&graph_path)
        .with_context(|| format!("Failed to load graph snapshot {}", graph_path.display()))?;

    tracing::info!(
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        flows = snapshot.flows.len(),
        version = %snapshot.version,
        "loaded graph snapshot"
    );

    match cli.command {
        Commands::Visibility { anchor, focus, flow, upstream, downstream, output } => {
            let state = VisibilityState {
                anchor: anchor.map(|a| resolve_id(&snapshot, &a)),
                focus: focus.map(|f| resolve_id(&snapshot, &f)),
                flow,
                upstream_depth: upstream.unwrap_or(config.visibility.default_upstream_depth),
                downstream_depth: downstream.unwrap_or(config.visibility.default_downstream_depth),
            };
            visibility_command(&config, &snapshot, &state, output.as_deref())
        }
        Commands::Classify { output } => classify_command(&config, &snapshot, output.as_deref()),
        Commands::Anchors { limit } => anchors_command(&config, &snapshot, limit),
        Commands::Edges { node } => edges_command(&snapshot, &node),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Map a name to its node id; unknown values are passed through unchanged
fn resolve_id(snapshot: &GraphSnapshot, id_or_name: &str) -> String {
    match snapshot.resolve_node(id_or_name) {
        Some(node) => node.id.clone(),
        None => {
            eprintln!("{} '{}' is not a known node id or name", "Warning:".yellow(), id_or_name);
            id_or_name.to_string()
        }
    }
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("{} {}", "Saved to:".green(), path.display());
    Ok(())
}

/// Visibility command - compute and print the visible subgraph
fn visibility_command(
    config: &Config,
    snapshot: &GraphSnapshot,
    state: &VisibilityState,
    output: Option<&Path>,
) -> Result<()> {
    let composer = VisibilityComposer::new(config.visibility.clone());
    let result = composer.compute(state, &snapshot.nodes, &snapshot.edges, &snapshot.flows);

    if let Some(path) = output {
        write_json(&result, path)?;
    }

    print_visibility(&result);
    Ok(())
}

fn print_visibility(result: &VisibilityResult) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Lineage View".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    if result.is_empty() {
        println!("{}", "Nothing to show. Pass --anchor or --flow.".yellow());
        println!();
        return;
    }

    if let Some(anchor) = &result.anchor_node {
        println!("{} {} ({})", "Anchor:".bold(), anchor.name.green(), anchor.id);
    }
    println!(
        "{} {} nodes, {} edges, layers {}..{}",
        "Visible:".bold(),
        result.visible_nodes.len(),
        result.visible_edges.len(),
        result.layer_range.min,
        result.layer_range.max
    );
    if result.truncated {
        println!("{}", "⚠ View truncated to the nodes closest to the anchor".yellow());
    }
    println!();

    for layer in result.layer_range.min..=result.layer_range.max {
        let members: Vec<_> = result
            .visible_nodes
            .iter()
            .filter(|v| v.relative_layer == layer)
            .collect();
        if members.is_empty() {
            continue;
        }

        println!("{}", format!("Layer {:+}", layer).bold());
        for visible in members {
            println!(
                "  {} {}",
                visible.node.name.yellow(),
                format!("({})", get_visibility_description(&visible.visibility_reason)).dimmed()
            );
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Classify command - print the semantic layer of every node
fn classify_command(config: &Config, snapshot: &GraphSnapshot, output: Option<&Path>) -> Result<()> {
    let classifier = SemanticClassifier::new(&config.classifier);
    let classifications = classifier.classify_all(&snapshot.nodes);

    if let Some(path) = output {
        return write_json(&classifications, path);
    }

    for (node, classification) in snapshot.nodes.iter().zip(&classifications) {
        println!(
            "{:<14} {}",
            classification.semantic_layer.to_string().cyan(),
            node.name
        );
    }

    Ok(())
}

/// Anchors command - suggest the most connected nodes
fn anchors_command(config: &Config, snapshot: &GraphSnapshot, limit: usize) -> Result<()> {
    let scorer = ImportanceScorer::new(SemanticClassifier::new(&config.classifier));
    let candidates = scorer.top_candidates(&snapshot.nodes, &snapshot.edges, limit);

    println!("{}", "Suggested anchors:".bold());
    println!();

    for (i, candidate) in candidates.iter().enumerate() {
        let name = snapshot
            .node(&candidate.node_id)
            .map(|n| n.name.as_str())
            .unwrap_or(candidate.node_id.as_str());

        println!(
            "  {}. {} {:.3} {} {}",
            i + 1,
            name.green(),
            candidate.score,
            format!("[{} in / {} out]", candidate.upstream_count, candidate.downstream_count).dimmed(),
            candidate.reason
        );
    }

    Ok(())
}

/// Edges command - list the edges around one node
fn edges_command(snapshot: &GraphSnapshot, node: &str) -> Result<()> {
    let node_id = snapshot
        .resolve_node(node)
        .map(|n| n.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Node '{}' not found in graph snapshot", node))?;

    let split = get_node_edges(&node_id, &snapshot.edges);

    println!("{} {}", "Node:".bold(), node_id.green());
    println!();
    println!("{} ({})", "Incoming".bold(), split.incoming.len());
    for edge in &split.incoming {
        println!("  {} {} {}", edge.from.yellow(), "→".dimmed(), edge.edge_type);
    }
    println!("{} ({})", "Outgoing".bold(), split.outgoing.len());
    for edge in &split.outgoing {
        println!("  {} {} {}", "→".dimmed(), edge.to.yellow(), edge.edge_type);
    }

    Ok(())
}
