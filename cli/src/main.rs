//! Nikolaus CLI: enumerate every accepted path of a graph from every node
//!
//! Without arguments it counts the ways to draw the house of Nikolaus in
//! one stroke: all trails of exactly 8 relationships, from every corner.

use anyhow::Context;
use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use nikolaus::config::{EvaluatorConfig, TraversalConfig};
use nikolaus::fixture::GraphFixture;
use nikolaus::graph::{Direction, GraphStore, NodeId};
use nikolaus::traversal::{par_paths_from_all_nodes, Path, StartPaths, TraversalDescription, Uniqueness};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nikolaus", version, about = "Depth-first path enumeration over a graph fixture")]
struct Cli {
    /// Graph fixture file (.yaml/.yml/.json); the house when omitted
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Traversal config file (.yaml/.yml/.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only accept paths of exactly this many relationships
    #[arg(long)]
    length: Option<usize>,

    #[arg(long)]
    direction: Option<DirectionArg>,

    #[arg(long)]
    uniqueness: Option<UniquenessArg>,

    /// Relationship type to follow (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,

    /// Traverse the start nodes on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Output format
    #[arg(long, default_value = "plain")]
    format: OutputFormat,

    /// Only print the total
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Plain,
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DirectionArg {
    Outgoing,
    Incoming,
    Both,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Outgoing => Direction::Outgoing,
            DirectionArg::Incoming => Direction::Incoming,
            DirectionArg::Both => Direction::Both,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum UniquenessArg {
    None,
    NodePath,
    RelationshipPath,
    NodeGlobal,
    RelationshipGlobal,
}

impl From<UniquenessArg> for Uniqueness {
    fn from(arg: UniquenessArg) -> Self {
        match arg {
            UniquenessArg::None => Uniqueness::None,
            UniquenessArg::NodePath => Uniqueness::NodePath,
            UniquenessArg::RelationshipPath => Uniqueness::RelationshipPath,
            UniquenessArg::NodeGlobal => Uniqueness::NodeGlobal,
            UniquenessArg::RelationshipGlobal => Uniqueness::RelationshipGlobal,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let fixture = match &cli.graph {
        Some(path) => GraphFixture::load(path)
            .with_context(|| format!("loading graph {}", path.display()))?,
        None => GraphFixture::house(),
    };
    let store = fixture.build().context("building graph")?;

    let config = load_config(cli)?;
    let description = config.to_description();
    debug!(
        "Traversing {:?} relationships, {} direction, {} uniqueness, evaluators {:?}",
        description.type_filter(),
        description.get_direction(),
        description.get_uniqueness(),
        description.evaluators()
    );

    if cli.parallel {
        let results = par_paths_from_all_nodes(&store, &description)?;
        report_collected(cli, &store, &config.name_key, &results)
    } else {
        report_streaming(cli, &store, &config.name_key, &description)
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TraversalConfig> {
    let mut config = match &cli.config {
        Some(path) => TraversalConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TraversalConfig::default(),
    };

    if let Some(length) = cli.length {
        config.evaluator = EvaluatorConfig::AtLength { length };
    }
    if let Some(direction) = cli.direction {
        config.direction = direction.into();
    }
    if let Some(uniqueness) = cli.uniqueness {
        config.uniqueness = uniqueness.into();
    }
    if !cli.types.is_empty() {
        config.relationship_types = cli.types.clone();
    }
    Ok(config)
}

/// Sequential run. Plain output is printed as paths are found.
fn report_streaming(
    cli: &Cli,
    store: &GraphStore,
    name_key: &str,
    description: &TraversalDescription,
) -> anyhow::Result<()> {
    if cli.format != OutputFormat::Plain {
        let mut results = Vec::with_capacity(store.node_count());
        for start in store.node_ids() {
            let paths = description
                .traverse(store, start)?
                .collect::<Result<Vec<Path>, _>>()?;
            results.push(StartPaths { start, paths });
        }
        return report_collected(cli, store, name_key, &results);
    }

    let mut total = 0usize;
    for start in store.node_ids() {
        let mut traverser = description.traverse(store, start)?;
        for path in traverser.by_ref() {
            let path = path.with_context(|| format!("traversing from {}", node_name(store, name_key, start)))?;
            if !cli.quiet {
                println!("Path found! {}", path.render(store, name_key));
            }
            total += 1;
        }
        debug!("Start {}: {:?}", node_name(store, name_key, start), traverser.stats());
    }
    println!("Found a total of {} paths", total);
    Ok(())
}

fn report_collected(
    cli: &Cli,
    store: &GraphStore,
    name_key: &str,
    results: &[StartPaths],
) -> anyhow::Result<()> {
    let total: usize = results.iter().map(|r| r.paths.len()).sum();

    match cli.format {
        OutputFormat::Plain => {
            if !cli.quiet {
                for path in results.iter().flat_map(|r| &r.paths) {
                    println!("Path found! {}", path.render(store, name_key));
                }
            }
            println!("Found a total of {} paths", total);
        }
        OutputFormat::Table => {
            if !cli.quiet {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["Start", "Paths", "Example"]);
                for result in results {
                    let example = result
                        .paths
                        .first()
                        .map(|p| p.render(store, name_key))
                        .unwrap_or_default();
                    table.add_row(vec![
                        node_name(store, name_key, result.start),
                        result.paths.len().to_string(),
                        example,
                    ]);
                }
                println!("{}", table);
            }
            println!("Found a total of {} paths", total);
        }
        OutputFormat::Json => {
            let starts: Vec<_> = results
                .iter()
                .map(|r| {
                    let paths: Vec<_> = if cli.quiet {
                        Vec::new()
                    } else {
                        r.paths
                            .iter()
                            .map(|p| json!({ "names": p.render(store, name_key), "ids": p }))
                            .collect()
                    };
                    json!({
                        "start": node_name(store, name_key, r.start),
                        "count": r.paths.len(),
                        "paths": paths,
                    })
                })
                .collect();
            let output = json!({ "total": total, "starts": starts });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn node_name(store: &GraphStore, name_key: &str, id: NodeId) -> String {
    store
        .get_node(id)
        .and_then(|n| n.get_property(name_key))
        .map(|v| v.to_string())
        .unwrap_or_else(|| id.to_string())
}
