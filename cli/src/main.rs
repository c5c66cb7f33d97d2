//! sitecache — host process for the shared site cache.
//!
//! Initializes the process-wide cache, seeds it from a config file, applies
//! assignments, and prints the queried paths.
//!
//! # Usage
//!
//! ```text
//! sitecache --config site.yaml site.title
//! sitecache --set site.title="My blog" --set posts.count=3 site posts.count
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use site_cache_core::{init_shared_state, parse_assignment, HierarchicalNode, HostConfig, NodeValue};


#[derive(Parser, Debug)]
#[command(name = "sitecache")]
#[command(about = "Seed and query the shared site cache")]
struct Cli {
    /// YAML config with `log_level` and `seed` entries
    #[arg(long)]
    config: Option<PathBuf>,

    /// Assign VALUE (JSON, or a plain string) at a dotted PATH
    #[arg(long = "set", value_name = "PATH=VALUE")]
    assignments: Vec<String>,

    /// Log filter; overrides the config file (RUST_LOG overrides both)
    #[arg(long)]
    log_level: Option<String>,

    /// Dotted paths to print
    paths: Vec<String>,
}


fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("sitecache: {:#}", e);
            process::exit(1);
        }
    };

    let level = cli.log_level.as_deref().unwrap_or(config.log_level());
    init_logging(level);

    let state = init_shared_state();
    let stdout = io::stdout();
    if let Err(e) = run(&cli, &config, &state, &mut stdout.lock()) {
        eprintln!("sitecache: {:#}", e);
        process::exit(1);
    }
}


fn load_config(cli: &Cli) -> Result<HostConfig> {
    match &cli.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(HostConfig::default()),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}


/// Seed `state`, apply assignments in order, then print each queried path.
fn run(cli: &Cli, config: &HostConfig, state: &HierarchicalNode, out: &mut impl Write) -> Result<()> {
    let seeded = config.apply_seed(state)?;
    debug!(seeded, "applied config seed");

    for spec in &cli.assignments {
        let (path, value) = parse_assignment(spec)?;
        state
            .set_item(path.as_str(), value)
            .with_context(|| format!("assigning {}", path))?;
    }

    for path in &cli.paths {
        let value = state
            .get_item(path.as_str())
            .with_context(|| format!("reading {}", path))?;
        writeln!(out, "{} = {}", path, render(&value))?;
    }
    Ok(())
}

/// Leaves print as JSON; branches as their key set, e.g. `{title, posts}`.
fn render(value: &NodeValue) -> String {
    match value {
        NodeValue::Leaf(leaf) => leaf.to_string(),
        NodeValue::Branch(node) => {
            let keys: Vec<String> = node.keys().iter().map(|k| k.to_string()).collect();
            format!("{{{}}}", keys.join(", "))
        }
    }
}
