use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stacks_core::{Index, QueryExecutor};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Run boolean queries against a search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a boolean query, e.g. "(cat OR dog) AND NOT fish"
    Run {
        /// Path of the index file
        index: PathBuf,
        /// The query string
        query: String,
    },
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { index, query } => run(&index, &query),
    };
    if let Err(err) = result {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(index_path: &Path, query: &str) -> Result<()> {
    let mut index = Index::new();
    index
        .load(index_path)
        .with_context(|| format!("Unable to load index from {}", index_path.display()))?;
    tracing::info!(path = %index_path.display(), documents = index.num_documents() - 1, "loaded index");

    let results = QueryExecutor::new(&index)
        .run(query)
        .with_context(|| format!("Unable to process query {query:?}"))?;

    println!("Found {} documents:", results.len());
    for name in results {
        println!("{name}");
    }
    Ok(())
}
