use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stacks_core::{normalize, FileTokenizer, Index};
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and maintain boolean search indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty index file
    Create {
        /// Path of the index file
        path: PathBuf,
    },
    /// Add a file to an existing index
    Add {
        /// Path of the index file
        index: PathBuf,
        /// File to ingest
        file: PathBuf,
    },
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { path } => create(&path),
        Commands::Add { index, file } => add(&index, &file),
    };
    if let Err(err) = result {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn create(path: &Path) -> Result<()> {
    Index::new()
        .dump(path)
        .with_context(|| format!("Unable to create index {}", path.display()))?;
    tracing::info!(path = %path.display(), "created empty index");
    Ok(())
}

fn add(index_path: &Path, file: &Path) -> Result<()> {
    let mut index = Index::new();
    index
        .load(index_path)
        .with_context(|| format!("Unable to load index from {}", index_path.display()))?;
    tracing::info!(path = %index_path.display(), documents = index.num_documents() - 1, "loaded index");

    let tokenizer = FileTokenizer::open(file)
        .with_context(|| format!("Unable to open {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name {}", file.display()))?;
    let doc_id = index.register_document(name);

    // a term yields one posting per document no matter how often it occurs
    let mut total = 0usize;
    let mut distinct: HashSet<String> = HashSet::new();
    for token in tokenizer {
        let term = normalize(&token);
        if term.is_empty() {
            continue;
        }
        distinct.insert(term);
        total += 1;
    }
    for term in &distinct {
        index.add_posting(term, doc_id);
    }
    tracing::info!(
        file = %file.display(),
        tokens = total,
        distinct = distinct.len(),
        "processed document"
    );

    index
        .dump(index_path)
        .with_context(|| format!("Unable to store index to {}", index_path.display()))?;
    tracing::info!(path = %index_path.display(), "stored index");
    Ok(())
}
