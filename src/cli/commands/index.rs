//! Index command implementation.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use super::tree::tree_options;
use crate::cli::output::get_formatter;
use crate::error::IndexError;
use crate::models::{Config, OutputFormat};
use crate::services::{RagPipeline, TextChunker, extract_documents};
use crate::sources::build_tree;
use crate::utils::CancellationToken;

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory to index
    #[arg(required = true)]
    pub path: PathBuf,

    /// File patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// Show what would be indexed without calling the embedding service
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_index(
    args: IndexArgs,
    config: &Config,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let formatter = get_formatter(format);

    let path = args.path.canonicalize().context("invalid path")?;
    let options = tree_options(config, &args.exclude);
    let tree = build_tree(&path, &options)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let documents = extract_documents(&tree, &TextChunker::with_defaults());
    if documents.is_empty() {
        println!("{}", formatter.format_message("No documents found to index."));
        return Ok(());
    }

    if args.dry_run {
        print!("{}", formatter.format_dry_run(&documents, tree.file_count()));
        return Ok(());
    }

    let mut pipeline = RagPipeline::from_config(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("invalid progress template")?,
    );
    pb.set_message(format!("Embedding {} chunks...", documents.len()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline.index(&documents, cancel).await;
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            print!("{}", formatter.format_index_report(&report));
            Ok(())
        }
        Err(IndexError::Aborted(report)) => {
            print!("{}", formatter.format_index_report(&report));
            anyhow::bail!(
                "indexing cancelled; {} embeddings saved to {}",
                pipeline.store().len(),
                pipeline.store_path().display()
            )
        }
        Err(e) => Err(e).context("indexing failed"),
    }
}
