use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::RagPipeline;
use crate::utils::CancellationToken;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(required = true, help = "Search query text")]
    pub query: String,

    #[arg(long, short = 'k', help = "Maximum number of results to return")]
    pub top_k: Option<usize>,
}

pub async fn handle_search(
    args: SearchArgs,
    config: &Config,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("search query cannot be empty");
    }

    let formatter = get_formatter(format);
    let top_k = args.top_k.unwrap_or(config.search.default_top_k);

    let pipeline = RagPipeline::from_config(config)?;
    if pipeline.store().is_empty() || top_k == 0 {
        debug!("Nothing to search: store empty or top_k is 0");
        print!("{}", formatter.format_search_results(query, &[]));
        return Ok(());
    }

    let results = pipeline
        .search(query, top_k, cancel)
        .await
        .context("search failed")?;

    print!("{}", formatter.format_search_results(query, &results));
    Ok(())
}
