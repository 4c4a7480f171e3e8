use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::get_formatter;
use crate::error::QueryError;
use crate::models::{Config, OutputFormat};
use crate::services::RagPipeline;
use crate::utils::CancellationToken;

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(required = true, help = "Question to answer")]
    pub query: String,

    #[arg(long, short = 'k', help = "Number of context chunks to retrieve")]
    pub top_k: Option<usize>,
}

pub async fn handle_query(
    args: QueryArgs,
    config: &Config,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("query cannot be empty");
    }

    let formatter = get_formatter(format);
    let top_k = args.top_k.unwrap_or(config.search.default_top_k);

    let pipeline = RagPipeline::from_config(config)?;
    match pipeline.query(query, top_k, cancel).await {
        Ok(answer) => {
            print!("{}", formatter.format_answer(&answer));
            Ok(())
        }
        Err(QueryError::Generation { source, results }) => {
            print!("{}", formatter.format_search_results(query, &results));
            Err(source).context("answer generation failed; retrieved context shown above")
        }
        Err(e) => Err(e).context("query failed"),
    }
}
