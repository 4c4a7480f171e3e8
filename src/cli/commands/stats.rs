use anyhow::{Context, Result};

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::VectorStore;

pub async fn handle_stats(config: &Config, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    let store = VectorStore::load(&config.store.path).context("failed to load vector store")?;

    print!("{}", formatter.format_stats(&store.stats()));
    Ok(())
}
