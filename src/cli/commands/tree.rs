use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::sources::{TreeOptions, build_tree};

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Directory to list
    #[arg(required = true)]
    pub path: PathBuf,

    /// File patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,
}

/// Tree options from config plus any extra exclude patterns given on the command line.
pub(super) fn tree_options(config: &Config, exclude: &[String]) -> TreeOptions {
    TreeOptions {
        exclude_patterns: config
            .indexing
            .exclude_patterns
            .iter()
            .chain(exclude)
            .cloned()
            .collect(),
        max_file_size: Some(config.indexing.max_file_size),
    }
}

pub async fn handle_tree(args: TreeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let options = tree_options(config, &args.exclude);

    let tree = build_tree(&args.path, &options)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    print!("{}", formatter.format_tree(&tree));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_options_merge_excludes() {
        let config = Config::default();
        let options = tree_options(&config, &["**/*.csv".to_string()]);

        assert_eq!(
            options.exclude_patterns.len(),
            config.indexing.exclude_patterns.len() + 1
        );
        assert_eq!(options.exclude_patterns.last().unwrap(), "**/*.csv");
        assert_eq!(options.max_file_size, Some(config.indexing.max_file_size));
    }
}
