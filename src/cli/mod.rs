//! CLI module for docrag.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Question answering over a local document tree, grounded by retrieval.
#[derive(Debug, Parser)]
#[command(name = "docrag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        env = "DOCRAG_STORE",
        help = "Vector store file (overrides config)"
    )]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chunk, embed and store the text files under a directory
    Index(commands::IndexArgs),

    /// Answer a question from the indexed documents
    Query(commands::QueryArgs),

    /// Show the stored chunks most similar to a query
    Search(commands::SearchArgs),

    /// Show vector store statistics
    Stats,

    /// Print the file tree of a directory
    Tree(commands::TreeArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_global_flags() {
        let cli = Cli::try_parse_from([
            "docrag", "query", "what is it?", "-k", "5", "--format", "json", "--store", "/tmp/db.json",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/db.json")));
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.query, "what is it?");
                assert_eq!(args.top_k, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_index_excludes() {
        let cli = Cli::try_parse_from([
            "docrag", "index", "./docs", "-e", "**/*.csv", "-e", "**/tmp/**", "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Index(args) => {
                assert_eq!(args.path, PathBuf::from("./docs"));
                assert_eq!(args.exclude.len(), 2);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
