use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use docrag::cli::commands::{
    handle_config, handle_index, handle_query, handle_search, handle_stats, handle_tree,
};
use docrag::cli::output::get_formatter;
use docrag::cli::{Cli, Commands};
use docrag::models::{Config, OutputFormat};
use docrag::utils::CancellationToken;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "docrag=debug" } else { "docrag=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid config file: {}", e);
            Config::default()
        }
    };
    if let Some(store) = cli.store.clone() {
        config.store.path = store;
    }
    let format = cli.format.unwrap_or(config.search.default_format);

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        eprintln!("\nReceived shutdown signal, finishing current step...");
        watcher.cancel();
    });

    if let Err(e) = run_command(cli.command, &config, format, &cancel).await {
        eprint!("{}", get_formatter(format).format_error(&format!("{e:#}")));
        std::process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: &Config,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    debug!("Vector store: {}", config.store.path.display());

    match command {
        Commands::Index(args) => {
            handle_index(args, config, format, cancel).await?;
        }
        Commands::Query(args) => {
            handle_query(args, config, format, cancel).await?;
        }
        Commands::Search(args) => {
            handle_search(args, config, format, cancel).await?;
        }
        Commands::Stats => {
            handle_stats(config, format).await?;
        }
        Commands::Tree(args) => {
            handle_tree(args, config, format).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, config, format).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
