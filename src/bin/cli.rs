//! Odds feed CLI
//!
//! Runs the polling loop, a single cycle, the snapshot endpoint, or the
//! extractors over saved markup.

use std::future::pending;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use oddsfeed::{
    browser::{Browser, HttpBrowser},
    error::{AppError, Result},
    models::Config,
    pipeline::{CycleRunner, Poller, Session},
    services::{EventPageExtractor, HttpEventSource, LobbyExtractor},
    storage::{ArtifactWriter, LocalStorage, SnapshotStore},
};
use tokio::sync::oneshot;

/// oddsfeed - live exchange odds snapshotter
#[derive(Parser, Debug)]
#[command(
    name = "oddsfeed",
    version,
    about = "Harvests live exchange odds into an atomic JSON snapshot"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll and publish until interrupted
    Run,

    /// Run a single cycle and publish it
    Once,

    /// Serve the published snapshot over HTTP
    #[cfg(feature = "serve")]
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Validate the configuration
    Validate,

    /// Extract lobby rows from saved markup and print them as JSON
    ParseLobby {
        /// Saved lobby HTML
        file: PathBuf,
    },

    /// Extract an event snapshot from saved markup and print it as JSON
    ParseEvent {
        /// Saved event page HTML
        file: PathBuf,

        /// Source URL recorded in the snapshot (defaults to the file path)
        #[arg(long)]
        url: Option<String>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Resolves once Ctrl-C is received. Never resolves if the signal handler
/// cannot be installed.
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Interrupt received; finishing the current cycle");
                let _ = tx.send(());
            }
            Err(e) => log::warn!("Cannot listen for Ctrl-C: {}", e),
        }
    });
    async move {
        if rx.await.is_err() {
            pending::<()>().await;
        }
    }
}

async fn start(config: &Config) -> Result<(Session, Poller)> {
    let session = Session::establish(config, || {
        Ok(Arc::new(HttpBrowser::launch(config)?) as Arc<dyn Browser>)
    })
    .await
    .map_err(|e| AppError::browser("session setup", format!("giving up: {e}")))?;

    let artifacts = ArtifactWriter::new(&config.io, &config.scrape);
    let source = Arc::new(HttpEventSource::new(config, artifacts.clone())?);
    let runner = CycleRunner::new(config, &session, source, artifacts)?;
    let store = Arc::new(LocalStorage::from_config(&config.io));

    Ok((session, Poller::new(runner, store, config.scrape.interval())))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run => {
            config.validate()?;
            let (mut session, poller) = start(&config).await?;
            poller.run(&mut session, shutdown_signal()).await;
            session.close().await?;
        }

        Command::Once => {
            config.validate()?;
            let (mut session, poller) = start(&config).await?;
            let published = poller.run_once(&mut session).await;
            session.close().await?;
            let meta = published?;
            log::info!(
                "Published {} bytes to {}",
                meta.bytes,
                config.io.outfile
            );
        }

        #[cfg(feature = "serve")]
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.serve.bind.clone());
            let store: Arc<dyn SnapshotStore> = Arc::new(LocalStorage::from_config(&config.io));
            oddsfeed::serve::serve(&bind, store).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (sites, limits, headers and selectors)");
        }

        Command::ParseLobby { file } => {
            let html = std::fs::read_to_string(&file)?;
            let rows = LobbyExtractor::new(&config.selectors)?.extract(&html, config.scrape.max_lobby);
            log::info!("{} lobby rows in {}", rows.len(), file.display());
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }

        Command::ParseEvent { file, url } => {
            let html = std::fs::read_to_string(&file)?;
            let url = url.unwrap_or_else(|| file.display().to_string());
            let snapshot = EventPageExtractor::new(&config.selectors)?.extract(&html, &url);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
