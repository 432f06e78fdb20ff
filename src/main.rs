//! Command-line front end for building and inspecting the vault context

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use vault_context::config::AppConfig;
use vault_context::logging::init_logging;
use vault_context::scanner::PathFilter;
use vault_context::{FileContextStore, FsNoteSource, RebuildOutcome, VaultContextManager};

#[derive(Debug, Parser)]
#[command(name = "vault-context", version, about = "Build and inspect a compact vault context")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "VAULT_CONTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Vault root directory, overrides the configured one
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Directory holding the persisted context record
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan the vault and rebuild the stored context
    Rebuild {
        /// Print Prometheus metrics after the rebuild
        #[arg(long)]
        metrics: bool,
    },
    /// Print the stored compacted context
    Show {
        /// Print the whole record as JSON
        #[arg(long)]
        full: bool,
    },
    /// Print when the context was last built
    Status,
    /// Delete the stored context
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(vault) = cli.vault {
        config.vault.root = vault;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    init_logging(&config.logging)?;
    debug!("Using configuration: {:?}", config);

    let source = Arc::new(FsNoteSource::new(&config.vault.root).with_extension(&config.vault.extension));
    let store = Arc::new(FileContextStore::new(&config.storage.data_dir));
    let manager = VaultContextManager::new(source, store, config.vault_context.clone().shared())?;
    manager.initialize().await;

    match cli.command {
        Command::Rebuild { metrics } => {
            // the library skips bad patterns; on the command line they are an error
            let settings = manager.settings();
            PathFilter::new(&settings.include_patterns, &settings.exclude_patterns)
                .context("Invalid include/exclude pattern")?;

            let outcome = manager.rebuild().await;
            if metrics {
                print!("{}", manager.metrics().render()?);
            }
            match outcome {
                RebuildOutcome::Completed { note_count } => {
                    println!("Vault context built: {} notes analyzed", note_count);
                }
                RebuildOutcome::AlreadyInProgress => {
                    println!("Vault context rebuild already in progress");
                }
                RebuildOutcome::Failed { error } => bail!("Failed to build vault context: {}", error),
            }
        }
        Command::Show { full } => match manager.get_full_context() {
            Some(context) if full => println!("{}", serde_json::to_string_pretty(&*context)?),
            Some(context) => println!("{}", context.compacted_context),
            None => println!("{}", manager.status_line()),
        },
        Command::Status => println!("{}", manager.status_line()),
        Command::Clear => {
            manager.clear().await;
            println!("Vault context cleared");
        }
    }

    Ok(())
}
