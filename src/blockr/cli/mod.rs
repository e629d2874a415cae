//! Command-line consumer of the BlockR API. Plays the part of the app screens:
//! it owns no durable state and only talks to [`blockr::api::BlockrApi`].

mod handlers;
mod print;
mod setup;

use blockr::api::BlockrApi;
use blockr::config::{self, BlockrConfig};
use blockr::error::Result;
use blockr::store::fs::FileStore;
use clap::Parser;
use handlers::{
    handle_blacklist, handle_block, handle_clear, handle_config, handle_contacts, handle_prefs,
    handle_rules, handle_size, handle_stats,
};
use print::print_warnings;
use setup::{Cli, Commands};
use tracing_subscriber::EnvFilter;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = config::data_dir()?;
    let config = BlockrConfig::load(&data_dir)?;

    init_logging(&config, cli.verbose);
    tracing::debug!(path = %data_dir.display(), "using data directory");

    let store = FileStore::new(&data_dir).with_file_name(&config.storage_file);
    let api = BlockrApi::new(store);

    let result = match cli.command {
        Some(Commands::Contacts { action }) => handle_contacts(&api, action).await,
        Some(Commands::Block { id }) => handle_block(&api, &id, true).await,
        Some(Commands::Unblock { id }) => handle_block(&api, &id, false).await,
        Some(Commands::Blacklist) => handle_blacklist(&api).await,
        Some(Commands::Rules { action }) => handle_rules(&api, action).await,
        Some(Commands::Prefs { action }) => handle_prefs(&api, action).await,
        Some(Commands::Stats) | None => handle_stats(&api).await,
        Some(Commands::Size) => handle_size(&api).await,
        Some(Commands::Clear { yes }) => handle_clear(&api, yes).await,
        Some(Commands::Config { key, value }) => handle_config(&data_dir, key, value),
    };

    print_warnings(&api.take_warnings());
    result
}

/// `RUST_LOG` wins, then `--verbose`, then the configured filter. Logs go to
/// stderr so command output stays pipeable.
fn init_logging(config: &BlockrConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("blockr=debug")
        } else {
            EnvFilter::new(&config.log_filter)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
