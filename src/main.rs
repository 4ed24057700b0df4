mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdesk::config;
use taskdesk::session::FileSessionStore;
use taskdesk::{ApiClient, Session};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,taskdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    if command == cli::Command::Help {
        cli::print_help();
        return Ok(());
    }

    let config = config::load_config()?;
    let store = Arc::new(FileSessionStore::new()?);
    let session = Arc::new(Session::new(store, Arc::new(cli::ConsoleNavigator)));
    let client = Arc::new(
        ApiClient::new(&config.api, session).context("Failed to set up the API client")?,
    );

    cli::run(command, client).await
}
