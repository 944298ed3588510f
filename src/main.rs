use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;

use todo_api::config::Config;
use todo_api::{FileStore, Server, TodoStore, Todos, api, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let store = FileStore::new(&config.data_file);
    // A corrupt file is fatal: refuse to start rather than serve 500s.
    let existing = store
        .load()
        .with_context(|| format!("cannot read {}", config.data_file.display()))?;
    info!(file = %config.data_file.display(), count = existing.len(), "todo store opened");

    let server = Server::bind(config.bind_addr()).await?;
    server.serve(api::router(Arc::new(Todos::new(store)))).await?;
    Ok(())
}
