//! Tasklist
//!
//! A single-user task list persisted to a local SQLite file and served as
//! server-rendered HTML.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tasklist::cli::Cli;
use tasklist::config::Config;
use tasklist::db::Database;
use tasklist::logging::{self, LogTarget};
use tasklist::web;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    info!(
        db_path = %config.server.db_path.display(),
        "Opening task database"
    );
    let db = Arc::new(Database::open(&config.server.db_path)?);

    let (shutdown_tx, bound_addr, server) =
        web::start_server(Arc::clone(&db), config.server.socket_addr()).await?;
    info!("Tasks available at http://{}/tasks", bound_addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    let _ = shutdown_tx.send(());
    server.await?;
    info!("Server stopped");

    Ok(())
}
