use clap::Parser;
use tracing_subscriber::EnvFilter;

use services::{AppServices, Clock, PanelConfig};

mod cli;
mod commands;
mod db;
mod interactive;
mod render;

use cli::Cli;
use interactive::Terminal;

fn init_tracing() {
    // PREP_LOG (or RUST_LOG) adjusts verbosity; warnings and errors always show.
    let filter = EnvFilter::try_from_env("PREP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so services stay storage-agnostic.
    let db_url = db::normalize_sqlite_url(&cli.db);
    db::prepare_sqlite_file(&db_url)?;
    tracing::debug!(%db_url, "opening question store");
    let services = AppServices::new_sqlite(&db_url, Clock::system(), PanelConfig::default()).await?;

    let mut term = Terminal::new();
    commands::dispatch(cli.command, &services, &mut term).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
