use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use trivia_api::config::Settings;
use trivia_api::db;
use trivia_api::server::run_server;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file, layered under TRIVIA_* environment variables
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Cannot load configuration")?;
    let pool = db::establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;

    if settings.database.run_migrations {
        tracing::info!("Running db migrations...");
        db::run_migrations(&pool).await?;
    }

    run_server(pool, &settings.application).await
}
