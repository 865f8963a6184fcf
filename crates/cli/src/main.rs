use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vatic_cli::cli::Cli;
use vatic_cli::commands;
use vatic_cli::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Tracing ---
    // Logs go to stderr so `dump` output on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vatic=info,vatic_cli=info,vatic_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = CliConfig::from_env().context("invalid configuration")?;

    // --- Database ---
    let pool = vatic_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;
    tracing::debug!("Database connection pool created");

    vatic_db::health_check(&pool)
        .await
        .context("database health check failed")?;

    vatic_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;
    tracing::debug!("Database migrations applied");

    let result = commands::run(&pool, &config, cli.command).await;
    pool.close().await;
    result
}
