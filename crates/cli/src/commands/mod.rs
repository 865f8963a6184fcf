//! Command implementations.
//!
//! Each command takes the pool and its parsed arguments and returns
//! `anyhow::Result`; database errors gain context here.

pub mod delete;
pub mod dump;
pub mod list;
pub mod load;
pub mod training;

use vatic_db::DbPool;

use crate::cli::Command;
use crate::config::CliConfig;

/// Dispatch a parsed command.
pub async fn run(pool: &DbPool, config: &CliConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Load(args) => load::run(pool, config, &args).await,
        Command::Training(args) => training::run(pool, &args).await,
        Command::Delete(args) => delete::run(pool, &args).await,
        Command::Dump(args) => dump::run(pool, &args).await,
        Command::List => list::run(pool).await,
    }
}
