//! Database migration command.

use warden_core::config::AppConfig;
use warden_core::result::AppResult;
use warden_database::DatabasePool;
use warden_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration to the configured database.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;
    output::print_success("Migrations applied");
    Ok(())
}
