/// Database migration runner
///
/// Migrations live in `taskplane-shared/migrations/` and are embedded into
/// the binary with `sqlx::migrate!`, so deployments never depend on the
/// migration files being present on disk.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Safe to call on every startup; already-applied migrations are skipped.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the database
/// connection is lost mid-run.
///
/// # Example
///
/// ```no_run
/// use taskplane_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskplane_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
