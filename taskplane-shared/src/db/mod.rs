/// Database layer for Taskplane
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with a startup health check
/// - `migrations`: Embedded migration runner
///
/// # Example
///
/// ```no_run
/// use taskplane_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskplane_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
