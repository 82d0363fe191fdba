/// Database migration runner
///
/// Migrations are SQL files embedded at compile time from this crate's
/// `migrations/` directory, each as a reversible `*.up.sql`/`*.down.sql`
/// pair, and are applied on server startup.
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::{info, warn};

/// Embedded migrations for the curricula schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies all pending migrations.
///
/// Already-applied migrations are skipped; a failing migration is rolled
/// back and the error returned.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("migration failed: {}", e);
            Err(e)
        }
    }
}
