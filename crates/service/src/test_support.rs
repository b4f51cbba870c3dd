#![cfg(test)]
use configs::AppConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Migrations run once per test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Live-database tests run only when a database is configured.
pub fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let _ = dotenvy::dotenv();
    let mut cfg = AppConfig::load_and_validate()?.database;
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;

    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    // Fresh connection bound to the current test's runtime
    connect_with_config(&cfg).await
}
