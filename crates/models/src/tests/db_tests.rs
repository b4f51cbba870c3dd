use std::time::Duration;

use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use super::db_tests_disabled;
use crate::db::{connect_options, connect_with_config};

#[test]
fn connect_options_follow_config() {
    let mut cfg = DatabaseConfig::default();
    cfg.normalize();
    cfg.max_connections = 7;
    cfg.min_connections = 3;
    cfg.connect_timeout_secs = 5;
    let opts = connect_options(&cfg);
    assert_eq!(opts.get_url(), cfg.url);
    assert_eq!(opts.get_max_connections(), Some(7));
    assert_eq!(opts.get_min_connections(), Some(3));
    assert_eq!(opts.get_connect_timeout(), Some(Duration::from_secs(5)));
}

/// Test connection with custom configuration
#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }

    let mut config = DatabaseConfig::default();
    config.url = std::env::var("DATABASE_URL")?;
    config.max_connections = 5;
    config.min_connections = 1;
    config.connect_timeout_secs = 10;

    let db = connect_with_config(&config).await?;
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    let result = db.query_one(stmt).await?;
    assert!(result.is_some());
    Ok(())
}
