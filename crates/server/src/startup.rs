use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::account::repo::seaorm::SeaOrmUserRepository;
use service::account::{AccountService, UserRepository};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the account service over PostgreSQL into shared server state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations_applied");
    }
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET is not set; using the development signing secret");
    }

    let repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db));
    let accounts = AccountService::from_config(repo, &cfg.auth)?;
    Ok(ServerState { accounts: Arc::new(accounts) })
}

/// Public entry: build the app and serve until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server drained");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
