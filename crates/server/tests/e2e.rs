use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use configs::HashingConfig;
use server::routes::{self, auth::ServerState};
use service::account::repository::mock::InMemoryUserRepository;
use service::account::{AccountService, UserRepository};
use service::auth::token::TokenConfig;
use service::auth::{CredentialService, TokenService};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());
    let creds = CredentialService::new(&HashingConfig { memory_kib: 256, iterations: 1, parallelism: 1 })?;
    let tokens = TokenService::new(&TokenConfig {
        secret: "e2e-secret".into(),
        ttl: Duration::from_secs(3600),
        refresh_grace: Duration::from_secs(600),
    })?;
    let state = ServerState { accounts: Arc::new(AccountService::new(repo, creds, tokens)) };
    let app = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {e}");
        }
    });
    Ok(TestApp { base_url: format!("http://{addr}") })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().cookie_store(true).build().expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_cookie_session_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let http = client();

    let res = http
        .post(format!("{}/api/v1/users/register", app.base_url))
        .json(&json!({"email": "e2e@example.com", "password": "Abcd1234", "name": "E2E"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = http
        .post(format!("{}/api/v1/users/login", app.base_url))
        .json(&json!({"email": "e2e@example.com", "password": "Abcd1234"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let session: Value = res.json().await?;
    let token = session["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    // No Authorization header: the cookie jar carries the session
    let res = http.get(format!("{}/api/v1/users/profile", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await?;
    assert_eq!(profile["email"], "e2e@example.com");

    let res = http
        .get(format!("{}/api/v1/users/profile", app.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = http.delete(format!("{}/api/v1/users/profile", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Cookie was cleared on deletion
    let res = http.get(format!("{}/api/v1/users/profile", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
