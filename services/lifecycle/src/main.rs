use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use tollgate_core::config::Config as _;
use tollgate_core::tracing::init_tracing;
use tollgate_lifecycle::config::LifecycleConfig;
use tollgate_lifecycle::router::build_router;
use tollgate_lifecycle::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("tollgate_lifecycle=info,tower_http=info,warn");

    let config = LifecycleConfig::from_env()
        .validate()
        .context("invalid lifecycle configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        http: reqwest::Client::new(),
        pool_id: config.directory_pool_id,
        recaptcha_secret: config.recaptcha_secret_key,
        recaptcha_verify_url: config.recaptcha_verify_url,
        ttl_minutes: config.expire_unverified_users_minutes,
        grace_period_hours: config.cleanup_grace_period_hours,
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.lifecycle_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("lifecycle service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
