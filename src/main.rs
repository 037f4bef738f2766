use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mediscribe::ai::client::GeminiClient;
use mediscribe::api::router::api_router;
use mediscribe::api::types::ApiContext;
use mediscribe::config::{self, AppConfig};
use mediscribe::db::Db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        version = config::APP_VERSION,
        db = %config.database_path.display(),
        model = %config.ai.model,
        "Starting mediscribe"
    );

    let db = Db::open(&config.database_path)?;
    let model = Arc::new(GeminiClient::new(&config.ai));
    let router = api_router(ApiContext::new(db, model));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "Failed to install shutdown handler");
    }
}
