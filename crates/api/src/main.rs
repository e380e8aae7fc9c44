use std::sync::Arc;

use anyhow::Context;

use ordermanager_api::app::{self, services::AppServices};
use ordermanager_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ordermanager_observability::init();

    let config = AppConfig::from_env()?;
    let services = Arc::new(AppServices::build(&config).await?);
    let app = app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.shutdown().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        // Without a signal handler, keep serving until killed.
        std::future::pending::<()>().await;
    }
}
