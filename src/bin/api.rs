use std::sync::Arc;

use anyhow::{Context, Result};
use reuploader::{
    api,
    app_state::AppState,
    config::{Config, LogFormat},
    fetcher::build_client,
    library::LibraryStore,
    reupload::{RehostPipeline, Reuploader},
    session::Session,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format());

    let library = Arc::new(LibraryStore::load(config.library_path()).await?);

    // One identity for the whole process; no point serving without it
    let session = match Session::authenticate(
        build_client(true)?,
        config.dashboard_endpoints()?,
        config.username(),
        config.password(),
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            error!("Login failed: {}", e);
            return Err(e.into());
        }
    };

    let rehost = RehostPipeline::new(build_client(false)?, config.rehost_settings());
    let reuploader = Reuploader::new(session, config.job_router()?, rehost, library);
    let app = api::app(AppState::new(reuploader));

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr()))?;
    info!("Server is running on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping server");
}
