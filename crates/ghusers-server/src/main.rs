mod api;
mod middleware;

use std::sync::Arc;

use ghusers_client::{ClientConfig, PipelineOptions, ProfileClient, RetrievalPipeline};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ghusers_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = ProfileClient::with_base_url(
        &ClientConfig::from_app_config(&config),
        &config.api_base_url,
    )?;
    let pipeline = RetrievalPipeline::new(
        client,
        PipelineOptions {
            concurrency: config.fetch_concurrency,
            deadline: config.batch_deadline,
        },
    );
    let app = build_app(AppState {
        pipeline: Arc::new(pipeline),
    });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        api_base_url = %config.api_base_url,
        "starting profile retrieval server"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
