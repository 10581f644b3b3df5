//! # review-server
//!
//! Axum host for the subject review site: renders the Leptos app (SSR +
//! hydration), serves the compiled WASM bundle under `/pkg`, and redirects
//! links from the old static-page layout.

mod config;
mod routes;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};

/// Failures that stop the server from starting or keep it from serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind port {port}: {source}")]
    Bind { port: u16, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "review-server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let app = routes::app(&config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .map_err(|source| StartupError::Bind { port: config.port, source })?;

    tracing::info!(port = config.port, site_root = %config.leptos.site_root, "review-server listening");
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}
