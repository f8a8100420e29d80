//! NEL Web Server
//!
//! Serves the entity linking endpoint over HTTP. The vocabulary is loaded
//! once at startup; a failure to load configuration or vocabulary aborts
//! startup.

mod routes;
mod state;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mesh_nel::config::{NelConfig, DEFAULT_CONFIG_PATH};
use mesh_nel::EntityLinker;

use crate::state::AppState;

/// Default server address
const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nel_web=info,mesh_nel=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NEL web server");

    // Load configuration
    let config_path =
        std::env::var("NEL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    tracing::info!(path = %config_path, "Loading configuration");

    let config = NelConfig::from_file(&config_path)?;
    config.validate()?;

    // Vocabulary loading is blocking file IO
    let linker = tokio::task::spawn_blocking(move || EntityLinker::from_config(&config))
        .await??;

    tracing::info!(
        labels = linker.params().valid_labels.len(),
        match_threshold = linker.params().match_threshold,
        "Linker ready"
    );

    let app = routes::create_router(AppState::new(linker)).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("NEL_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(format!("Failed to bind to {}: {}", addr, e).into());
        }
    };

    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
