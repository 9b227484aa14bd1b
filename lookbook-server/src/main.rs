//! Lookbook Server - REST API for product photo lookup
//!
//! Exposes lookbook-core over HTTP:
//! - POST /images - Submit a photo (operator ingestion or customer search)
//! - POST /texts - Submit a text (article label for a pending photo)
//! - GET /articles, GET /articles/{label} - Browse the catalog

use std::net::SocketAddr;
use std::sync::Arc;

use lookbook_core::{Lookbook, OperatorAllowList};
use lookbook_server::{catalog_store, create_router_with_config, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lookbook_server=info,lookbook_core=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let store = catalog_store::from_config(&config).await?;

    if config.operator_ids.is_empty() {
        tracing::warn!("OPERATOR_IDS not set, catalog ingestion is disabled");
    } else {
        tracing::info!(operators = config.operator_ids.len(), "Operator allow-list loaded");
    }
    let policy = OperatorAllowList::new(config.operator_ids.iter().cloned());

    let lookbook = Lookbook::new(store, Arc::new(policy)).with_search_params(config.search_params());
    let app = create_router_with_config(AppState::new(lookbook, &config), &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        threshold = config.match_threshold,
        limit = config.match_limit,
        "Lookbook server listening"
    );

    // Peer addresses feed the rate limiter's key extractor
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
