//! Deconfliction Server - always-on pre-flight authority for scheduled drone flights

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deconflict_server::api;
use deconflict_server::config::Config;
use deconflict_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict_server=debug".parse()?)
                .add_directive("deconflict_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting deconfliction server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Spatial buffer {}m, sample step {}s, strategy {}",
        config.rules.spatial_buffer_m,
        config.rules.sample_step_s,
        config.rules.strategy
    );
    let state = Arc::new(AppState::new(config));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
