// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::clock::SystemClock;
use crate::application::session::DashboardSession;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_repository::HttpCatRepository;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let initial_range = config.dashboard.initial_range()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpCatRepository::new(config.api.base_url, config.api.token)?);

    // Load cats and select the initial range (application layer)
    let session = DashboardSession::start(repository, Arc::new(SystemClock), initial_range).await?;

    // Build router (presentation layer)
    let router = presentation::router(Arc::new(AppState { session }));

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!("Starting cat-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
