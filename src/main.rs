use tokio::net::TcpListener;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod handlers;
mod models;
mod services;
mod utils;

use config::Config;
use handlers::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ewallet_api=debug,tower_http=info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting e-wallet API...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Initializing database...");
    let pool = match db::init_db(&config).await {
        Ok(p) => {
            info!("Database initialized successfully");
            p
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!(
        max_page_size = config.max_page_size,
        read_consistency = ?config.read_consistency,
        "Server listening on {}",
        addr
    );

    let app = handlers::router(AppState::new(pool, config));
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
