#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code so bad input can't take the server down.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use directory::{
    ProviderDirectory,
    config::ServerConfig,
    http::{AppState, router},
    seed::{load_seed_file, seed_directory},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "directory=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: listen_port={}, minimum_degree={}, seed_file={:?}",
        config.listen_port,
        config.minimum_degree,
        config.seed_file
    );

    // One directory for the life of the process, handed to the router explicitly
    let mut directory = match ProviderDirectory::new(config.minimum_degree) {
        Ok(directory) => directory,
        Err(e) => {
            tracing::error!("Failed to create directory: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.seed_file {
        match load_seed_file(path) {
            Ok(providers) => {
                seed_directory(&mut directory, providers);
            }
            Err(e) => {
                tracing::error!("Failed to load seed file {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    let state = AppState::new(Arc::new(RwLock::new(directory)));
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
