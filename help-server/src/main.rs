use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use help_persistence::{Repository, Seed, Store};
use help_server::{config::Config, create_routes, judge::JudgeClient, websocket::RoomRegistry};

fn load_store(config: &Config) -> Store {
    let Some(path) = &config.data_file else {
        info!("DATA_FILE not set, using built-in sample data");
        return Store::sample();
    };

    match Seed::from_file(path) {
        Ok(seed) => Store::in_memory(seed),
        Err(e) => {
            error!("{:#}", e);
            error!("Starting with an empty store");
            Store::empty()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting peer help server...");

    let config = Config::new();
    let store = load_store(&config);

    let pair_problem = match store.problems.get(&config.pair_problem_id).await {
        Ok(problem) => Some(problem),
        Err(e) => {
            warn!("Pair-programming problem {}: {}", config.pair_problem_id, e);
            None
        }
    };
    let registry = Arc::new(RoomRegistry::new(config.pair_room_id.clone(), pair_problem));

    let judge = Arc::new(JudgeClient::new(config.judge.clone()));
    if judge.is_enabled() {
        info!("Code execution enabled via {}", config.judge.api_url);
    } else {
        info!("Code execution disabled");
    }

    let routes = create_routes(store, registry, judge, config.clone());

    let host = config
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid HOST {}", config.host))?;

    info!("Server starting on {}:{}", host, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((host, config.port), shutdown_signal())
        .with_context(|| format!("Failed to bind {}:{}", host, config.port))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) else {
            error!("Failed to install signal handlers; stop the process to exit");
            std::future::pending::<()>().await;
            return;
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
