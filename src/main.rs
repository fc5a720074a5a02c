//! Dinescout HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use dinescout::cache::SearchCache;
use dinescout::config::Config;
use dinescout::gateway::{HandlerState, create_router_with_state};
use dinescout::lifecycle::CacheSweeper;
use dinescout::pipeline::{ResultSet, SearchPipeline};
use dinescout::provider::{HttpSearchProvider, MockSearchProvider, SearchProvider};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        cache_capacity = config.cache_capacity,
        cache_ttl_minutes = config.cache_ttl_minutes,
        "Dinescout starting"
    );

    let provider: Arc<dyn SearchProvider> = match &config.provider_url {
        Some(url) if !config.mock_provider => {
            tracing::info!(url = %url, "Using HTTP search provider");
            Arc::new(HttpSearchProvider::new(url, config.provider_timeout())?)
        }
        _ => {
            tracing::warn!("DINESCOUT_MOCK_PROVIDER set, serving demo records");
            Arc::new(MockSearchProvider::demo())
        }
    };

    let cache: Arc<SearchCache<ResultSet>> =
        Arc::new(SearchCache::new(config.cache_capacity, config.cache_ttl()));

    let sweeper = Arc::new(CacheSweeper::new(
        Arc::clone(&cache),
        config.sweep_interval(),
        config.cache_ttl(),
    ));
    let sweeper_task = sweeper.start();

    let pipeline = Arc::new(SearchPipeline::new(
        provider,
        cache,
        config.pipeline_config(),
    ));
    let state = HandlerState::new(pipeline);
    let app = create_router_with_state(state.clone());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state, Arc::clone(&sweeper)))
        .await?;

    if tokio::time::timeout(Duration::from_secs(5), sweeper_task)
        .await
        .is_err()
    {
        tracing::warn!("Cache sweeper did not stop in time");
    }

    tracing::info!("Dinescout shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("DINESCOUT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return 1,
    };

    rt.block_on(async {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        {
            Ok(client) => client,
            Err(_) => return 1,
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal(state: HandlerState, sweeper: Arc<CacheSweeper<ResultSet>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    state.begin_drain();
    sweeper.shutdown();
    tracing::info!("Cache sweeper stopping");
}
