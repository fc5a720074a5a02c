//! Spawns the real router on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use dinescout::gateway::{HandlerState, create_router_with_state};
use dinescout::{MockSearchProvider, PipelineConfig, SearchCache, SearchPipeline};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::{fast_config, sushi_records};

pub struct TestServerConfig {
    pub provider: Arc<MockSearchProvider>,
    pub pipeline: PipelineConfig,
    pub cache_capacity: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            provider: Arc::new(MockSearchProvider::with_records(sushi_records())),
            pipeline: fast_config(),
            cache_capacity: 100,
        }
    }
}

impl TestServerConfig {
    pub fn with_provider(provider: MockSearchProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            ..Default::default()
        }
    }
}

pub struct TestServer {
    addr: SocketAddr,
    pub provider: Arc<MockSearchProvider>,
    pub state: HandlerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let cache = Arc::new(SearchCache::new(
        config.cache_capacity,
        config.pipeline.cache_ttl,
    ));
    let pipeline = SearchPipeline::new(config.provider.clone(), cache, config.pipeline);
    let state = HandlerState::new(Arc::new(pipeline));
    let app = create_router_with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let drain_state = state.clone();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                drain_state.begin_drain();
            })
            .await;
    });

    Ok(TestServer {
        addr,
        provider: config.provider,
        state,
        shutdown_tx: Some(shutdown_tx),
        handle: Some(handle),
    })
}
