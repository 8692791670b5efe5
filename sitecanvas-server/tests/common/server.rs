//! Test server harness for integration tests.
//!
//! Spins up the real gateway router on a random localhost port so tests can
//! talk to it over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use sitecanvas_core::ProjectStore;
use sitecanvas_server::deploy::{HostingProvider, MockProvider};
use sitecanvas_server::{build_router, AppState, Gateway};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Caller id used by most tests.
#[allow(dead_code)]
pub const OWNER: &str = "user-1";

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    gateway: Gateway,
    client: reqwest::Client,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an in-memory store and the mock provider.
    pub async fn start() -> Self {
        Self::start_with(ProjectStore::new(), Arc::new(MockProvider::new())).await
    }

    /// Start a server over a given store and provider.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    #[allow(dead_code)]
    pub async fn start_with(store: ProjectStore, provider: Arc<dyn HostingProvider>) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let gateway = Gateway::new(store, provider);
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        let app = build_router(AppState::new(gateway.clone(), metrics), port);

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            gateway,
            client: reqwest::Client::new(),
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// HTTP client for requests against this server.
    #[allow(dead_code)]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Request builder with the caller header set.
    #[allow(dead_code)]
    pub fn request(&self, method: reqwest::Method, path: &str, caller: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("x-user-id", caller)
    }

    /// The gateway behind the server (for test assertions).
    #[allow(dead_code)]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
