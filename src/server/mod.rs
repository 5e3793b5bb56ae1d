//! HTTP gateway server

pub mod chat;
pub mod router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::chain::ChainRegistry;
use crate::config::Config;
use crate::llm::ChatEngine;
use crate::{Error, Result};

use router::{AppState, create_router};

/// FlareScan gateway server
pub struct Gateway {
    config: Config,
    registry: Arc<ChainRegistry>,
    http: reqwest::Client,
}

impl Gateway {
    /// Create a new gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let registry = Arc::new(ChainRegistry::new(&config.rpc));
        let http = reqwest::Client::builder()
            .timeout(config.llm.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            config,
            registry,
            http,
        })
    }

    /// Run the gateway until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address is invalid, the listener
    /// cannot bind, or the server fails while running.
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let engine = Arc::new(ChatEngine::new(
            self.http.clone(),
            &self.config.llm,
            Arc::clone(&self.registry),
        ));
        let state = Arc::new(AppState {
            registry: Arc::clone(&self.registry),
            engine,
        });

        let app = create_router(state, &self.config.server);
        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("FLARESCAN GATEWAY v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(chains = self.registry.all().len(), model = %self.config.llm.model, "Ready");
        info!(
            "  POST http://{}:{}/api/chat  (SSE chat)",
            self.config.server.host, self.config.server.port
        );
        info!(
            "  GET  http://{}:{}/health",
            self.config.server.host, self.config.server.port
        );
        info!("============================================================");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
