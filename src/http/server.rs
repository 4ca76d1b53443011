//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the subsystems from configuration (RPC client, lottery, explorer, sessions)
//! - Create the Axum router with page, API and health handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, JSON 408)
//! - Serve until the shutdown signal fires

use axum::http::{header, HeaderValue};
use axum::middleware::map_response_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::{BlockchainClient, BlockchainError};
use crate::config::ConsoleConfig;
use crate::explorer::{ExplorerClient, ExplorerError, ExplorerLinks};
use crate::http::error::request_timeout_as_json;
use crate::http::{api, pages};
use crate::lottery::{LotteryError, LotteryService, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub lottery: Arc<LotteryService>,
    pub sessions: Arc<SessionStore>,
    pub explorer: Arc<ExplorerClient>,
}

/// Failure to assemble the server from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("blockchain client: {0}")]
    Blockchain(#[from] BlockchainError),

    #[error("lottery service: {0}")]
    Lottery(#[from] LotteryError),

    #[error("explorer client: {0}")]
    Explorer(#[from] ExplorerError),
}

/// HTTP server for the lottery console.
pub struct HttpServer {
    router: Router,
    config: ConsoleConfig,
    sessions: Arc<SessionStore>,
}

impl HttpServer {
    /// Build every subsystem from configuration.
    pub async fn from_config(config: ConsoleConfig) -> Result<Self, StartupError> {
        let client = BlockchainClient::new(config.blockchain.clone()).await?;
        let links = ExplorerLinks::new(&config.explorer.web_url);
        let lottery = LotteryService::new(client, config.lottery.clone(), links)?;
        let explorer = ExplorerClient::new(config.explorer.clone())?;
        let sessions = SessionStore::new(Duration::from_secs(config.session.idle_timeout_secs));

        let state = AppState {
            lottery: Arc::new(lottery),
            sessions: Arc::new(sessions),
            explorer: Arc::new(explorer),
        };
        Ok(Self::new(config, state))
    }

    /// Create a new HTTP server around prepared state.
    pub fn new(config: ConsoleConfig, state: AppState) -> Self {
        let sessions = state.sessions.clone();
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            sessions,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ConsoleConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(pages::index))
            .route("/enter", post(pages::enter))
            .route("/manager/prepare", post(pages::prepare))
            .route("/manager/send", post(pages::send))
            .route("/lookup", post(pages::lookup))
            .route("/api/v1/status", get(api::status))
            .route("/api/v1/enter", post(api::enter))
            .route("/api/v1/manager/prepare", post(api::prepare))
            .route("/api/v1/manager/pending", get(api::pending))
            .route("/api/v1/manager/send", post(api::send))
            .route("/api/v1/tx/{hash}", get(api::lookup))
            .route("/healthz", get(api::health))
            .with_state(state)
            // Pages echo form results; keep them out of shared caches.
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(map_response_with_state(
                config.listener.request_timeout_secs,
                request_timeout_as_json,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self.sessions.clone().spawn_sweeper(
            Duration::from_secs(self.config.session.sweep_interval_secs),
            shutdown.resubscribe(),
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        sweeper.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
