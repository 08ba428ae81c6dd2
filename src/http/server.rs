//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the send handlers
//! - Wire up middleware (auth, tracing, request ID, timeout, body limit)
//! - Bind server to listener and drain on shutdown
//! - Apply configuration changes pushed by the file watcher

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::chat::ChatApi;
use crate::config::{AppConfig, ConfigStore};
use crate::formatters::FormatterRegistry;
use crate::health::HealthPinger;
use crate::http::auth::require_shared_secret;
use crate::http::send::{send_default, send_to_topic};
use crate::provisioning::{ensure_default_channel, ChannelReconciler};

/// Largest accepted payload.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub chat: Arc<dyn ChatApi>,
    pub formatters: Arc<FormatterRegistry>,
    pub health: Option<Arc<HealthPinger>>,
}

/// HTTP server for the hub.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let config = state.store.snapshot();
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/send", post(send_default))
            .route("/send/{slug}", post(send_to_topic))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_shared_secret))
            .with_state(state)
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let updater = tokio::spawn(apply_config_updates(self.state.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        updater.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Publish documents coming from the file watcher and provision new topics.
async fn apply_config_updates(state: AppState, mut updates: mpsc::UnboundedReceiver<AppConfig>) {
    let mut reconciler = ChannelReconciler::new(state.chat.clone());

    while let Some(config) = updates.recv().await {
        if !state.store.replace(config) {
            continue;
        }
        tracing::info!("Configuration reloaded from disk");

        if let Err(e) = ensure_default_channel(&state.store, state.chat.as_ref()).await {
            tracing::warn!(error = %e, "Cannot resolve default channel after reload");
            continue;
        }
        if let Err(e) = reconciler.reconcile_store(&state.store).await {
            tracing::warn!(error = %e, "Reconciliation after reload failed");
        }
    }
}
