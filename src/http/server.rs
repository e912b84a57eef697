//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout) and the body limit
//! - Apply the origin filter to the API routes
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::handlers::{self, AppState};
use crate::http::request::{make_request_span, MakeRequestUuid};
use crate::lifecycle::signals::shutdown_signal;
use crate::security::access_control::{access_control_middleware, OriginFilter};
use crate::security::cors::cors_layer;
use crate::upstream::{DocumentStore, StatsApi, UpstreamClient, UpstreamError};

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    ///
    /// Fails only if an upstream base URL or the HTTP client cannot be set up.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let client = UpstreamClient::new(Duration::from_secs(config.timeouts.upstream_secs))?;
        let stats = StatsApi::new(
            &config.upstreams.stats_base_url,
            config.credentials.stats_api_key.clone(),
        )?;
        let store = DocumentStore::new(
            &config.upstreams.store_base_url,
            config.credentials.store_master_key.clone(),
        )?;

        let state = AppState {
            client,
            stats: Arc::new(stats),
            store: Arc::new(store),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config: Arc::new(config),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let filter = Arc::new(OriginFilter::from_config(&config.access));

        let mut api = Router::new()
            .route("/api/guild", get(handlers::get_guild))
            .route("/api/jsonbin-read", get(handlers::read_bin))
            .route("/api/jsonbin-write", post(handlers::write_bin));
        if config.features.player_lookup {
            api = api.route("/api/player", get(handlers::get_player));
        }
        let api = api
            .route_layer(middleware::from_fn_with_state(filter, access_control_middleware))
            .with_state(state);

        Router::new()
            .route("/healthz", get(handlers::get_health))
            .merge(api)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors_layer(config.access.policy, &config.access.allowed_origins))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl-C/SIGTERM or until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            policy = %self.config.access.policy,
            player_lookup = self.config.features.player_lookup,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
