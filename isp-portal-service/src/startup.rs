//! Application startup and lifecycle management.

use crate::config::{PortalConfig, StorageBackend};
use crate::handlers;
use crate::services::{
    init_metrics, AccountLoginLink, AccountService, BillingHistoryReader, Database, MemoryStore,
    PortalStore, ProfileAggregator, StoreHealth, TicketIntake, UsageAggregator,
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{http_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore as SessionMemoryStore, SessionManagerLayer};

/// Shared application state. Every component gets its store seams
/// explicitly; there is no global service container.
#[derive(Clone)]
pub struct AppState {
    pub config: PortalConfig,
    pub health: Arc<dyn StoreHealth>,
    pub profiles: ProfileAggregator,
    pub history: BillingHistoryReader,
    pub tickets: TicketIntake,
    pub accounts: AccountService,
    pub login: AccountLoginLink,
}

impl AppState {
    pub fn new<S>(config: PortalConfig, store: Arc<S>) -> Self
    where
        S: PortalStore + 'static,
    {
        let history = BillingHistoryReader::new(store.clone(), store.clone());
        let profiles = ProfileAggregator::new(
            store.clone(),
            UsageAggregator::new(store.clone()),
            history.clone(),
        );

        Self {
            config,
            health: store.clone(),
            profiles,
            history,
            tickets: TicketIntake::new(store.clone()),
            accounts: AccountService::new(store.clone()),
            login: AccountLoginLink::new(store.clone(), store),
        }
    }
}

/// Build the HTTP router with sessions and the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(SessionMemoryStore::default())
        .with_name("portal_session")
        .with_secure(state.config.session.secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session.inactivity_minutes,
        )));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route(
            "/api/profile/auto-renew",
            post(handlers::profile::toggle_auto_renew),
        )
        .route(
            "/api/profile/next-package",
            put(handlers::profile::select_next_package),
        )
        .route("/api/packages", get(handlers::packages::list_packages))
        .route("/api/payments", get(handlers::history::list_payments))
        .route("/api/sessions", get(handlers::history::list_sessions))
        .route(
            "/api/tickets",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span::<axum::body::Body>))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PortalConfig) -> Result<Self, AppError> {
        init_metrics();

        let state = match config.storage {
            StorageBackend::Postgres => {
                let url = config.database.url.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("Database URL is not configured"))
                })?;

                let db = Database::new(
                    url.expose_secret(),
                    config.database.max_connections,
                    config.database.min_connections,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    e
                })?;

                db.run_migrations().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;

                AppState::new(config.clone(), Arc::new(db))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                AppState::new(config.clone(), Arc::new(MemoryStore::new()))
            }
        };

        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, "Portal service listener bound");

        Ok(Self {
            http_port,
            http_listener,
            router: build_router(state),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "isp-portal-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, self.router)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "HTTP server error");
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
