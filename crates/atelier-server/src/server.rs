use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use atelier_auth::{AuthState, AuthorizationPolicy, JwtService};
use atelier_storage::DynSectionStore;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    http::StatusCode,
    middleware,
    routing::get,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::cache::{InvalidationHook, NoopInvalidation, RenderCache};
use crate::config::{AppConfig, SiteConfig, StorageBackend};
use crate::reconcile::SectionReconciler;
use crate::{handlers, middleware as app_middleware, routes};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: DynSectionStore,
    pub reconciler: Arc<SectionReconciler>,
    /// `None` when page caching is disabled.
    pub render_cache: Option<Arc<RenderCache>>,
    pub auth: AuthState,
    pub site: Arc<SiteConfig>,
}

impl AppState {
    /// Wires the reconciler, auth and render cache around a store.
    pub fn new(store: DynSectionStore, cfg: &AppConfig) -> Self {
        let policy = Arc::new(AuthorizationPolicy::new(cfg.auth.admin_roles.clone()));
        let jwt = Arc::new(JwtService::new(
            cfg.auth.jwt_secret.as_bytes(),
            cfg.auth.issuer.clone(),
        ));

        let render_cache = cfg
            .cache
            .enabled
            .then(|| Arc::new(RenderCache::new(cfg.render_ttl(), cfg.cache.max_entries)));
        let hook: Arc<dyn InvalidationHook> = match &render_cache {
            Some(cache) => Arc::clone(cache) as Arc<dyn InvalidationHook>,
            None => Arc::new(NoopInvalidation),
        };

        let reconciler = SectionReconciler::new(store.clone(), policy.clone(), hook);
        Self {
            store,
            reconciler: Arc::new(reconciler),
            render_cache,
            auth: AuthState::new(jwt, policy),
            site: Arc::new(cfg.site.clone()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Creates the configured store, running migrations for PostgreSQL.
pub async fn create_store(cfg: &AppConfig) -> anyhow::Result<DynSectionStore> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; content is lost on restart");
            Ok(atelier_db_memory::create_store())
        }
        StorageBackend::Postgres => {
            let pg = cfg
                .storage
                .postgres
                .clone()
                .context("storage.backend=postgres requires [storage.postgres]")?;
            tracing::info!(
                url = %atelier_db_postgres::mask_password(&pg.url),
                pool_size = pg.pool_size,
                "connecting to PostgreSQL"
            );
            atelier_db_postgres::create_store(pg)
                .await
                .context("failed to initialize PostgreSQL storage")
        }
    }
}

/// Builds the application for the configured backend.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = create_store(cfg).await?;
    tracing::info!(backend = store.backend_name(), "storage ready");
    Ok(build_router(AppState::new(store, cfg), cfg))
}

pub fn build_router(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .merge(routes::site_routes())
        .merge(routes::admin_routes())
        .with_state(state)
        // Inner to outer: body limit, timeout, content negotiation, compression, cors, trace, request id
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            cfg.request_timeout(),
        ))
        .layer(middleware::from_fn(app_middleware::content_negotiation))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct AtelierServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<AtelierServer> {
        let app = build_app(&self.config).await?;
        Ok(AtelierServer {
            addr: self.addr,
            app,
        })
    }
}

impl AtelierServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
