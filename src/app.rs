use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{AppConfig, SecurityConfig, StorageBackend};
use crate::database::{CategoryStore, DatabaseManager, MemoryCategoryStore, PgCategoryStore};
use crate::handlers::{self, category};
use crate::middleware::jwt_auth_middleware;

/// Everything a request handler may need, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CategoryStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn CategoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Open the configured storage backend, applying migrations when enabled
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn CategoryStore> = match config.database.backend {
            StorageBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to database")?;
                if config.database.run_migrations {
                    DatabaseManager::migrate(&pool)
                        .await
                        .context("failed to apply migrations")?;
                }
                Arc::new(PgCategoryStore::new(pool))
            }
            StorageBackend::Memory => {
                warn!("Using in-memory category store; data is lost on restart");
                Arc::new(MemoryCategoryStore::new())
            }
        };

        Ok(Self::new(config, store))
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/category", get(category::list).post(category::create))
        .route(
            "/api/category/:id",
            get(category::show)
                .put(category::update)
                .delete(category::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Protected
        .merge(api)
        // Global middleware
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow everything unless specific origins are configured
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    info!(origins = ?security.cors_origins, "Restricting CORS origins");

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
}
