use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::MovieCatalog;
use crate::config::Config;
use crate::manual::ManualStore;
use crate::story::StoryIdentifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manual: Arc<ManualStore>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub story: Arc<dyn StoryIdentifier>,
}

impl AppState {
    pub fn new(
        config: Config,
        manual: Arc<ManualStore>,
        catalog: Arc<dyn MovieCatalog>,
        story: Arc<dyn StoryIdentifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            manual,
            catalog,
            story,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/trending", get(crate::api::trending))
        .route("/search", get(crate::api::search))
        .route("/find", post(crate::api::find))
        .route("/admin/add", post(crate::api::admin_add))
        .route("/health", get(crate::api::health))
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum::middleware::from_fn(crate::middleware::log_request)),
        )
        .with_state(state)
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    // Preflight for unknown paths
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
