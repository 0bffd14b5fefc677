use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use tracing::{debug, error, warn};

use super::auth::verify_admin_password;
use super::types::*;
use crate::server::AppState;
use crate::story::StoryIdentification;

pub async fn trending(State(state): State<AppState>) -> Json<TrendingResponse> {
    let catalog = state.catalog.trending().await.unwrap_or_default();

    let mut trending = state.manual.load().await;
    trending.extend(catalog);

    Json(TrendingResponse {
        trending,
        most_searched: most_searched(),
    })
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<SearchResponse> {
    let query = params.get("q").map(String::as_str).unwrap_or("");
    let results = state.catalog.search(query).await.unwrap_or_default();

    Json(SearchResponse { results })
}

pub async fn find(State(state): State<AppState>, body: Bytes) -> Json<StoryIdentification> {
    let req: FindRequest = serde_json::from_slice(&body).unwrap_or_default();
    let story = req.story.unwrap_or_default();
    let lang = req.lang.unwrap_or_else(|| "en".to_string());

    let result = state
        .story
        .identify(&story, &lang)
        .await
        .resolve(|_| StoryIdentification::ai_error());

    Json(result)
}

pub async fn admin_add(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AdminAddResponse>, StatusCode> {
    let req: AdminAddRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Admin add body is not a JSON object: {}", e);
        AdminAddRequest::default()
    });

    let supplied = req.password.clone().unwrap_or_default();
    if !verify_admin_password(&state.config.admin.password, &supplied) {
        warn!("Rejected admin add with wrong password");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let manual_count = state.manual.add(req.into_entry()).await.map_err(|e| {
        error!("Failed to save manual override: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AdminAddResponse {
        ok: true,
        manual_count,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
