use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub status: String,
    pub ml_models_loaded: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub ml_models_loaded: bool,
    pub llm_available: bool,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service banner", body = IndexResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(IndexResponse {
        message: "larder chat API is running".to_string(),
        status: "active".to_string(),
        ml_models_loaded: state.bundle.loaded,
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health check", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        ml_models_loaded: state.bundle.loaded,
        llm_available: true,
    })
}

#[derive(OpenApi)]
#[openapi(paths(index, health), components(schemas(IndexResponse, HealthResponse)))]
pub struct ApiDoc;
