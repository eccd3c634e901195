pub mod chat;
pub mod health;
pub mod prediction;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Incoming chat-style message body.
///
/// A missing message field is tolerated and treated as an empty message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: String,
}

/// Chat-style response body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub response: String,
}

/// Returns the router for all endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route("/api/food-prediction", post(prediction::food_prediction))
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse, MessageRequest, MessageResponse)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        health::ApiDoc::openapi(),
        chat::ApiDoc::openapi(),
        prediction::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
