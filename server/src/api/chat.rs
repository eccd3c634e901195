use crate::api::{MessageRequest, MessageResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use larder_core::{is_food_query, respond};
use utoipa::OpenApi;

/// Fixed reply when the upstream LLM fails; surfaced with HTTP 200.
const LLM_APOLOGY: &str = "Sorry, I couldn't process that.";

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body(content = MessageRequest, example = json!({"message": "How long will pizza in plastic packaging last at 25C with 60% humidity?"})),
    responses(
        (status = 200, description = "Chat reply", body = MessageResponse)
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> impl IntoResponse {
    if req.message.trim().is_empty() {
        return Json(MessageResponse {
            response: "Please provide a message.".to_string(),
        });
    }

    tracing::info!("Received chat message: {}", req.message);

    let response = if state.bundle.loaded && is_food_query(&req.message) {
        tracing::info!("Processing food consumption query with ML model");
        respond(&state.bundle, &req.message)
    } else {
        tracing::info!("Processing general query with LLM");
        match state.llm.complete(&req.message).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::error!("LLM request failed: {}", e);
                LLM_APOLOGY.to_string()
            }
        }
    };

    Json(MessageResponse { response })
}

#[derive(OpenApi)]
#[openapi(paths(chat))]
pub struct ApiDoc;
