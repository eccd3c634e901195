use crate::api::{ErrorResponse, MessageRequest, MessageResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::respond;
use utoipa::OpenApi;

/// Direct endpoint for shelf-life prediction.
///
/// Unlike /chat, this endpoint does not fall back to the LLM: when the
/// trained models are unavailable it answers 503 so callers can route to
/// the general chat path instead.
#[utoipa::path(
    post,
    path = "/api/food-prediction",
    tag = "prediction",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Shelf-life prediction reply", body = MessageResponse),
        (status = 503, description = "Trained models unavailable", body = ErrorResponse)
    )
)]
pub async fn food_prediction(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> impl IntoResponse {
    if !state.bundle.loaded {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "ML models are not available".to_string(),
            }),
        )
            .into_response();
    }

    let response = respond(&state.bundle, &req.message);
    (StatusCode::OK, Json(MessageResponse { response })).into_response()
}

#[derive(OpenApi)]
#[openapi(paths(food_prediction))]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::{AppContext, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use larder_core::llm::FakeProvider;
    use larder_core::model::{Forest, Preprocessor};
    use larder_core::ModelBundle;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(bundle: ModelBundle) -> axum::Router {
        let state: AppState = Arc::new(AppContext {
            bundle,
            llm: Box::new(FakeProvider::new()),
        });
        api::router().with_state(state)
    }

    fn loaded_bundle() -> ModelBundle {
        let preprocessor: Preprocessor = serde_json::from_value(serde_json::json!({
            "food_categories": ["pizza"],
            "packaging_categories": ["plastic"],
            "numeric_means": [20.0, 50.0],
            "numeric_stds": [10.0, 25.0]
        }))
        .unwrap();
        let forest: Forest = serde_json::from_value(serde_json::json!({
            "trees": [{"nodes": [{"value": 24.0}]}]
        }))
        .unwrap();
        ModelBundle::new(Some(forest), None, Some(preprocessor))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_unavailable_bundle_returns_503() {
        let app = app(ModelBundle::unavailable());
        let request = post_json(
            "/api/food-prediction",
            r#"{"message": "How long will pizza in plastic packaging last at 25C with 60% humidity?"}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unavailable_bundle_ignores_message_content() {
        let app = app(ModelBundle::unavailable());
        let response = app
            .oneshot(post_json("/api/food-prediction", r#"{"message": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_loaded_bundle_predicts() {
        let app = app(loaded_bundle());
        let request = post_json(
            "/api/food-prediction",
            r#"{"message": "How long will pizza in plastic packaging last at 25C with 60% humidity?"}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["response"], "consume within 24 hours");
    }

    #[tokio::test]
    async fn test_loaded_bundle_asks_for_missing_fields() {
        let app = app(loaded_bundle());
        let response = app
            .oneshot(post_json(
                "/api/food-prediction",
                r#"{"message": "how long will pizza last"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let text = parsed["response"].as_str().unwrap();
        assert!(text.contains("packaging type, temperature, humidity"));
    }
}
