mod api;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use larder_core::llm::{self, FakeProvider, LlmProvider};
use larder_core::ModelBundle;
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
pub struct AppContext {
    pub bundle: ModelBundle,
    pub llm: Box<dyn LlmProvider>,
}

pub type AppState = Arc<AppContext>;

fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi().to_pretty_json().unwrap();
        println!("{}", spec);
        return;
    }

    init_telemetry();

    let bundle = ModelBundle::from_env();
    if bundle.loaded {
        tracing::info!("ML models initialized successfully");
    } else {
        tracing::warn!("ML models failed to initialize, using mock predictions");
    }

    let llm: Box<dyn LlmProvider> = match llm::create_provider_from_env() {
        Ok(provider) => {
            tracing::info!(
                "LLM provider configured: {} ({})",
                provider.provider_name(),
                provider.model_name()
            );
            provider
        }
        Err(e) => {
            // Chat still answers; every LLM call fails and surfaces the
            // fixed apology instead.
            tracing::warn!("LLM provider not configured: {}", e);
            Box::new(FakeProvider::new())
        }
    };

    let state: AppState = Arc::new(AppContext { bundle, llm });

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Don't create a span at all for noisy endpoints
                    if matched_path == "/health" {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        // Skip logging for noisy endpoints (trace-level spans)
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                ),
        );

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(5001);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui/", port);

    axum::serve(listener, app).await.unwrap();
}
