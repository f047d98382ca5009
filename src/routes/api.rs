use crate::{
    config::Config,
    docs::ApiDoc,
    handlers::{diagnostics, health_check, save_document, status},
    state::AppState,
    websocket::websocket_handler,
};
use axum::{http::HeaderValue, routing::{get, post}, Router};
use tower_http::{cors::{AllowOrigin, Any, CorsLayer}, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create API routes
pub fn create_api_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .route("/diagnostics", get(diagnostics))
}

/// Build the full application: status, save, the collaboration socket and the API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/", get(status))
        .route("/save", post(save_document))
        .route("/ws", get(websocket_handler))
        .nest("/api", create_api_routes())
        .with_state(state)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.allowed_origins() {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}
