use crate::state::AppState;
use crate::{api, logging, openapi, ui};
use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Caseiro API",
        description = "Poultry-house alert dashboard: triggers, agent-written alerts and maintenance email",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Triggers", description = "Trigger events and related messages"),
        (name = "Alerts", description = "Alert retrieval and email notification")
    )
)]
struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn build_http_app(state: AppState) -> Router {
    let (api_router, api_spec) = api::api_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(api_spec);
    let spec = Arc::new(merged_spec.clone());

    let cors = cors_layer(&state.config.cors_allowed_origins);

    api_router
        .merge(ui::ui_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", merged_spec))
        .merge(openapi::yaml_route(spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
