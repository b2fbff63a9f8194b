pub mod action;
pub mod auth;
pub mod error;
pub mod logs;
pub mod middleware;
pub mod tools;

use axum::{
    Json, Router,
    http::{Method, header::{AUTHORIZATION, CONTENT_TYPE}},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use jsi_tools::ToolKind;
use jsi_types::api::StatusResponse;

use crate::auth::AppState;
use crate::middleware::require_auth;

pub const SERVICE_NAME: &str = "Jakarta Secure Individual API";

/// Build the full HTTP surface: path routes plus the `?action=` endpoint.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(service_status))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api", get(action::handle_action).post(action::handle_action));

    let protected_routes = ToolKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.route(tools::tool_path(kind), tools::tool_route(kind))
        })
        .route("/api/logs", get(logs::get_logs))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // Permissive CORS: the frontend is served from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn service_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        user: None,
    })
}
