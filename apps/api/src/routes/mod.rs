pub mod health;
pub mod origin;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::errors::AppError;
use crate::sign::handlers;
use crate::state::AppState;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// POST handler plus CORS preflight; every other method is a 405.
fn sign_endpoint(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.options(origin::preflight).fallback(method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = Arc::new(state.config.allowed_origins.clone());

    let sign_routes = Router::new()
        .route(
            "/api/calculateSignLevel",
            sign_endpoint(post(handlers::handle_calculate_sign_level)),
        )
        .route(
            "/api/validateWish",
            sign_endpoint(post(handlers::handle_validate_wish)),
        )
        .route(
            "/api/generateSign",
            sign_endpoint(post(handlers::handle_generate_sign)),
        )
        .layer(middleware::from_fn_with_state(
            allowed_origins,
            origin::origin_guard,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(sign_routes)
        .with_state(state)
}
