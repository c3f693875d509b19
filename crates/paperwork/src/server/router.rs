//! Axum router construction.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/forms", get(handlers::list_forms))
        .route("/forms/:jurisdiction/:code/preview", get(handlers::preview_form))
        .route("/forms/:jurisdiction/:code/fill", post(handlers::fill_form))
        .route("/answers", get(handlers::get_answers))
        .route("/answers/:field", put(handlers::put_answer))
        .route("/session/sign-out", post(handlers::sign_out))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
