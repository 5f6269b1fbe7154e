//! # lc-api
//!
//! The HTTP surface of lead-catcher: one handler answering every path.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;

pub use handlers::{AppState, Outcome};

/// Builds the router around `state`.
///
/// # Developer Note
/// There are no routes, only a fallback: the form posts to whatever path
/// the hosting platform exposes, and OPTIONS/GET must be answered on that
/// same path.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;
    let app = Router::new()
        .fallback(handlers::submit)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state));
    middleware::standard_middleware(app)
}
