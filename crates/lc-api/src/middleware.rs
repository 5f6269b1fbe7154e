//! lead-catcher/crates/lc-api/src/middleware.rs Middleware
//!
//! Layers wrapped around the submission router: panic containment, the
//! fixed CORS headers, request ids and request tracing.

use std::any::Any;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Router;
use lc_core::{AppError, TARGET_ORIGIN};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::Outcome;

pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Applies every layer in the order the responses need them: a panic is
/// turned into an error page first, so it still receives CORS headers.
pub fn standard_middleware(router: Router) -> Router {
    let router = router.layer(CatchPanicLayer::custom(panic_page));
    cors_policy(router)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

// Configures CORS (Cross-Origin Resource Sharing)
// The same three headers go on every response, including errors and the
// preflight; the origin is never taken from the request.
pub fn cors_policy(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(TARGET_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
}

fn panic_page(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "submission handler panicked");
    Outcome::Failed(AppError::Unexpected(detail)).into_response()
}
