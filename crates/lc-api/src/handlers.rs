//! # lc-api Handlers
//!
//! This module coordinates the flow between the HTTP request and the core
//! screening logic. Every gate is a terminal short-circuit: the first
//! failure becomes the response.

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use lc_core::{
    screen, AppError, FormEncoding, FormFields, FormPolicy, LeadStore, RequestMeta, Screening,
    Submission,
};
use tracing::{debug, error, info, warn};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Checked in order; the first header present is copied verbatim.
const CLIENT_IP_HEADERS: [&str; 3] = ["x-nf-client-connection-ip", "x-forwarded-for", "x-real-ip"];

const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Served if the outcome template itself fails to render.
const FALLBACK_PAGE: &str = "<!doctype html><meta charset=\"utf-8\"><p>unexpected error</p>";

/// State shared by every request. Built once at startup, never mutated.
pub struct AppState {
    pub policy: FormPolicy,
    pub table: String,
    /// `None` when store credentials were not configured
    pub store: Option<Arc<dyn LeadStore>>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(policy: FormPolicy, table: impl Into<String>, store: Option<Arc<dyn LeadStore>>) -> Self {
        Self {
            policy,
            table: table.into(),
            store,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// How a request ended, rendered as the iframe page.
#[derive(Debug)]
pub enum Outcome {
    /// CORS preflight: empty body
    Preflight,
    /// Stored, or silently absorbed by the honeypot
    Submitted,
    Failed(AppError),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let (status, rendered) = match &self {
            Outcome::Preflight => return html(StatusCode::OK, String::new()),
            Outcome::Submitted => (StatusCode::OK, lc_ui::render_submitted()),
            Outcome::Failed(err) => (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                lc_ui::render_error(&err.public_message()),
            ),
        };

        match rendered {
            Ok(body) => html(status, body),
            Err(err) => {
                error!(error = %err, "outcome page failed to render");
                html(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_PAGE.to_string())
            }
        }
    }
}

fn html(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

/// Entry point for every method on every path.
pub async fn submit(State(state): State<Arc<AppState>>, request: Request) -> Outcome {
    match process(&state, request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if err.is_client_error() {
                warn!(error = %err, status = err.status_code(), "submission rejected");
            } else {
                error!(error = %err, status = err.status_code(), "submission failed");
            }
            Outcome::Failed(err)
        }
    }
}

async fn process(state: &AppState, request: Request) -> lc_core::Result<Outcome> {
    // 1. Preflight and method gate
    if request.method() == Method::OPTIONS {
        return Ok(Outcome::Preflight);
    }
    if request.method() != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    // 2. Content-type gate
    let content_type = header_text(request.headers(), &header::CONTENT_TYPE).to_ascii_lowercase();
    let encoding = FormEncoding::from_content_type(&content_type)
        .ok_or_else(|| AppError::UnsupportedContentType(content_type.clone()))?;

    // 3. Decode (headers are copied first, the body consumes the request)
    let meta = request_meta(request.headers());
    let fields = decode(state, encoding, request).await?;
    debug!(keys = ?fields.keys().collect::<Vec<_>>(), ?encoding, "decoded form fields");

    // 4. Honeypot and validation
    let lead = match screen(&fields, &state.policy)? {
        Screening::Honeypot => {
            info!(field = %state.policy.honeypot_field, "honeypot filled, discarding submission");
            return Ok(Outcome::Submitted);
        }
        Screening::Accepted(lead) => lead,
    };

    // 5. Persistence: exactly one insert
    let store = state.store.as_ref().ok_or(AppError::ServerConfiguration)?;
    let record = Submission::new(lead, meta, fields, Utc::now());
    store.insert(&state.table, &record).await?;

    info!(table = %state.table, form_type = %record.form_type, "lead stored");
    Ok(Outcome::Submitted)
}

async fn decode(state: &AppState, encoding: FormEncoding, request: Request) -> lc_core::Result<FormFields> {
    match encoding {
        FormEncoding::UrlEncoded => {
            let bytes = to_bytes(request.into_body(), state.max_body_bytes)
                .await
                .map_err(|err| AppError::UnreadableBody(err.to_string()))?;
            Ok(FormFields::from_urlencoded(&bytes))
        }
        FormEncoding::Multipart => decode_multipart(request).await,
    }
}

/// Collects text parts; parts carrying a filename are skipped unread.
async fn decode_multipart(request: Request) -> lc_core::Result<FormFields> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| AppError::UnreadableBody(rejection.to_string()))?;

    let mut fields = FormFields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::UnreadableBody(err.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            debug!(field = %name, "skipping file part");
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|err| AppError::UnreadableBody(err.to_string()))?;
        fields.insert(name, value);
    }
    Ok(fields)
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let client_ip = CLIENT_IP_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    RequestMeta {
        user_agent: header_text(headers, &header::USER_AGENT),
        client_ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        assert_eq!(request_meta(&headers).client_ip, "10.0.0.1, 10.0.0.2");

        headers.insert("x-nf-client-connection-ip", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(request_meta(&headers).client_ip, "203.0.113.9");
    }

    #[test]
    fn test_missing_headers_default_to_empty() {
        let meta = request_meta(&HeaderMap::new());
        assert_eq!(meta, RequestMeta::default());
    }

    #[test]
    fn test_preflight_has_empty_body() {
        let response = Outcome::Preflight.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], HTML_CONTENT_TYPE);
    }

    #[test]
    fn test_failure_status_mapping() {
        let response = Outcome::Failed(AppError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let response = Outcome::Failed(AppError::ServerConfiguration).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
