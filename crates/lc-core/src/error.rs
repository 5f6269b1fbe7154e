//! # AppError
//!
//! Centralized error handling for lead-catcher.
//! Every way a submission can fail maps to one variant here, which in turn
//! knows its HTTP status and the message a visitor is allowed to see.

use thiserror::Error;

/// The primary error type for a submission attempt.
#[derive(Error, Debug)]
pub enum AppError {
    /// Anything other than POST (or the OPTIONS preflight)
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Content type outside the accepted form encodings; carries the lower-cased header value
    #[error("invalid content type: {0}")]
    UnsupportedContentType(String),

    /// Body could not be read or a multipart stream was malformed
    #[error("unreadable request body: {0}")]
    UnreadableBody(String),

    #[error("name and email are required")]
    MissingRequiredFields,

    #[error("invalid email")]
    InvalidEmail,

    #[error("consent required")]
    ConsentRequired,

    /// Store credentials were never configured
    #[error("server configuration incomplete")]
    ServerConfiguration,

    /// The store refused or never received the row
    #[error("store write failed: {0}")]
    StoreWrite(#[source] StoreError),

    /// Anything else, including a panic caught at the router boundary
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// HTTP status code reported for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::MethodNotAllowed => 405,
            AppError::UnsupportedContentType(_)
            | AppError::UnreadableBody(_)
            | AppError::MissingRequiredFields
            | AppError::InvalidEmail
            | AppError::ConsentRequired => 400,
            AppError::ServerConfiguration | AppError::StoreWrite(_) | AppError::Unexpected(_) => 500,
        }
    }

    /// The text rendered into the response page.
    ///
    /// Server-side failures collapse into generic wording; their detail only
    /// ever reaches the logs through `Display`.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UnreadableBody(_) => "unreadable request body".to_string(),
            AppError::StoreWrite(_) => "save failed, try again".to_string(),
            AppError::Unexpected(_) => "unexpected error, try again".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // A row we could not even serialize never reached the store.
            StoreError::Encoding(detail) => AppError::Unexpected(detail),
            other => AppError::StoreWrite(other),
        }
    }
}

/// Failures reported by a `LeadStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store answered and refused the insert
    #[error("store rejected insert with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The record could not be encoded for the store
    #[error("record encoding failed: {0}")]
    Encoding(String),
}

/// A specialized Result type for lead-catcher logic.
pub type Result<T> = std::result::Result<T, AppError>;
