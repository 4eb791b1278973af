use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request failed (404 status code): {0}")]
    NotFound(String),

    #[error("Unexpected status {status} from {provider}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Malformed provider payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(reqwest::Error),
}

impl Error {
    /// Transport failures are recovered by the adapters instead of surfacing.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Reqwest(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // A request that could not be built points at a bad base URL or header value.
        if err.is_builder() {
            Error::Config(format!("Invalid HTTP request: {}", err))
        } else {
            Error::Reqwest(err)
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::NotFound(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Request failed (404 status code): {}", msg),
            ),
            err @ Error::UnexpectedStatus { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
            Error::Json(err) => (
                StatusCode::BAD_GATEWAY,
                format!("Malformed provider payload: {}", err),
            ),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
