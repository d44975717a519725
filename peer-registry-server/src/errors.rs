use std::fmt::{Display, Formatter};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use peer_registry_core::{ErrorResponse, RegistryError};
use thiserror::Error;
use tracing::{error, warn};

/// Body returned for every failure that is not the caller's fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    ApiError(#[from] ApiError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Request body is null")]
    NullBody,
}

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(message) => write!(f, "Status=400, BadRequest: {}", message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::ApiError(e) => {
                warn!("{}", e);
                match e {
                    ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
                }
            }
            other => {
                error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
