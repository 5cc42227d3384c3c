//! Error handling for the labelhooks server

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labelhooks::WebhookError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Webhook service error
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Webhook(WebhookError::Validation(_)) | ServerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Webhook(WebhookError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Webhook(WebhookError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Webhook(WebhookError::Validation(_)) => "validation_error",
            ServerError::Webhook(WebhookError::NotFound { .. }) => "not_found",
            ServerError::Webhook(WebhookError::Storage(_)) => "storage_error",
            ServerError::BadRequest(_) => "bad_request",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Webhook(WebhookError::Validation(e)) => Some(e.details()),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a bad request error
pub fn bad_request(message: &str) -> ServerError {
    ServerError::BadRequest(message.to_string())
}
