use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parlo_core::HttpError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpeechError>;

/// Speech pipeline errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Request failed schema validation
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        /// Per-field diagnostics safe to expose to the caller
        details: Option<serde_json::Value>,
    },

    /// Missing or invalid bearer token
    #[error("missing or invalid authorization")]
    Unauthenticated(String),

    /// Transport or provider error reaching the model, including timeouts
    #[error("model provider request failed")]
    ModelUnavailable(String),

    /// The model returned no usable content
    #[error("model returned no content")]
    EmptyResult,

    /// Model output was not valid JSON or violated the output schema
    ///
    /// The inner detail is logged only; raw model output never reaches
    /// the caller.
    #[error("model output failed validation")]
    MalformedOutput(String),

    /// Unexpected internal error
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SpeechError {
    /// Convenience constructor for validation failures without diagnostics
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details: None,
        }
    }
}

impl HttpError for SpeechError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::ModelUnavailable(_) | Self::EmptyResult | Self::MalformedOutput(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request_error",
            Self::Unauthenticated(_) => "authentication_error",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::EmptyResult => "empty_model_result",
            Self::MalformedOutput(_) => "malformed_model_output",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}

/// Error body returned to API consumers
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::ModelUnavailable(detail) => {
                tracing::error!(detail = %detail, "model provider unavailable");
            }
            Self::MalformedOutput(detail) => {
                tracing::error!(detail = %detail, "discarding malformed model output");
            }
            Self::Internal(source) => {
                tracing::error!(error = %source, "internal error");
            }
            _ => {}
        }

        let details = match &self {
            Self::InvalidRequest { details, .. } => details.clone(),
            _ => None,
        };

        let body = ErrorBody {
            error: self.error_type().to_owned(),
            message: self.client_message(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
