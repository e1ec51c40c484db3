use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// User-facing message for server failures unless the endpoint overrides it.
pub const DEFAULT_FAILURE_MESSAGE: &str = "处理请求时发生错误";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Client errors render as `{ "error": ... }`; server errors render as
/// `{ "status": "error", "message": ..., "error": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("Forbidden")]
    Forbidden,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Wraps an LLM failure with the default user-facing message.
    pub fn upstream(source: LlmError) -> Self {
        AppError::Upstream {
            message: DEFAULT_FAILURE_MESSAGE,
            source,
        }
    }

    /// Replaces the user-facing message on an upstream failure. Other variants pass through.
    pub fn with_failure_message(self, message: &'static str) -> Self {
        match self {
            AppError::Upstream { source, .. } => AppError::Upstream { message, source },
            other => other,
        }
    }
}

fn client_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn server_error(message: &str, error: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": message,
            "error": error
        })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => client_error(StatusCode::BAD_REQUEST, msg),
            AppError::MalformedBody(rejection) => {
                tracing::debug!("Rejected request body: {rejection}");
                client_error(StatusCode::BAD_REQUEST, "请求体格式错误".to_string())
            }
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                [(header::CONTENT_TYPE, "text/plain")],
                "Forbidden: Origin not allowed",
            )
                .into_response(),
            AppError::MethodNotAllowed => client_error(
                StatusCode::METHOD_NOT_ALLOWED,
                "只接受POST请求".to_string(),
            ),
            AppError::Upstream { message, source } => {
                tracing::error!("LLM error: {source}");
                server_error(message, source.to_string())
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {e}");
                server_error(DEFAULT_FAILURE_MESSAGE, e.to_string())
            }
        }
    }
}
