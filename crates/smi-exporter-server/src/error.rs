use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use smi_exporter_services::ExporterError;
use std::any::Any;
use std::error::Error as _;

pub const WRONG_ROUTE_MESSAGE: &str = "Go to /metrics";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal {
        message: String,
        stack: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl From<ExporterError> for AppError {
    fn from(err: ExporterError) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        AppError::Internal {
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, stack) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Internal { message, stack } => {
                tracing::error!("Scrape failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message, stack)
            }
        };
        (status, Json(ErrorResponse { message, stack })).into_response()
    }
}

/// Converts a handler panic into the same JSON shape as other internal errors.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    AppError::Internal {
        message,
        stack: None,
    }
    .into_response()
}
