use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bazaar_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ error, code, details? }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bazaar_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A third-party provider this route needs has no configuration.
    #[error("{0} is not configured")]
    ServiceNotConfigured(&'static str),

    /// A third-party provider call failed.
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                CoreError::MissingFields(fields) => (
                    StatusCode::BAD_REQUEST,
                    "MISSING_FIELDS",
                    "Missing required fields".to_string(),
                    Some(json!(fields)),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Provider errors ---
            AppError::ServiceNotConfigured(service) => {
                tracing::error!(service, "Request needs an unconfigured service");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVICE_NOT_CONFIGURED",
                    format!("{service} is not configured"),
                    None,
                )
            }
            AppError::Upstream { service, message } => {
                tracing::error!(service, error = %message, "Upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    format!("{service} request failed"),
                    Some(json!(message)),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String, Option<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Classify a sqlx error into an HTTP status, error code, message and details.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with the database message in `details`.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            database_failure(db_err.message())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            database_failure(&other.to_string())
        }
    }
}

fn database_failure(message: &str) -> (StatusCode, &'static str, String, Option<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "DATABASE_ERROR",
        "Database request failed".to_string(),
        Some(json!(message)),
    )
}
