//! Request echo used to check that routing, CORS and proxies are wired up.

use axum::extract::OriginalUri;
use axum::http::Method;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DiagnosticResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub method: String,
    pub url: String,
    pub timestamp: String,
}

/// ANY /api/v1/diagnostic
///
/// Always 200; reports the method and URL the server saw.
pub async fn echo(method: Method, OriginalUri(uri): OriginalUri) -> Json<DiagnosticResponse> {
    tracing::debug!(%method, %uri, "Diagnostic request");

    Json(DiagnosticResponse {
        status: "success",
        message: "API is working",
        method: method.to_string(),
        url: uri.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
