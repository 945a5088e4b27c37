use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Upload bodies carry base64 file data, so the default 2 MB limit is raised.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Routes mounted at `/storage`.
///
/// ```text
/// POST   /upload                    -> upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(storage::upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
