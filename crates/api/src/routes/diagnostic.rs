use axum::routing::any;
use axum::Router;

use crate::handlers::diagnostic;
use crate::state::AppState;

/// ```text
/// ANY    /diagnostic                -> echo
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/diagnostic", any(diagnostic::echo))
}
