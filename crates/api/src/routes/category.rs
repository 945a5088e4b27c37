use axum::routing::post;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// POST   /                          -> add_category
/// POST   /delete                    -> delete_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(category::add_category))
        .route("/delete", post(category::delete_categories))
}
