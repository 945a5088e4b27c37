pub mod business;
pub mod category;
pub mod diagnostic;
pub mod health;
pub mod notification;
pub mod storage;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /diagnostic                                       request echo (any method)
///
/// /notifications/send                               dispatch (POST)
/// /notifications/logs                               delivery log (GET)
/// /notifications/logs/counts                        per-status totals (GET)
/// /notifications/templates                          list (GET)
/// /notifications/templates/{key}                    get (GET)
/// /notifications/settings/{user_id}                 get, upsert (GET, PUT)
/// /notifications/preferences/{user_id}              list (GET)
/// /notifications/preferences/{user_id}/{type}       upsert (PUT)
///
/// /businesses/{business_id}/profile                 get, upsert (GET, PUT)
/// /businesses/{business_id}/tax-info                get, upsert (GET, PUT)
/// /businesses/{business_id}/categories              list (GET)
///
/// /categories                                       add (POST)
/// /categories/delete                                delete one or all (POST)
///
/// /storage/upload                                   upload (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(diagnostic::router())
        .nest("/notifications", notification::router())
        .nest("/businesses", business::router())
        .nest("/categories", category::router())
        .nest("/storage", storage::router())
}
