//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// POST   /send                              -> send
///
/// GET    /logs                              -> list_logs
/// GET    /logs/counts                       -> log_counts
///
/// GET    /templates                         -> list_templates
/// GET    /templates/{key}                   -> get_template
///
/// GET    /settings/{user_id}                -> get_settings
/// PUT    /settings/{user_id}                -> update_settings
///
/// GET    /preferences/{user_id}             -> list_preferences
/// PUT    /preferences/{user_id}/{type}      -> update_preference
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send", post(notification::send))
        // Delivery log
        .route("/logs", get(notification::list_logs))
        .route("/logs/counts", get(notification::log_counts))
        // Templates
        .route("/templates", get(notification::list_templates))
        .route("/templates/{key}", get(notification::get_template))
        // Settings
        .route(
            "/settings/{user_id}",
            get(notification::get_settings).put(notification::update_settings),
        )
        // Preferences
        .route(
            "/preferences/{user_id}",
            get(notification::list_preferences),
        )
        .route(
            "/preferences/{user_id}/{notification_type}",
            put(notification::update_preference),
        )
}
