//! Handlers for the `/notifications` resource.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use bazaar_core::channels::{Channel, LogStatusCounts};
use bazaar_core::error::CoreError;
use bazaar_core::quiet_hours::parse_timezone;
use bazaar_core::template::Variables;
use bazaar_core::validation::{present, require_fields};
use bazaar_db::models::notification::{
    NotificationLog, NotificationPreference, NotificationTemplate, UpdatePreference,
    UpsertUserSettings, UserSettings,
};
use bazaar_db::repositories::{
    NotificationLogRepo, NotificationPreferenceRepo, NotificationTemplateRepo, UserSettingsRepo,
};
use bazaar_events::{ChannelResult, DispatchRequest};
use serde::Deserialize;

use super::validate_body;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Body of `POST /notifications/send`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationBody {
    pub user_id: Option<String>,
    pub notification_type: Option<String>,
    pub template_key: Option<String>,
    #[serde(default)]
    pub variables: Variables,
    pub channels: Option<Vec<String>>,
    /// Recipient address when the user has no override configured.
    pub email: Option<String>,
    /// Recipient phone when the user has no override configured.
    pub phone: Option<String>,
}

impl SendNotificationBody {
    /// Check required fields and build the dispatcher request.
    ///
    /// `notificationType` defaults to `templateKey` when only the latter is
    /// given.
    pub fn into_request(self) -> Result<DispatchRequest, CoreError> {
        require_fields(&[
            ("userId", present(&self.user_id)),
            (
                "notificationType",
                present(&self.notification_type) || present(&self.template_key),
            ),
        ])?;

        let channels = self
            .channels
            .map(|names| {
                names
                    .iter()
                    .map(|n| Channel::from_str(n))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let template_key = self.template_key.filter(|k| !k.trim().is_empty());
        let notification_type = self
            .notification_type
            .filter(|t| !t.trim().is_empty())
            .or_else(|| template_key.clone())
            .unwrap_or_default();

        Ok(DispatchRequest {
            user_id: self.user_id.unwrap_or_default(),
            notification_type,
            template_key,
            variables: self.variables,
            channels,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Query parameters for `GET /notifications/logs`.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub user_id: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Query parameters for `GET /notifications/logs/counts`.
#[derive(Debug, Deserialize)]
pub struct CountsQuery {
    pub user_id: Option<String>,
}

/// Maximum page size for log listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for log listing.
const DEFAULT_LIMIT: i64 = 50;

fn required_user_id(user_id: Option<String>) -> Result<String, CoreError> {
    require_fields(&[("user_id", present(&user_id))])?;
    Ok(user_id.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications/send
///
/// Run the dispatcher and return one result per attempted channel. Channel
/// failures are reported inside the results, not as an HTTP error.
pub async fn send(
    State(state): State<AppState>,
    Json(body): Json<SendNotificationBody>,
) -> AppResult<Json<DataResponse<Vec<ChannelResult>>>> {
    let request = body.into_request()?;
    let results = state.dispatcher.dispatch(&request).await;
    Ok(Json(DataResponse { data: results }))
}

// ---------------------------------------------------------------------------
// Delivery log
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/logs?user_id=&limit=&offset=
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> AppResult<Json<DataResponse<Vec<NotificationLog>>>> {
    let user_id = required_user_id(params.user_id)?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let logs = NotificationLogRepo::list_for_user(&state.pool, &user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/notifications/logs/counts?user_id=
///
/// Polled by dashboards for near-real-time totals.
pub async fn log_counts(
    State(state): State<AppState>,
    Query(params): Query<CountsQuery>,
) -> AppResult<Json<DataResponse<LogStatusCounts>>> {
    let user_id = required_user_id(params.user_id)?;
    let counts = NotificationLogRepo::status_counts(&state.pool, &user_id).await?;
    Ok(Json(DataResponse { data: counts }))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NotificationTemplate>>>> {
    let templates = NotificationTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/notifications/templates/{key}
///
/// Returns `{ "data": null }` for an unknown key.
pub async fn get_template(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<Option<NotificationTemplate>>>> {
    let template = NotificationTemplateRepo::find_by_key(&state.pool, &key).await?;
    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/settings/{user_id}
///
/// Returns `{ "data": null }` until the user saves settings.
pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<Option<UserSettings>>>> {
    let settings = UserSettingsRepo::get(&state.pool, &user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/notifications/settings/{user_id}
///
/// Partial update: omitted fields keep their stored value.
pub async fn update_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpsertUserSettings>,
) -> AppResult<Json<DataResponse<UserSettings>>> {
    validate_body(&input)?;
    if let Some(tz) = &input.timezone {
        parse_timezone(tz)?;
    }

    let settings = UserSettingsRepo::upsert(&state.pool, &user_id, &input).await?;
    tracing::info!(user_id = %user_id, "Notification settings updated");
    Ok(Json(DataResponse { data: settings }))
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences/{user_id}
///
/// Types without a row are enabled and are not listed.
pub async fn list_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<NotificationPreference>>>> {
    let prefs = NotificationPreferenceRepo::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// PUT /api/v1/notifications/preferences/{user_id}/{notification_type}
pub async fn update_preference(
    State(state): State<AppState>,
    Path((user_id, notification_type)): Path<(String, String)>,
    Json(input): Json<UpdatePreference>,
) -> AppResult<Json<DataResponse<NotificationPreference>>> {
    require_fields(&[("isEnabled", input.is_enabled.is_some())])?;
    let is_enabled = input.is_enabled.unwrap_or(true);

    let pref =
        NotificationPreferenceRepo::upsert(&state.pool, &user_id, &notification_type, is_enabled)
            .await?;
    Ok(Json(DataResponse { data: pref }))
}
