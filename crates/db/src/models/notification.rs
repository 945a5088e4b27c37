//! Notification entity models and DTOs.

use bazaar_core::channels::Channel;
use bazaar_core::quiet_hours::{parse_timezone, QuietHours, Tz};
use bazaar_core::types::{DbId, Timestamp};
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `notification_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub template_key: String,
    pub name: String,
    pub email_subject: Option<String>,
    pub email_body_html: Option<String>,
    pub email_body_text: Option<String>,
    pub sms_body: Option<String>,
    pub variables: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationTemplate {
    /// A template is usable on a channel only when it carries that
    /// channel's body.
    pub fn supports(&self, channel: Channel) -> bool {
        let has = |body: &Option<String>| body.as_deref().is_some_and(|b| !b.trim().is_empty());
        match channel {
            Channel::Email => has(&self.email_body_html) || has(&self.email_body_text),
            Channel::Sms => has(&self.sms_body),
        }
    }
}

/// A row from the `user_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSettings {
    pub id: DbId,
    pub user_id: String,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub notification_email: Option<String>,
    pub notification_phone: Option<String>,
    pub quiet_hours_enabled: bool,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserSettings {
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email_notifications,
            Channel::Sms => self.sms_notifications,
        }
    }

    /// Override recipient configured for `channel`, if any.
    pub fn recipient_override(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email => self.notification_email.as_deref(),
            Channel::Sms => self.notification_phone.as_deref(),
        }
        .filter(|s| !s.trim().is_empty())
    }

    /// The configured quiet-hours window, when enabled and fully specified.
    ///
    /// An unparseable timezone falls back to UTC.
    pub fn quiet_hours(&self) -> Option<QuietHours> {
        if !self.quiet_hours_enabled {
            return None;
        }
        let (start, end) = (self.quiet_hours_start?, self.quiet_hours_end?);
        let timezone = parse_timezone(&self.timezone).unwrap_or_else(|_| {
            tracing::warn!(
                user_id = %self.user_id,
                timezone = %self.timezone,
                "Unknown timezone in user settings, using UTC"
            );
            Tz::UTC
        });
        Some(QuietHours::new(start, end, timezone))
    }
}

/// DTO for upserting user settings. `None` fields keep their current value
/// (or the column default on first insert).
///
/// The override addresses and quiet-hours bounds are nullable columns: an
/// absent key keeps the stored value (`None`), an explicit JSON `null`
/// clears it (`Some(None)`).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserSettings {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email)]
    pub notification_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(min = 7, max = 20))]
    pub notification_phone: Option<Option<String>>,
    pub quiet_hours_enabled: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub quiet_hours_start: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "nullable")]
    pub quiet_hours_end: Option<Option<NaiveTime>>,
    pub timezone: Option<String>,
}

/// Present keys become `Some`, so `null` survives as `Some(None)`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A row from the `notification_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub id: DbId,
    pub user_id: String,
    pub notification_type: String,
    pub is_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a notification preference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreference {
    pub is_enabled: Option<bool>,
}

/// A row from the `notification_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationLog {
    pub id: DbId,
    pub user_id: String,
    pub notification_type: String,
    pub template_key: Option<String>,
    pub channel: String,
    pub recipient: Option<String>,
    pub status: String,
    pub skip_reason: Option<String>,
    pub external_id: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a delivery attempt to `notification_logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNotificationLog {
    pub user_id: String,
    pub notification_type: String,
    pub template_key: Option<String>,
    pub channel: Channel,
    pub recipient: Option<String>,
    pub status: &'static str,
    pub skip_reason: Option<&'static str>,
    pub external_id: Option<String>,
    pub error_message: Option<String>,
}
