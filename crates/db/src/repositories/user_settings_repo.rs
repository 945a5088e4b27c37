//! Repository for the `user_settings` table.

use sqlx::PgPool;

use crate::models::notification::{UpsertUserSettings, UserSettings};

/// Column list for `user_settings` queries.
const COLUMNS: &str = "id, user_id, email_notifications, sms_notifications, \
    notification_email, notification_phone, quiet_hours_enabled, quiet_hours_start, \
    quiet_hours_end, timezone, created_at, updated_at";

pub struct UserSettingsRepo;

impl UserSettingsRepo {
    /// Get a user's settings row, if one has been created.
    pub async fn get(pool: &PgPool, user_id: &str) -> Result<Option<UserSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_settings WHERE user_id = $1");
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a user's settings.
    ///
    /// Uses `COALESCE` so only fields that are `Some` in the input are
    /// overwritten; on first insert the column defaults apply. The nullable
    /// override and quiet-hours columns are written whenever their key was
    /// sent, so `Some(None)` clears them.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        input: &UpsertUserSettings,
    ) -> Result<UserSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_settings \
                (user_id, email_notifications, sms_notifications, notification_email, \
                 notification_phone, quiet_hours_enabled, quiet_hours_start, quiet_hours_end, \
                 timezone) \
             VALUES ($1, COALESCE($2, true), COALESCE($3, false), $4, $5, COALESCE($6, false), \
                     $7, $8, COALESCE($9, 'UTC')) \
             ON CONFLICT (user_id) DO UPDATE SET \
                email_notifications = COALESCE($2, user_settings.email_notifications), \
                sms_notifications = COALESCE($3, user_settings.sms_notifications), \
                notification_email = CASE WHEN $10 THEN $4 ELSE user_settings.notification_email END, \
                notification_phone = CASE WHEN $11 THEN $5 ELSE user_settings.notification_phone END, \
                quiet_hours_enabled = COALESCE($6, user_settings.quiet_hours_enabled), \
                quiet_hours_start = CASE WHEN $12 THEN $7 ELSE user_settings.quiet_hours_start END, \
                quiet_hours_end = CASE WHEN $13 THEN $8 ELSE user_settings.quiet_hours_end END, \
                timezone = COALESCE($9, user_settings.timezone), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(input.email_notifications)
            .bind(input.sms_notifications)
            .bind(input.notification_email.as_ref().and_then(Option::as_deref))
            .bind(input.notification_phone.as_ref().and_then(Option::as_deref))
            .bind(input.quiet_hours_enabled)
            .bind(input.quiet_hours_start.flatten())
            .bind(input.quiet_hours_end.flatten())
            .bind(&input.timezone)
            .bind(input.notification_email.is_some())
            .bind(input.notification_phone.is_some())
            .bind(input.quiet_hours_start.is_some())
            .bind(input.quiet_hours_end.is_some())
            .fetch_one(pool)
            .await
    }
}
