//! Repository for the `notification_preferences` table.

use sqlx::PgPool;

use crate::models::notification::NotificationPreference;

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "id, user_id, notification_type, is_enabled, created_at, updated_at";

pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// List all notification preferences for a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<NotificationPreference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_preferences \
             WHERE user_id = $1 \
             ORDER BY notification_type"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Get the preference for one notification type.
    pub async fn get(
        pool: &PgPool,
        user_id: &str,
        notification_type: &str,
    ) -> Result<Option<NotificationPreference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_preferences \
             WHERE user_id = $1 AND notification_type = $2"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(notification_type)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a preference in a single round-trip.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        notification_type: &str,
        is_enabled: bool,
    ) -> Result<NotificationPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_preferences (user_id, notification_type, is_enabled) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, notification_type) DO UPDATE SET \
                is_enabled = EXCLUDED.is_enabled, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(notification_type)
            .bind(is_enabled)
            .fetch_one(pool)
            .await
    }
}
