//! Repository for the append-only `notification_logs` table.
//!
//! Rows are written once per delivery attempt and never updated or
//! deleted.

use bazaar_core::channels::{LogStatusCounts, STATUS_FAILED, STATUS_SENT, STATUS_SKIPPED};
use bazaar_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotificationLog, NotificationLog};

/// Column list for `notification_logs` queries.
const COLUMNS: &str = "id, user_id, notification_type, template_key, channel, recipient, \
    status, skip_reason, external_id, error_message, created_at";

pub struct NotificationLogRepo;

impl NotificationLogRepo {
    /// Append one delivery attempt, returning the generated ID.
    pub async fn create(pool: &PgPool, log: &CreateNotificationLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notification_logs \
                (user_id, notification_type, template_key, channel, recipient, status, \
                 skip_reason, external_id, error_message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(&log.user_id)
        .bind(&log.notification_type)
        .bind(&log.template_key)
        .bind(log.channel.as_str())
        .bind(&log.recipient)
        .bind(log.status)
        .bind(log.skip_reason)
        .bind(&log.external_id)
        .bind(&log.error_message)
        .fetch_one(pool)
        .await
    }

    /// List a user's delivery attempts, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_logs \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NotificationLog>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's delivery attempts per status.
    pub async fn status_counts(pool: &PgPool, user_id: &str) -> Result<LogStatusCounts, sqlx::Error> {
        let (sent, failed, skipped): (i64, i64, i64) = sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE status = $2), \
                COUNT(*) FILTER (WHERE status = $3), \
                COUNT(*) FILTER (WHERE status = $4) \
             FROM notification_logs WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(STATUS_SENT)
        .bind(STATUS_FAILED)
        .bind(STATUS_SKIPPED)
        .fetch_one(pool)
        .await?;

        Ok(LogStatusCounts {
            sent,
            failed,
            skipped,
        })
    }
}
