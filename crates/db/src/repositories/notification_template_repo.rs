//! Repository for the `notification_templates` table.
//!
//! Templates are administrative data maintained outside the application,
//! so only reads are exposed.

use sqlx::PgPool;

use crate::models::notification::NotificationTemplate;

/// Column list for `notification_templates` queries.
const COLUMNS: &str = "id, template_key, name, email_subject, email_body_html, \
    email_body_text, sms_body, variables, created_at, updated_at";

pub struct NotificationTemplateRepo;

impl NotificationTemplateRepo {
    /// Find a template by its unique key.
    pub async fn find_by_key(
        pool: &PgPool,
        template_key: &str,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_templates WHERE template_key = $1");
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(template_key)
            .fetch_optional(pool)
            .await
    }

    /// List every template ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<NotificationTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_templates ORDER BY template_key");
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .fetch_all(pool)
            .await
    }
}
