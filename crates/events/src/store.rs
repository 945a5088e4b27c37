//! Persistence seam for the dispatcher.
//!
//! [`PgNotificationStore`] forwards each call to the matching repository;
//! tests substitute an in-memory implementation.

use async_trait::async_trait;
use bazaar_db::models::notification::{CreateNotificationLog, NotificationTemplate, UserSettings};
use bazaar_db::repositories::{
    NotificationLogRepo, NotificationPreferenceRepo, NotificationTemplateRepo, UserSettingsRepo,
};
use bazaar_db::DbPool;

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn user_settings(&self, user_id: &str) -> Result<Option<UserSettings>, sqlx::Error>;

    /// Whether the user accepts this notification type. A missing
    /// preference counts as enabled.
    async fn type_enabled(
        &self,
        user_id: &str,
        notification_type: &str,
    ) -> Result<bool, sqlx::Error>;

    async fn template(&self, template_key: &str)
        -> Result<Option<NotificationTemplate>, sqlx::Error>;

    async fn append_log(&self, log: &CreateNotificationLog) -> Result<(), sqlx::Error>;
}

pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn user_settings(&self, user_id: &str) -> Result<Option<UserSettings>, sqlx::Error> {
        UserSettingsRepo::get(&self.pool, user_id).await
    }

    async fn type_enabled(
        &self,
        user_id: &str,
        notification_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let pref = NotificationPreferenceRepo::get(&self.pool, user_id, notification_type).await?;
        Ok(pref.map(|p| p.is_enabled).unwrap_or(true))
    }

    async fn template(
        &self,
        template_key: &str,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        NotificationTemplateRepo::find_by_key(&self.pool, template_key).await
    }

    async fn append_log(&self, log: &CreateNotificationLog) -> Result<(), sqlx::Error> {
        NotificationLogRepo::create(&self.pool, log).await?;
        Ok(())
    }
}
