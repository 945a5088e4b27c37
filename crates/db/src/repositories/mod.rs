//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod business_profile_repo;
pub mod category_repo;
pub mod notification_log_repo;
pub mod notification_preference_repo;
pub mod notification_template_repo;
pub mod tax_info_repo;
pub mod user_settings_repo;

pub use business_profile_repo::BusinessProfileRepo;
pub use category_repo::CategoryRepo;
pub use notification_log_repo::NotificationLogRepo;
pub use notification_preference_repo::NotificationPreferenceRepo;
pub use notification_template_repo::NotificationTemplateRepo;
pub use tax_info_repo::TaxInfoRepo;
pub use user_settings_repo::UserSettingsRepo;
