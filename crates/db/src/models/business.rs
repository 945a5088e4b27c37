//! Provider business models: profile, tax information, categories.

use bazaar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `business_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessProfile {
    pub id: DbId,
    pub business_id: String,
    pub business_name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a business profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBusinessProfile {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub address: Option<String>,
}

/// A row from the `business_tax_info` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaxInfo {
    pub id: DbId,
    pub business_id: String,
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub tax_classification: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting tax information. The upsert replaces every column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTaxInfo {
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub tax_classification: Option<String>,
    pub address: Option<String>,
}

/// A row from the `business_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessCategory {
    pub id: DbId,
    pub business_id: String,
    pub category_id: String,
    pub created_at: Timestamp,
}
