//! Repository for the `business_tax_info` table.

use sqlx::PgPool;

use crate::models::business::{TaxInfo, UpsertTaxInfo};

/// Column list for `business_tax_info` queries.
const COLUMNS: &str = "id, business_id, tax_id, legal_name, tax_classification, address, \
    created_at, updated_at";

pub struct TaxInfoRepo;

impl TaxInfoRepo {
    pub async fn get(pool: &PgPool, business_id: &str) -> Result<Option<TaxInfo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_tax_info WHERE business_id = $1");
        sqlx::query_as::<_, TaxInfo>(&query)
            .bind(business_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the tax information for a business.
    ///
    /// Keyed on `business_id`, so repeating the call with the same payload
    /// leaves exactly one row.
    pub async fn upsert(
        pool: &PgPool,
        business_id: &str,
        input: &UpsertTaxInfo,
    ) -> Result<TaxInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_tax_info \
                (business_id, tax_id, legal_name, tax_classification, address) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (business_id) DO UPDATE SET \
                tax_id = EXCLUDED.tax_id, \
                legal_name = EXCLUDED.legal_name, \
                tax_classification = EXCLUDED.tax_classification, \
                address = EXCLUDED.address, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxInfo>(&query)
            .bind(business_id)
            .bind(&input.tax_id)
            .bind(&input.legal_name)
            .bind(&input.tax_classification)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Number of tax rows stored for a business (0 or 1).
    pub async fn count_for_business(pool: &PgPool, business_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM business_tax_info WHERE business_id = $1")
            .bind(business_id)
            .fetch_one(pool)
            .await
    }
}
