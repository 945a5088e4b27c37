//! Repository for the `business_categories` table.

use sqlx::PgPool;

use crate::models::business::BusinessCategory;

/// Column list for `business_categories` queries.
const COLUMNS: &str = "id, business_id, category_id, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: &str,
    ) -> Result<Vec<BusinessCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM business_categories \
             WHERE business_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, BusinessCategory>(&query)
            .bind(business_id)
            .fetch_all(pool)
            .await
    }

    /// Link a category to a business. Linking an existing pair returns the
    /// existing row.
    pub async fn add(
        pool: &PgPool,
        business_id: &str,
        category_id: &str,
    ) -> Result<BusinessCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_categories (business_id, category_id) \
             VALUES ($1, $2) \
             ON CONFLICT (business_id, category_id) DO UPDATE SET \
                category_id = EXCLUDED.category_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessCategory>(&query)
            .bind(business_id)
            .bind(category_id)
            .fetch_one(pool)
            .await
    }

    /// Remove one category from a business. Returns the number of rows deleted.
    pub async fn delete_one(
        pool: &PgPool,
        business_id: &str,
        category_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM business_categories WHERE business_id = $1 AND category_id = $2",
        )
        .bind(business_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove every category linked to a business.
    pub async fn delete_all_for_business(
        pool: &PgPool,
        business_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM business_categories WHERE business_id = $1")
            .bind(business_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
