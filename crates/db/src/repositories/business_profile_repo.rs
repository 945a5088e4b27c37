//! Repository for the `business_profiles` table.

use sqlx::PgPool;

use crate::models::business::{BusinessProfile, UpsertBusinessProfile};

/// Column list for `business_profiles` queries.
const COLUMNS: &str = "id, business_id, business_name, description, phone, email, website, \
    address, created_at, updated_at";

pub struct BusinessProfileRepo;

impl BusinessProfileRepo {
    pub async fn get(
        pool: &PgPool,
        business_id: &str,
    ) -> Result<Option<BusinessProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_profiles WHERE business_id = $1");
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(business_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a profile keyed on `business_id`.
    ///
    /// `business_name` is required by the caller; the optional columns are
    /// only overwritten when supplied.
    pub async fn upsert(
        pool: &PgPool,
        business_id: &str,
        business_name: &str,
        input: &UpsertBusinessProfile,
    ) -> Result<BusinessProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_profiles \
                (business_id, business_name, description, phone, email, website, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (business_id) DO UPDATE SET \
                business_name = EXCLUDED.business_name, \
                description = COALESCE($3, business_profiles.description), \
                phone = COALESCE($4, business_profiles.phone), \
                email = COALESCE($5, business_profiles.email), \
                website = COALESCE($6, business_profiles.website), \
                address = COALESCE($7, business_profiles.address), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(business_id)
            .bind(business_name)
            .bind(&input.description)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.website)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }
}
