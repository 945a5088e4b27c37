//! Handlers for the `/businesses/{business_id}` resources.

use axum::extract::{Path, State};
use axum::Json;
use bazaar_core::validation::{present, require_fields};
use bazaar_db::models::business::{
    BusinessCategory, BusinessProfile, TaxInfo, UpsertBusinessProfile, UpsertTaxInfo,
};
use bazaar_db::repositories::{BusinessProfileRepo, CategoryRepo, TaxInfoRepo};

use super::validate_body;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /api/v1/businesses/{business_id}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> AppResult<Json<DataResponse<Option<BusinessProfile>>>> {
    let profile = BusinessProfileRepo::get(&state.pool, &business_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/businesses/{business_id}/profile
///
/// `businessName` is required; other omitted fields keep their stored value.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(input): Json<UpsertBusinessProfile>,
) -> AppResult<Json<DataResponse<BusinessProfile>>> {
    require_fields(&[("businessName", present(&input.business_name))])?;
    validate_body(&input)?;

    let name = input.business_name.as_deref().unwrap_or_default().trim();
    let profile = BusinessProfileRepo::upsert(&state.pool, &business_id, name, &input).await?;

    tracing::info!(business_id = %business_id, "Business profile saved");
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Tax information
// ---------------------------------------------------------------------------

/// GET /api/v1/businesses/{business_id}/tax-info
pub async fn get_tax_info(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> AppResult<Json<DataResponse<Option<TaxInfo>>>> {
    let info = TaxInfoRepo::get(&state.pool, &business_id).await?;
    Ok(Json(DataResponse { data: info }))
}

/// PUT /api/v1/businesses/{business_id}/tax-info
///
/// Replaces the stored record; repeating the call leaves a single row.
pub async fn upsert_tax_info(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(input): Json<UpsertTaxInfo>,
) -> AppResult<Json<DataResponse<TaxInfo>>> {
    let info = TaxInfoRepo::upsert(&state.pool, &business_id, &input).await?;
    tracing::info!(business_id = %business_id, "Tax information saved");
    Ok(Json(DataResponse { data: info }))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/businesses/{business_id}/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<BusinessCategory>>>> {
    let categories = CategoryRepo::list_for_business(&state.pool, &business_id).await?;
    Ok(Json(DataResponse { data: categories }))
}
