//! Handlers for `/categories`: linking service categories to a business.

use axum::extract::State;
use axum::Json;
use bazaar_core::validation::{present, require_fields};
use bazaar_db::models::business::BusinessCategory;
use bazaar_db::repositories::CategoryRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryBody {
    pub business_id: Option<String>,
    pub category_id: Option<String>,
}

/// Without `categoryId` every category of the business is removed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryBody {
    pub business_id: Option<String>,
    pub category_id: Option<String>,
}

/// POST /api/v1/categories
///
/// Linking an already-linked category returns the existing row.
pub async fn add_category(
    State(state): State<AppState>,
    Json(body): Json<AddCategoryBody>,
) -> AppResult<Json<DataResponse<BusinessCategory>>> {
    require_fields(&[
        ("businessId", present(&body.business_id)),
        ("categoryId", present(&body.category_id)),
    ])?;
    let business_id = body.business_id.unwrap_or_default();
    let category_id = body.category_id.unwrap_or_default();

    let category = CategoryRepo::add(&state.pool, &business_id, &category_id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories/delete
pub async fn delete_categories(
    State(state): State<AppState>,
    Json(body): Json<DeleteCategoryBody>,
) -> AppResult<Json<MessageResponse>> {
    require_fields(&[("businessId", present(&body.business_id))])?;
    let business_id = body.business_id.unwrap_or_default();

    let response = match body.category_id.filter(|c| !c.trim().is_empty()) {
        Some(category_id) => {
            let deleted = CategoryRepo::delete_one(&state.pool, &business_id, &category_id).await?;
            MessageResponse {
                message: "Category deleted successfully",
                deleted: Some(deleted),
            }
        }
        None => {
            let deleted = CategoryRepo::delete_all_for_business(&state.pool, &business_id).await?;
            tracing::info!(business_id = %business_id, deleted, "All business categories removed");
            MessageResponse {
                message: "All categories deleted successfully for business",
                deleted: Some(deleted),
            }
        }
    };

    Ok(Json(response))
}
