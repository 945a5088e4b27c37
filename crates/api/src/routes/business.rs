//! Route definitions for the `/businesses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::business;
use crate::state::AppState;

/// Routes mounted at `/businesses`.
///
/// ```text
/// GET    /{business_id}/profile     -> get_profile
/// PUT    /{business_id}/profile     -> upsert_profile
/// GET    /{business_id}/tax-info    -> get_tax_info
/// PUT    /{business_id}/tax-info    -> upsert_tax_info
/// GET    /{business_id}/categories  -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{business_id}/profile",
            get(business::get_profile).put(business::upsert_profile),
        )
        .route(
            "/{business_id}/tax-info",
            get(business::get_tax_info).put(business::upsert_tax_info),
        )
        .route("/{business_id}/categories", get(business::list_categories))
}
