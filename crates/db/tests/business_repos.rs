//! Integration tests for the business repositories against a real database.

use bazaar_db::models::business::UpsertTaxInfo;
use bazaar_db::repositories::{CategoryRepo, TaxInfoRepo};
use sqlx::PgPool;

fn tax_info(tax_id: &str) -> UpsertTaxInfo {
    UpsertTaxInfo {
        tax_id: Some(tax_id.to_string()),
        legal_name: Some("Acme Cleaning LLC".to_string()),
        tax_classification: Some("llc".to_string()),
        address: None,
    }
}

#[sqlx::test]
async fn tax_info_upsert_is_idempotent(pool: PgPool) {
    let payload = tax_info("12-3456789");

    let first = TaxInfoRepo::upsert(&pool, "B1", &payload).await.unwrap();
    let second = TaxInfoRepo::upsert(&pool, "B1", &payload).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(TaxInfoRepo::count_for_business(&pool, "B1").await.unwrap(), 1);
}

#[sqlx::test]
async fn tax_info_upsert_replaces_values(pool: PgPool) {
    TaxInfoRepo::upsert(&pool, "B1", &tax_info("old")).await.unwrap();
    let updated = TaxInfoRepo::upsert(&pool, "B1", &tax_info("new")).await.unwrap();

    assert_eq!(updated.tax_id.as_deref(), Some("new"));
    let stored = TaxInfoRepo::get(&pool, "B1").await.unwrap().unwrap();
    assert_eq!(stored.tax_id.as_deref(), Some("new"));
}

#[sqlx::test]
async fn missing_tax_info_is_none(pool: PgPool) {
    assert!(TaxInfoRepo::get(&pool, "nobody").await.unwrap().is_none());
}

#[sqlx::test]
async fn delete_all_only_touches_one_business(pool: PgPool) {
    CategoryRepo::add(&pool, "B1", "plumbing").await.unwrap();
    CategoryRepo::add(&pool, "B1", "electrical").await.unwrap();
    CategoryRepo::add(&pool, "B2", "plumbing").await.unwrap();

    let deleted = CategoryRepo::delete_all_for_business(&pool, "B1").await.unwrap();

    assert_eq!(deleted, 2);
    assert!(CategoryRepo::list_for_business(&pool, "B1").await.unwrap().is_empty());
    assert_eq!(CategoryRepo::list_for_business(&pool, "B2").await.unwrap().len(), 1);
}

#[sqlx::test]
async fn adding_same_category_twice_keeps_one_row(pool: PgPool) {
    let a = CategoryRepo::add(&pool, "B1", "plumbing").await.unwrap();
    let b = CategoryRepo::add(&pool, "B1", "plumbing").await.unwrap();

    assert_eq!(a.id, b.id);
    assert_eq!(CategoryRepo::list_for_business(&pool, "B1").await.unwrap().len(), 1);
}
