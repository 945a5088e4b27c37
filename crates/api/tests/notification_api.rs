//! Integration tests for the `/notifications` routes against a real database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn seed_template(pool: &PgPool, key: &str, sms_body: Option<&str>) {
    sqlx::query(
        "INSERT INTO notification_templates \
            (template_key, name, email_subject, email_body_html, sms_body, variables) \
         VALUES ($1, 'Reminder', 'Reminder: {{service}}', '<p>{{service}} at {{time}}</p>', $2, \
                 '[\"service\", \"time\"]'::jsonb)",
    )
    .bind(key)
    .bind(sms_body)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let json = body_json(get(build_test_app(pool), "/health").await).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["storage_configured"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn settings_are_null_until_saved(pool: PgPool) {
    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/notifications/settings/u1").await).await;
    assert_eq!(json, json!({"data": null}));

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/settings/u1",
        json!({"smsNotifications": true, "timezone": "Europe/Berlin"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(pool), "/api/v1/notifications/settings/u1").await).await;
    assert_eq!(json["data"]["sms_notifications"], true);
    assert_eq!(json["data"]["email_notifications"], true);
    assert_eq!(json["data"]["timezone"], "Europe/Berlin");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn settings_override_can_be_cleared_with_null(pool: PgPool) {
    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/settings/u1",
        json!({"notificationEmail": "billing@acme.test", "notificationPhone": "+15550100"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/settings/u1",
        json!({"notificationEmail": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(pool), "/api/v1/notifications/settings/u1").await).await;
    assert_eq!(json["data"]["notification_email"], serde_json::Value::Null);
    assert_eq!(json["data"]["notification_phone"], "+15550100");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preference_upsert_and_list(pool: PgPool) {
    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/preferences/u1/marketing_update",
        json!({"isEnabled": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(pool), "/api/v1/notifications/preferences/u1").await).await;
    let prefs = json["data"].as_array().unwrap();
    assert_eq!(prefs.len(), 1);
    assert_eq!(prefs[0]["notification_type"], "marketing_update");
    assert_eq!(prefs[0]["is_enabled"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preference_requires_is_enabled(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/v1/notifications/preferences/u1/marketing_update",
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_template_is_null(pool: PgPool) {
    let json = body_json(get(build_test_app(pool), "/api/v1/notifications/templates/nope").await).await;
    assert_eq!(json, json!({"data": null}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn send_logs_every_channel_attempt(pool: PgPool) {
    seed_template(&pool, "booking_reminder", None).await;

    // Email enabled, SMS off: the explicitly requested SMS is skipped and
    // email fails for lack of a configured provider.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/send",
        json!({
            "userId": "u1",
            "notificationType": "booking_reminder",
            "variables": {"service": "Deep clean", "time": "9am"},
            "channels": ["email", "sms"],
            "email": "ada@example.com"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["channel"], "email");
    assert_eq!(results[0]["errorCode"], "service_not_configured");
    assert_eq!(results[1]["channel"], "sms");
    assert_eq!(results[1]["skipReason"], "channel_disabled");

    let counts = body_json(
        get(build_test_app(pool.clone()), "/api/v1/notifications/logs/counts?user_id=u1").await,
    )
    .await;
    assert_eq!(counts["data"], json!({"sent": 0, "failed": 1, "skipped": 1}));

    let logs = body_json(get(build_test_app(pool), "/api/v1/notifications/logs?user_id=u1&limit=10").await).await;
    assert_eq!(logs["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn send_without_channels_skips_disabled_ones(pool: PgPool) {
    seed_template(&pool, "booking_reminder", None).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/notifications/send",
        json!({
            "userId": "u1",
            "notificationType": "booking_reminder",
            "variables": {"service": "Deep clean", "time": "9am"},
            "email": "ada@example.com"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let results = json["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["channel"], "email");

    let counts = body_json(
        get(build_test_app(pool), "/api/v1/notifications/logs/counts?user_id=u1").await,
    )
    .await;
    assert_eq!(counts["data"], json!({"sent": 0, "failed": 1, "skipped": 0}));
}
