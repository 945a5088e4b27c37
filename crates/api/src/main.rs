use std::net::SocketAddr;
use std::sync::Arc;

use bazaar_api::config::ServerConfig;
use bazaar_api::router::build_app_router;
use bazaar_api::state::AppState;
use bazaar_api::storage::{BucketStorage, ObjectStorage, StorageConfig};
use bazaar_core::notification_rules::NotificationRules;
use bazaar_events::{
    EmailConfig, EmailDelivery, NotificationDispatcher, PgNotificationStore, SmsConfig,
    SmsDelivery,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_api=debug,bazaar_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bazaar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    bazaar_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bazaar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Notifications ---
    let rules = NotificationRules::from_env().expect("Failed to load notification rules");
    tracing::info!(types = rules.len(), "Notification rules loaded");

    let mut dispatcher =
        NotificationDispatcher::new(Arc::new(PgNotificationStore::new(pool.clone())), Arc::new(rules));

    match EmailConfig::from_env().map(EmailDelivery::new) {
        Some(Ok(email)) => {
            tracing::info!("Email delivery configured");
            dispatcher = dispatcher.with_email(Arc::new(email));
        }
        Some(Err(e)) => tracing::error!(error = %e, "Email delivery disabled: bad SMTP settings"),
        None => tracing::warn!("SMTP_HOST not set, email delivery disabled"),
    }

    match SmsConfig::from_env().map(SmsDelivery::new) {
        Some(Ok(sms)) => {
            tracing::info!("SMS delivery configured");
            dispatcher = dispatcher.with_sms(Arc::new(sms));
        }
        Some(Err(e)) => tracing::error!(error = %e, "SMS delivery disabled: client setup failed"),
        None => tracing::warn!("SMS provider not configured, SMS delivery disabled"),
    }

    // --- Object storage ---
    let storage: Option<Arc<dyn ObjectStorage>> =
        match StorageConfig::from_env().map(BucketStorage::new) {
            Some(Ok(storage)) => {
                tracing::info!("Object storage configured");
                Some(Arc::new(storage))
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "Uploads disabled: storage client setup failed");
                None
            }
            None => {
                tracing::warn!("STORAGE_URL not set, uploads disabled");
                None
            }
        };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(dispatcher),
        storage,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
