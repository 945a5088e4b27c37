//! Polls a user's notification delivery counts and logs every change.
//!
//! ```text
//! bazaar-poll <user_id>
//! ```
//!
//! | Env Var              | Default                 |
//! |----------------------|-------------------------|
//! | `BAZAAR_API_URL`     | `http://localhost:3000` |
//! | `POLL_INTERVAL_SECS` | `30`                    |

use std::sync::Arc;
use std::time::Duration;

use bazaar_client::{ApiClient, DataHook, DEFAULT_POLL_INTERVAL};
use bazaar_core::channels::LogStatusCounts;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_client=info,bazaar_poll=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(user_id) = std::env::args().nth(1) else {
        eprintln!("usage: bazaar-poll <user_id>");
        std::process::exit(2);
    };

    let period = match std::env::var("POLL_INTERVAL_SECS") {
        Ok(raw) => match parse_interval(&raw) {
            Some(period) => period,
            None => {
                eprintln!("POLL_INTERVAL_SECS must be a positive number of seconds, got '{raw}'");
                std::process::exit(2);
            }
        },
        Err(_) => DEFAULT_POLL_INTERVAL,
    };

    let client = ApiClient::from_env().expect("Failed to build HTTP client");
    tracing::info!(
        user_id = %user_id,
        interval_secs = period.as_secs(),
        "Polling notification counts"
    );

    let mut hook: DataHook<String, LogStatusCounts> =
        DataHook::start(Arc::new(client), user_id, period);
    let mut updates = hook.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, stopping");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let counts = updates.borrow_and_update().clone();
                tracing::info!(
                    sent = counts.sent,
                    failed = counts.failed,
                    skipped = counts.skipped,
                    "Notification counts"
                );
            }
        }
    }

    hook.stop().await;
}

/// Whole seconds, at least one.
fn parse_interval(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
    }
}
