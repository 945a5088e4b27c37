//! Polling client for the Bazaar API.
//!
//! - [`ApiClient`]: typed calls against the `/api/v1` routes.
//! - [`PeriodicTask`]: fixed-interval job runner that never overlaps itself.
//! - [`DataHook`]: keeps the latest fetched value for a key, refreshing on
//!   an interval.

pub mod api_client;
pub mod hook;
pub mod periodic;

pub use api_client::{ApiClient, ClientError};
pub use hook::{DataHook, Fetcher, DEFAULT_POLL_INTERVAL};
pub use periodic::PeriodicTask;
