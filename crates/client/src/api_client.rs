//! HTTP client for the Bazaar API.

use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::channels::LogStatusCounts;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::hook::Fetcher;

/// Default API root when `BAZAAR_API_URL` is not set.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// HTTP request timeout for a single call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed client for the `/api/v1` routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a client for `BAZAAR_API_URL` (default `http://localhost:3000`).
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("BAZAAR_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// GET `path` and unwrap its `{ "data": ... }` envelope.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: DataEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Per-status totals of a user's notification log.
    pub async fn log_counts(&self, user_id: &str) -> Result<LogStatusCounts, ClientError> {
        self.get_data("/notifications/logs/counts", &[("user_id", user_id)])
            .await
    }
}

/// Polls a user's notification counts; the hook key is the user id.
#[async_trait]
impl Fetcher<String, LogStatusCounts> for ApiClient {
    async fn fetch(&self, user_id: &String) -> Result<LogStatusCounts, ClientError> {
        self.log_counts(user_id).await
    }
}
