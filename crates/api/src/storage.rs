//! Object storage pass-through for uploaded business files.
//!
//! [`BucketStorage`] talks to a hosted bucket REST API:
//! `POST {STORAGE_URL}/storage/v1/object/{bucket}/{path}` with a bearer
//! service key. Handlers only see the [`ObjectStorage`] trait.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Url;
use serde::Serialize;

/// HTTP request timeout for a single upload.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bucket when `STORAGE_BUCKET` is not set.
const DEFAULT_BUCKET: &str = "business-files";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage API returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// `STORAGE_URL` cannot be used as a base for object URLs.
    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),

    /// The business id cannot be used as an object key prefix.
    #[error("Invalid business id '{0}'")]
    InvalidBusinessId(String),
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;
}

/// Configuration for the hosted bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless both `STORAGE_URL` and `STORAGE_SERVICE_KEY`
    /// are set.
    ///
    /// | Variable              | Required | Default          |
    /// |-----------------------|----------|------------------|
    /// | `STORAGE_URL`         | yes      |                  |
    /// | `STORAGE_SERVICE_KEY` | yes      |                  |
    /// | `STORAGE_BUCKET`      | no       | `business-files` |
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: std::env::var("STORAGE_URL").ok()?,
            service_key: std::env::var("STORAGE_SERVICE_KEY").ok()?,
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        })
    }

    fn object_url(&self, path: &str) -> Result<Url, StorageError> {
        self.bucket_url(&[], path)
    }

    fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        self.bucket_url(&["public"], path)
    }

    /// `{base}/storage/v1/object/{scope..}/{bucket}/{path}` with every path
    /// segment percent-encoded.
    fn bucket_url(&self, scope: &[&str], path: &str) -> Result<Url, StorageError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StorageError::InvalidUrl(self.base_url.clone()))?;
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"])
                .extend(scope)
                .push(&self.bucket)
                .extend(path.split('/'));
        }
        Ok(url)
    }
}

/// REST client for the hosted bucket.
pub struct BucketStorage {
    config: StorageConfig,
    client: reqwest::Client,
}

impl BucketStorage {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ObjectStorage for BucketStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.config.object_url(path)?)
            .bearer_auth(&self.config.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(path, size, "Object uploaded");
        Ok(StoredObject {
            path: path.to_string(),
            public_url: self.config.public_url(path)?.to_string(),
        })
    }
}

/// Decode a base64 upload payload, accepting an optional
/// `data:<mime>;base64,` prefix.
pub fn decode_file_data(file_data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = match file_data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => file_data,
    };
    STANDARD.decode(payload.trim())
}

/// Object path for an upload: `{business_id}/{uuid}-{file_name}`.
///
/// Path separators in the file name are replaced, and a business id that
/// is empty, contains a separator, or is a `.`/`..` segment is rejected, so
/// one business cannot write outside its own prefix.
pub fn object_path(business_id: &str, file_name: &str) -> Result<String, StorageError> {
    let id = business_id.trim();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(StorageError::InvalidBusinessId(business_id.to_string()));
    }

    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    Ok(format!("{id}/{}-{safe_name}", uuid::Uuid::new_v4()))
}
