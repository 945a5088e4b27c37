//! SMS delivery through a Twilio-compatible REST API.
//!
//! One `POST /2010-04-01/Accounts/{sid}/Messages.json` per message,
//! authenticated with HTTP basic auth. Failed calls are reported, not
//! retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DeliveryError, SmsSender};

/// Default API root when `SMS_API_BASE` is not set.
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the message.
    #[error("SMS provider returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Configuration for the SMS provider.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 form.
    pub from_number: String,
    pub api_base: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless `SMS_ACCOUNT_SID`, `SMS_AUTH_TOKEN` and
    /// `SMS_FROM_NUMBER` are all set.
    ///
    /// | Variable          | Required | Default                  |
    /// |-------------------|----------|--------------------------|
    /// | `SMS_ACCOUNT_SID` | yes      |                          |
    /// | `SMS_AUTH_TOKEN`  | yes      |                          |
    /// | `SMS_FROM_NUMBER` | yes      |                          |
    /// | `SMS_API_BASE`    | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        Some(Self {
            account_sid: std::env::var("SMS_ACCOUNT_SID").ok()?,
            auth_token: std::env::var("SMS_AUTH_TOKEN").ok()?,
            from_number: std::env::var("SMS_FROM_NUMBER").ok()?,
            api_base: std::env::var("SMS_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Sends text messages through the provider's REST API.
pub struct SmsDelivery {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsDelivery {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    async fn post_message(&self, to: &str, body: &str) -> Result<String, SmsError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", to), ("From", self.config.from_number.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let resource: MessageResource = response.json().await?;
        Ok(resource.sid)
    }
}

#[async_trait]
impl SmsSender for SmsDelivery {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DeliveryError> {
        let sid = self.post_message(to, body).await?;
        tracing::info!(to, sid = %sid, "Notification SMS sent");
        Ok(sid)
    }
}
