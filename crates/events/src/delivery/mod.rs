//! External delivery channels for notifications.
//!
//! Each provider sits behind a small trait so the dispatcher can be driven
//! by in-memory fakes in tests.

pub mod email;
pub mod sms;

use async_trait::async_trait;

use self::email::EmailError;
use self::sms::SmsError;

/// A provider call failed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Sms(#[from] SmsError),
}

/// Rendered email content handed to an [`EmailSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one email, returning the provider-assigned message id.
    async fn send_email(&self, message: &EmailMessage) -> Result<String, DeliveryError>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send one text message, returning the provider-assigned message id.
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, DeliveryError>;
}
