//! Delivery channels and the status / skip-reason vocabulary written to
//! `notification_logs`.
//!
//! The string forms must match the values stored in the
//! `notification_logs.channel`, `status` and `skip_reason` columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Email notification delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// SMS notification delivered via the SMS provider's REST API.
pub const CHANNEL_SMS: &str = "sms";

pub const STATUS_SENT: &str = "sent";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_SKIPPED: &str = "skipped";

/// The user turned the channel off globally.
pub const SKIP_CHANNEL_DISABLED: &str = "channel_disabled";

/// The user turned this notification type off.
pub const SKIP_TYPE_DISABLED: &str = "type_disabled";

/// The send fell inside the user's quiet-hours window.
pub const SKIP_QUIET_HOURS: &str = "quiet_hours";

/// Per-status totals for a user's delivery log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStatusCounts {
    pub sent: i64,
    pub failed: i64,
    pub skipped: i64,
}

/// A delivery medium for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    /// Every channel, in dispatch order.
    pub const ALL: [Channel; 2] = [Channel::Email, Channel::Sms];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => CHANNEL_EMAIL,
            Channel::Sms => CHANNEL_SMS,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CHANNEL_EMAIL => Ok(Channel::Email),
            CHANNEL_SMS => Ok(Channel::Sms),
            other => Err(CoreError::Validation(format!(
                "Unknown channel '{other}'. Must be one of: email, sms"
            ))),
        }
    }
}
