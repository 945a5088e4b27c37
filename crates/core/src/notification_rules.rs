//! Notification type catalog.
//!
//! Maps each notification type to the template it renders, the channels it
//! is sent on by default, and whether it is transactional. Transactional
//! types are exempt from quiet hours.
//!
//! The built-in catalog can be replaced at startup with a JSON file:
//!
//! ```json
//! {
//!   "booking_confirmation": {
//!     "template_key": "booking_confirmation",
//!     "channels": ["email", "sms"],
//!     "transactional": true
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::channels::Channel;
use crate::error::CoreError;

/// Environment variable naming an optional JSON catalog file.
pub const RULES_PATH_ENV: &str = "NOTIFICATION_RULES_PATH";

/// Channel and quiet-hours rules for one notification type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRule {
    /// Template rendered for this type.
    pub template_key: String,
    /// Channels used when the caller does not name any.
    #[serde(default = "all_channels")]
    pub channels: Vec<Channel>,
    /// Transactional sends ignore quiet hours.
    #[serde(default)]
    pub transactional: bool,
}

fn all_channels() -> Vec<Channel> {
    Channel::ALL.to_vec()
}

impl NotificationRule {
    fn new(template_key: &str, channels: &[Channel], transactional: bool) -> Self {
        Self {
            template_key: template_key.to_string(),
            channels: channels.to_vec(),
            transactional,
        }
    }

    /// Rule applied to types missing from the catalog: the type name doubles
    /// as the template key, every channel is tried, quiet hours apply.
    pub fn fallback(notification_type: &str) -> Self {
        Self::new(notification_type, &Channel::ALL, false)
    }
}

/// The full notification type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationRules {
    rules: HashMap<String, NotificationRule>,
}

impl Default for NotificationRules {
    fn default() -> Self {
        use Channel::{Email, Sms};

        let rules = [
            ("booking_confirmation", &[Email, Sms][..], true),
            ("booking_cancelled", &[Email, Sms][..], true),
            ("booking_reminder", &[Email, Sms][..], false),
            ("payment_receipt", &[Email][..], true),
            ("payout_sent", &[Email][..], true),
            ("password_reset", &[Email][..], true),
            ("new_message", &[Email, Sms][..], false),
            ("review_received", &[Email][..], false),
            ("marketing_update", &[Email][..], false),
        ]
        .into_iter()
        .map(|(key, channels, transactional)| {
            (
                key.to_string(),
                NotificationRule::new(key, channels, transactional),
            )
        })
        .collect();

        Self { rules }
    }
}

impl NotificationRules {
    /// Parse a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let rules: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid notification rules: {e}")))?;

        if let Some((key, _)) = rules.rules.iter().find(|(_, r)| r.channels.is_empty()) {
            return Err(CoreError::Validation(format!(
                "Notification type '{key}' must list at least one channel"
            )));
        }

        Ok(rules)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read notification rules from {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Load the catalog named by `NOTIFICATION_RULES_PATH`, or the built-in
    /// defaults when the variable is unset.
    pub fn from_env() -> Result<Self, CoreError> {
        match std::env::var(RULES_PATH_ENV) {
            Ok(path) => {
                let rules = Self::from_file(Path::new(&path))?;
                tracing::info!(path, count = rules.len(), "Loaded notification rules");
                Ok(rules)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Look up the rule for `notification_type`, falling back to
    /// [`NotificationRule::fallback`] for unknown types.
    pub fn resolve(&self, notification_type: &str) -> NotificationRule {
        self.rules
            .get(notification_type)
            .cloned()
            .unwrap_or_else(|| NotificationRule::fallback(notification_type))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_mark_receipts_transactional() {
        let rules = NotificationRules::default();
        let rule = rules.resolve("payment_receipt");
        assert!(rule.transactional);
        assert_eq!(rule.channels, vec![Channel::Email]);
    }

    #[test]
    fn unknown_type_falls_back_to_all_channels() {
        let rule = NotificationRules::default().resolve("something_new");
        assert_eq!(rule.template_key, "something_new");
        assert_eq!(rule.channels, Channel::ALL.to_vec());
        assert!(!rule.transactional);
    }

    #[test]
    fn json_catalog_defaults_channels() {
        let rules =
            NotificationRules::from_json(r#"{"welcome": {"template_key": "welcome_v2"}}"#).unwrap();
        let rule = rules.resolve("welcome");
        assert_eq!(rule.template_key, "welcome_v2");
        assert_eq!(rule.channels, Channel::ALL.to_vec());
        assert!(!rule.transactional);
    }

    #[test]
    fn json_catalog_rejects_empty_channel_list() {
        let result =
            NotificationRules::from_json(r#"{"x": {"template_key": "x", "channels": []}}"#);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn json_catalog_rejects_unknown_channel() {
        let result =
            NotificationRules::from_json(r#"{"x": {"template_key": "x", "channels": ["fax"]}}"#);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"otp": {{"template_key": "otp", "channels": ["sms"], "transactional": true}}}}"#
        )
        .unwrap();

        let rules = NotificationRules::from_file(file.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.resolve("otp").channels, vec![Channel::Sms]);
    }

    #[test]
    fn missing_file_is_internal_error() {
        let result = NotificationRules::from_file(Path::new("/nonexistent/rules.json"));
        assert_matches!(result, Err(CoreError::Internal(_)));
    }
}
