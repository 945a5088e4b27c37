//! Notification dispatch.
//!
//! [`NotificationDispatcher::dispatch`] sends one notification to one user on
//! each requested channel, or when none are named, on every channel of the
//! type's catalog entry that the user has enabled. Per channel, in order:
//!
//! 1. skip if the user disabled the channel or the notification type;
//! 2. skip if quiet hours are active and the type is not transactional;
//! 3. resolve the template and check it has a body for the channel;
//! 4. render the template with the caller's variables;
//! 5. call the channel's provider;
//! 6. append one `notification_logs` row, whatever the outcome.
//!
//! Channels run concurrently and independently: a failure on one never
//! prevents or alters the attempt on another. Nothing is retried.

use std::sync::Arc;

use bazaar_core::channels::{
    Channel, SKIP_CHANNEL_DISABLED, SKIP_QUIET_HOURS, SKIP_TYPE_DISABLED, STATUS_FAILED,
    STATUS_SENT, STATUS_SKIPPED,
};
use bazaar_core::notification_rules::{NotificationRule, NotificationRules};
use bazaar_core::template::{render, TemplateError, Variables};
use bazaar_core::types::Timestamp;
use bazaar_db::models::notification::{CreateNotificationLog, NotificationTemplate, UserSettings};
use chrono::Utc;
use futures::future::{join_all, ready, Either};
use serde::Serialize;

use crate::delivery::{DeliveryError, EmailMessage, EmailSender, SmsSender};
use crate::store::NotificationStore;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// A validated request to notify one user.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub user_id: String,
    /// Catalog entry deciding default channels and quiet-hours exemption.
    pub notification_type: String,
    /// Overrides the template named by the catalog entry.
    pub template_key: Option<String>,
    pub variables: Variables,
    /// Channels to attempt; `None` uses the catalog entry's channels that
    /// the user has enabled.
    pub channels: Option<Vec<Channel>>,
    /// Email address used when the user has no override configured.
    pub email: Option<String>,
    /// Phone number used when the user has no override configured.
    pub phone: Option<String>,
}

impl DispatchRequest {
    fn fallback_recipient(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email => self.email.as_deref(),
            Channel::Sms => self.phone.as_deref(),
        }
        .filter(|s| !s.trim().is_empty())
    }
}

/// Outcome of one channel attempt, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    pub success: bool,
    pub channel: Channel,
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template '{key}' has no {channel} body")]
    TemplateIncompleteForChannel { key: String, channel: Channel },

    #[error(transparent)]
    MissingVariable(#[from] TemplateError),

    #[error("No {0} recipient configured for user")]
    NoRecipient(Channel),

    #[error("{0} provider is not configured")]
    ProviderNotConfigured(Channel),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Store error: {0}")]
    Store(String),
}

impl DispatchError {
    /// Stable machine-readable code returned alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::TemplateNotFound(_) => "template_not_found",
            DispatchError::TemplateIncompleteForChannel { .. } => {
                "template_incomplete_for_channel"
            }
            DispatchError::MissingVariable(_) => "missing_variable",
            DispatchError::NoRecipient(_) => "no_recipient",
            DispatchError::ProviderNotConfigured(_) => "service_not_configured",
            DispatchError::Delivery(_) => "provider_error",
            DispatchError::Store(_) => "store_error",
        }
    }
}

enum Outcome {
    Sent {
        recipient: String,
        external_id: String,
    },
    Skipped(&'static str),
    Failed {
        recipient: Option<String>,
        error: DispatchError,
    },
}

/// Lookups shared by every channel of one dispatch.
struct Context {
    settings: Option<UserSettings>,
    type_enabled: bool,
    template: Option<NotificationTemplate>,
}

/// Without a settings row the column defaults apply: email on, SMS off.
fn channel_enabled(settings: Option<&UserSettings>, channel: Channel) -> bool {
    settings.map_or(channel == Channel::Email, |s| s.channel_enabled(channel))
}

// ---------------------------------------------------------------------------
// NotificationDispatcher
// ---------------------------------------------------------------------------

pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
    rules: Arc<NotificationRules>,
    email: Option<Arc<dyn EmailSender>>,
    sms: Option<Arc<dyn SmsSender>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no providers attached. Channels without a
    /// provider fail with [`DispatchError::ProviderNotConfigured`].
    pub fn new(store: Arc<dyn NotificationStore>, rules: Arc<NotificationRules>) -> Self {
        Self {
            store,
            rules,
            email: None,
            sms: None,
        }
    }

    pub fn with_email(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email = Some(sender);
        self
    }

    pub fn with_sms(mut self, sender: Arc<dyn SmsSender>) -> Self {
        self.sms = Some(sender);
        self
    }

    pub fn rules(&self) -> &NotificationRules {
        &self.rules
    }

    /// Dispatch using the current time for quiet-hours evaluation.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Vec<ChannelResult> {
        self.dispatch_at(request, Utc::now()).await
    }

    /// Dispatch as if the current time were `now`.
    pub async fn dispatch_at(&self, request: &DispatchRequest, now: Timestamp) -> Vec<ChannelResult> {
        let rule = self.rules.resolve(&request.notification_type);
        let template_key = request
            .template_key
            .clone()
            .unwrap_or_else(|| rule.template_key.clone());

        let context = self.load_context(request, &template_key).await;

        // Explicitly requested channels are always attempted (and logged as
        // skipped when disabled); the default set only covers enabled ones.
        let candidates: Vec<Channel> = match (&request.channels, &context) {
            (Some(requested), _) => requested.clone(),
            (None, Ok(ctx)) => rule
                .channels
                .iter()
                .copied()
                .filter(|&c| channel_enabled(ctx.settings.as_ref(), c))
                .collect(),
            (None, Err(_)) => rule.channels.clone(),
        };

        let mut channels: Vec<Channel> = Vec::new();
        for channel in candidates {
            if !channels.contains(&channel) {
                channels.push(channel);
            }
        }

        let attempts = channels.iter().map(|&channel| {
            let outcome = match &context {
                Ok(ctx) => Either::Left(self.attempt(channel, ctx, request, &rule, &template_key, now)),
                Err(e) => Either::Right(ready(Outcome::Failed {
                    recipient: None,
                    error: DispatchError::Store(e.clone()),
                })),
            };
            self.finish(channel, request, &template_key, outcome)
        });

        let results = join_all(attempts).await;

        tracing::info!(
            user_id = %request.user_id,
            notification_type = %request.notification_type,
            template_key = %template_key,
            attempted = results.len(),
            sent = results.iter().filter(|r| r.success).count(),
            "Notification dispatched"
        );

        results
    }

    async fn load_context(
        &self,
        request: &DispatchRequest,
        template_key: &str,
    ) -> Result<Context, String> {
        let settings = self
            .store
            .user_settings(&request.user_id)
            .await
            .map_err(|e| e.to_string())?;
        let type_enabled = self
            .store
            .type_enabled(&request.user_id, &request.notification_type)
            .await
            .map_err(|e| e.to_string())?;
        let template = self
            .store
            .template(template_key)
            .await
            .map_err(|e| e.to_string())?;

        Ok(Context {
            settings,
            type_enabled,
            template,
        })
    }

    /// Decide and perform one channel attempt.
    async fn attempt(
        &self,
        channel: Channel,
        ctx: &Context,
        request: &DispatchRequest,
        rule: &NotificationRule,
        template_key: &str,
        now: Timestamp,
    ) -> Outcome {
        let settings = ctx.settings.as_ref();

        if !channel_enabled(settings, channel) {
            return Outcome::Skipped(SKIP_CHANNEL_DISABLED);
        }
        if !ctx.type_enabled {
            return Outcome::Skipped(SKIP_TYPE_DISABLED);
        }
        if !rule.transactional
            && settings
                .and_then(UserSettings::quiet_hours)
                .is_some_and(|q| q.contains(now))
        {
            return Outcome::Skipped(SKIP_QUIET_HOURS);
        }

        let recipient = settings
            .and_then(|s| s.recipient_override(channel))
            .or_else(|| request.fallback_recipient(channel))
            .map(str::to_string);

        match self
            .deliver(channel, ctx.template.as_ref(), template_key, request, recipient.as_deref())
            .await
        {
            Ok((recipient, external_id)) => Outcome::Sent {
                recipient,
                external_id,
            },
            Err(error) => Outcome::Failed { recipient, error },
        }
    }

    /// Render the template for `channel` and hand it to the provider.
    async fn deliver(
        &self,
        channel: Channel,
        template: Option<&NotificationTemplate>,
        template_key: &str,
        request: &DispatchRequest,
        recipient: Option<&str>,
    ) -> Result<(String, String), DispatchError> {
        let template =
            template.ok_or_else(|| DispatchError::TemplateNotFound(template_key.to_string()))?;
        if !template.supports(channel) {
            return Err(DispatchError::TemplateIncompleteForChannel {
                key: template_key.to_string(),
                channel,
            });
        }

        let vars = &request.variables;
        let render_opt =
            |body: &Option<String>| body.as_deref().map(|b| render(b, vars)).transpose();

        match channel {
            Channel::Email => {
                let subject_template = template.email_subject.as_deref().unwrap_or(&template.name);
                let subject = render(subject_template, vars)?;
                let html = render_opt(&template.email_body_html)?;
                let text = render_opt(&template.email_body_text)?;
                let to = recipient.ok_or(DispatchError::NoRecipient(channel))?;
                let sender = self
                    .email
                    .as_ref()
                    .ok_or(DispatchError::ProviderNotConfigured(channel))?;

                let message = EmailMessage {
                    to: to.to_string(),
                    subject,
                    html,
                    text,
                };
                let id = sender.send_email(&message).await?;
                Ok((message.to, id))
            }
            Channel::Sms => {
                let body = render_opt(&template.sms_body)?.unwrap_or_default();
                let to = recipient.ok_or(DispatchError::NoRecipient(channel))?;
                let sender = self
                    .sms
                    .as_ref()
                    .ok_or(DispatchError::ProviderNotConfigured(channel))?;

                let id = sender.send_sms(to, &body).await?;
                Ok((to.to_string(), id))
            }
        }
    }

    /// Turn an outcome into the caller's result and append its log row.
    async fn finish(
        &self,
        channel: Channel,
        request: &DispatchRequest,
        template_key: &str,
        outcome: impl std::future::Future<Output = Outcome>,
    ) -> ChannelResult {
        let result = match outcome.await {
            Outcome::Sent {
                recipient,
                external_id,
            } => ChannelResult {
                success: true,
                channel,
                recipient: Some(recipient),
                external_id: Some(external_id),
                error: None,
                error_code: None,
                skipped: false,
                skip_reason: None,
            },
            Outcome::Skipped(reason) => {
                tracing::debug!(user_id = %request.user_id, %channel, reason, "Channel skipped");
                ChannelResult {
                    success: false,
                    channel,
                    recipient: None,
                    external_id: None,
                    error: None,
                    error_code: None,
                    skipped: true,
                    skip_reason: Some(reason),
                }
            }
            Outcome::Failed { recipient, error } => {
                tracing::warn!(
                    user_id = %request.user_id,
                    %channel,
                    error = %error,
                    "Notification delivery failed"
                );
                ChannelResult {
                    success: false,
                    channel,
                    recipient,
                    external_id: None,
                    error: Some(error.to_string()),
                    error_code: Some(error.code()),
                    skipped: false,
                    skip_reason: None,
                }
            }
        };

        let status = if result.success {
            STATUS_SENT
        } else if result.skipped {
            STATUS_SKIPPED
        } else {
            STATUS_FAILED
        };

        let log = CreateNotificationLog {
            user_id: request.user_id.clone(),
            notification_type: request.notification_type.clone(),
            template_key: Some(template_key.to_string()),
            channel,
            recipient: result.recipient.clone(),
            status,
            skip_reason: result.skip_reason,
            external_id: result.external_id.clone(),
            error_message: result.error.clone(),
        };

        if let Err(e) = self.store.append_log(&log).await {
            tracing::error!(
                user_id = %request.user_id,
                %channel,
                error = %e,
                "Failed to write notification log"
            );
        }

        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveTime, TimeZone};
    use serde_json::json;

    use super::*;
    use crate::delivery::sms::SmsError;

    // -- fakes ---------------------------------------------------------------

    #[derive(Default)]
    struct FakeStore {
        settings: Option<UserSettings>,
        disabled_types: Vec<String>,
        templates: HashMap<String, NotificationTemplate>,
        logs: Mutex<Vec<CreateNotificationLog>>,
        fail_reads: bool,
    }

    #[async_trait]
    impl NotificationStore for FakeStore {
        async fn user_settings(&self, _: &str) -> Result<Option<UserSettings>, sqlx::Error> {
            if self.fail_reads {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self.settings.clone())
        }

        async fn type_enabled(&self, _: &str, t: &str) -> Result<bool, sqlx::Error> {
            Ok(!self.disabled_types.iter().any(|d| d == t))
        }

        async fn template(&self, key: &str) -> Result<Option<NotificationTemplate>, sqlx::Error> {
            Ok(self.templates.get(key).cloned())
        }

        async fn append_log(&self, log: &CreateNotificationLog) -> Result<(), sqlx::Error> {
            self.logs.lock().unwrap().push(log.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeEmail {
        calls: AtomicUsize,
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl EmailSender for FakeEmail {
        async fn send_email(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(message.clone());
            Ok("<msg-1@bazaar.test>".to_string())
        }
    }

    #[derive(Default)]
    struct FakeSms {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SmsSender for FakeSms {
        async fn send_sms(&self, _: &str, _: &str) -> Result<String, DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SmsError::Rejected {
                    status: 400,
                    message: "invalid number".to_string(),
                }
                .into());
            }
            Ok("SM123".to_string())
        }
    }

    // -- fixtures ------------------------------------------------------------

    fn template(key: &str, sms_body: Option<&str>) -> NotificationTemplate {
        NotificationTemplate {
            id: 1,
            template_key: key.to_string(),
            name: "Reminder".to_string(),
            email_subject: Some("Reminder for {{service}}".to_string()),
            email_body_html: Some("<p>See you at {{time}}</p>".to_string()),
            email_body_text: None,
            sms_body: sms_body.map(str::to_string),
            variables: json!(["service", "time"]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn settings(email: bool, sms: bool) -> UserSettings {
        UserSettings {
            id: 1,
            user_id: "u1".to_string(),
            email_notifications: email,
            sms_notifications: sms,
            notification_email: None,
            notification_phone: Some("+15550100".to_string()),
            quiet_hours_enabled: false,
            quiet_hours_start: None,
            quiet_hours_end: None,
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn with_quiet_hours(mut s: UserSettings) -> UserSettings {
        s.quiet_hours_enabled = true;
        s.quiet_hours_start = NaiveTime::from_hms_opt(22, 0, 0);
        s.quiet_hours_end = NaiveTime::from_hms_opt(7, 0, 0);
        s
    }

    fn store(settings: UserSettings, templates: Vec<NotificationTemplate>) -> FakeStore {
        FakeStore {
            settings: Some(settings),
            templates: templates
                .into_iter()
                .map(|t| (t.template_key.clone(), t))
                .collect(),
            ..Default::default()
        }
    }

    fn request(notification_type: &str, channels: Option<Vec<Channel>>) -> DispatchRequest {
        DispatchRequest {
            user_id: "u1".to_string(),
            notification_type: notification_type.to_string(),
            template_key: None,
            variables: json!({"service": "Deep clean", "time": "9am"})
                .as_object()
                .cloned()
                .unwrap(),
            channels,
            email: Some("ada@example.com".to_string()),
            phone: None,
        }
    }

    struct Harness {
        store: Arc<FakeStore>,
        email: Arc<FakeEmail>,
        sms: Arc<FakeSms>,
        dispatcher: NotificationDispatcher,
    }

    fn harness(store: FakeStore, sms: FakeSms) -> Harness {
        let store = Arc::new(store);
        let email = Arc::new(FakeEmail::default());
        let sms = Arc::new(sms);
        let dispatcher = NotificationDispatcher::new(
            store.clone(),
            Arc::new(NotificationRules::default()),
        )
        .with_email(email.clone())
        .with_sms(sms.clone());
        Harness {
            store,
            email,
            sms,
            dispatcher,
        }
    }

    fn noon() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn midnight() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap()
    }

    // -- tests ---------------------------------------------------------------

    #[tokio::test]
    async fn disabled_channel_is_skipped_without_provider_call() {
        let h = harness(
            store(settings(true, false), vec![template("booking_reminder", Some("Hi"))]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", Some(vec![Channel::Sms])), noon())
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].skipped);
        assert_eq!(results[0].skip_reason, Some(SKIP_CHANNEL_DISABLED));
        assert_eq!(h.sms.calls.load(Ordering::SeqCst), 0);

        let logs = h.store.logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, STATUS_SKIPPED);
        assert_eq!(logs[0].skip_reason, Some(SKIP_CHANNEL_DISABLED));
    }

    #[tokio::test]
    async fn quiet_hours_skip_non_transactional_sends() {
        let h = harness(
            store(
                with_quiet_hours(settings(true, true)),
                vec![template("booking_reminder", Some("Hi"))],
            ),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), midnight())
            .await;

        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.skipped && r.skip_reason == Some(SKIP_QUIET_HOURS)));
        assert_eq!(h.email.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.sms.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.store.logs.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transactional_sends_ignore_quiet_hours() {
        let h = harness(
            store(
                with_quiet_hours(settings(true, false)),
                vec![template("payment_receipt", None)],
            ),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("payment_receipt", None), midnight())
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].external_id.as_deref(), Some("<msg-1@bazaar.test>"));
        assert_eq!(h.email.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn outside_quiet_hours_sends_normally() {
        let h = harness(
            store(
                with_quiet_hours(settings(true, false)),
                vec![template("booking_reminder", None)],
            ),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", Some(vec![Channel::Email])), noon())
            .await;

        assert!(results[0].success);
        let sent = h.email.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "Reminder for Deep clean");
        assert_eq!(sent[0].html.as_deref(), Some("<p>See you at 9am</p>"));
        assert_eq!(sent[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn template_without_sms_body_fails_without_provider_call() {
        let h = harness(
            store(settings(true, true), vec![template("booking_reminder", None)]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", Some(vec![Channel::Sms])), noon())
            .await;

        assert!(!results[0].success);
        assert!(!results[0].skipped);
        assert_eq!(results[0].error_code, Some("template_incomplete_for_channel"));
        assert_eq!(
            results[0].error.as_deref(),
            Some("Template 'booking_reminder' has no sms body")
        );
        assert_eq!(h.sms.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.store.logs.lock().unwrap()[0].status, STATUS_FAILED);
    }

    #[tokio::test]
    async fn unknown_template_fails_every_channel() {
        let h = harness(store(settings(true, true), vec![]), FakeSms::default());

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.error_code == Some("template_not_found")));
        assert_eq!(h.store.logs.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_variable_fails_the_channel() {
        let h = harness(
            store(settings(true, false), vec![template("booking_reminder", None)]),
            FakeSms::default(),
        );
        let mut req = request("booking_reminder", Some(vec![Channel::Email]));
        req.variables.remove("time");

        let results = h.dispatcher.dispatch_at(&req, noon()).await;

        assert_eq!(results[0].error_code, Some("missing_variable"));
        assert_eq!(results[0].error.as_deref(), Some("Missing variable: time"));
        assert_eq!(h.email.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_channel_failing_does_not_block_the_other() {
        let h = harness(
            store(settings(true, true), vec![template("booking_reminder", Some("At {{time}}"))]),
            FakeSms {
                fail: true,
                ..Default::default()
            },
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        let email = results.iter().find(|r| r.channel == Channel::Email).unwrap();
        let sms = results.iter().find(|r| r.channel == Channel::Sms).unwrap();
        assert!(email.success);
        assert!(!sms.success);
        assert_eq!(sms.recipient.as_deref(), Some("+15550100"));
        assert_eq!(sms.error_code, Some("provider_error"));
        assert!(sms.error.as_deref().unwrap().contains("invalid number"));

        let logs = h.store.logs.lock().unwrap();
        assert_eq!(logs.len(), 2);
        let sms_log = logs.iter().find(|l| l.channel == Channel::Sms).unwrap();
        assert_eq!(sms_log.status, STATUS_FAILED);
        assert!(sms_log.error_message.is_some());
    }

    #[tokio::test]
    async fn override_recipient_wins_over_request_address() {
        let mut s = settings(true, false);
        s.notification_email = Some("billing@acme.test".to_string());
        let h = harness(
            store(s, vec![template("booking_reminder", None)]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", Some(vec![Channel::Email])), noon())
            .await;

        assert_eq!(results[0].recipient.as_deref(), Some("billing@acme.test"));
    }

    #[tokio::test]
    async fn disabled_type_is_skipped() {
        let mut s = store(settings(true, true), vec![template("new_message", Some("Hi"))]);
        s.disabled_types.push("new_message".to_string());
        let h = harness(s, FakeSms::default());

        let results = h.dispatcher.dispatch_at(&request("new_message", None), noon()).await;

        assert!(results
            .iter()
            .all(|r| r.skip_reason == Some(SKIP_TYPE_DISABLED)));
    }

    #[tokio::test]
    async fn missing_settings_default_to_email_only() {
        let h = harness(
            FakeStore {
                templates: [("booking_reminder".to_string(), template("booking_reminder", Some("Hi")))]
                    .into_iter()
                    .collect(),
                ..Default::default()
            },
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].channel, Channel::Email);
        assert!(results[0].success);
        assert_eq!(h.sms.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_channels_only_cover_enabled_ones() {
        let h = harness(
            store(settings(true, false), vec![template("booking_reminder", Some("Hi"))]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].channel, Channel::Email);
        assert!(results[0].success);
        assert_eq!(h.sms.calls.load(Ordering::SeqCst), 0);

        let logs = h.store.logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, STATUS_SENT);
    }

    #[tokio::test]
    async fn no_enabled_default_channel_attempts_nothing() {
        let h = harness(
            store(settings(false, false), vec![template("booking_reminder", Some("Hi"))]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        assert!(results.is_empty());
        assert!(h.store.logs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_provider_is_reported_per_channel() {
        let store = Arc::new(store(settings(true, true), vec![template("booking_reminder", Some("Hi"))]));
        let email = Arc::new(FakeEmail::default());
        let dispatcher =
            NotificationDispatcher::new(store.clone(), Arc::new(NotificationRules::default()))
                .with_email(email.clone());

        let results = dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        let sms = results.iter().find(|r| r.channel == Channel::Sms).unwrap();
        assert_eq!(sms.error_code, Some("service_not_configured"));
        assert_eq!(email.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_failure_fails_each_channel_and_still_logs() {
        let h = harness(
            FakeStore {
                fail_reads: true,
                ..Default::default()
            },
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(&request("booking_reminder", None), noon())
            .await;

        assert!(results.iter().all(|r| r.error_code == Some("store_error")));
        assert_eq!(h.store.logs.lock().unwrap().len(), 2);
        assert_eq!(h.email.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn duplicate_channels_are_attempted_once() {
        let h = harness(
            store(settings(true, false), vec![template("booking_reminder", None)]),
            FakeSms::default(),
        );

        let results = h
            .dispatcher
            .dispatch_at(
                &request("booking_reminder", Some(vec![Channel::Email, Channel::Email])),
                noon(),
            )
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(h.email.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn result_serializes_camel_case_without_empty_fields() {
        let result = ChannelResult {
            success: false,
            channel: Channel::Sms,
            recipient: None,
            external_id: None,
            error: None,
            error_code: None,
            skipped: true,
            skip_reason: Some(SKIP_QUIET_HOURS),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": false,
                "channel": "sms",
                "recipient": null,
                "skipped": true,
                "skipReason": "quiet_hours"
            })
        );
    }
}
