//! Bazaar notification dispatch.
//!
//! - [`NotificationDispatcher`]: resolves preferences, renders templates,
//!   invokes the channel providers and writes the delivery log.
//! - [`delivery`]: external delivery providers (SMTP email, REST SMS).
//! - [`store`]: the persistence seam the dispatcher reads and writes through.

pub mod delivery;
pub mod dispatcher;
pub mod store;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::sms::{SmsConfig, SmsDelivery};
pub use delivery::{DeliveryError, EmailSender, SmsSender};
pub use dispatcher::{ChannelResult, DispatchError, DispatchRequest, NotificationDispatcher};
pub use store::{NotificationStore, PgNotificationStore};
