//! Domain types and pure logic for the Bazaar marketplace backend.
//!
//! Nothing in this crate touches the database or the network. The
//! notification catalog, template rendering and quiet-hours evaluation
//! live here so they can be unit tested in isolation.

pub mod channels;
pub mod error;
pub mod notification_rules;
pub mod quiet_hours;
pub mod template;
pub mod types;
pub mod validation;
