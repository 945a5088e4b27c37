//! Quiet-hours window evaluation.
//!
//! A window is expressed in the user's local wall-clock time and may wrap
//! midnight (e.g. 22:00 to 07:00). The start is inclusive, the end exclusive.
//! A window whose start equals its end is empty.

use chrono::NaiveTime;
pub use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime, timezone: Tz) -> Self {
        Self {
            start,
            end,
            timezone,
        }
    }

    /// Whether `now` falls inside the window once converted to local time.
    pub fn contains(&self, now: Timestamp) -> bool {
        let local = now.with_timezone(&self.timezone).time();
        if self.start == self.end {
            false
        } else if self.start < self.end {
            local >= self.start && local < self.end
        } else {
            local >= self.start || local < self.end
        }
    }
}

/// Parse an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone '{name}'")))
}
