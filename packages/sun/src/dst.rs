//! Daylight-saving window.
//!
//! The sun table is published in standard time while incident times are
//! recorded on local wall clocks, which run one hour ahead between the
//! spring and autumn transitions. [`DstWindow`] captures that range for
//! the report year and shifts incident times onto the table's clock.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Date range during which local clocks are ahead of standard time.
///
/// Both boundary dates are exclusive: the transition days themselves use
/// standard time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DstWindow {
    /// Day clocks spring forward.
    pub start: NaiveDate,
    /// Day clocks fall back.
    pub end: NaiveDate,
    /// How far local clocks run ahead of the table.
    pub offset_minutes: u32,
}

impl DstWindow {
    /// Creates a window with the standard one-hour offset.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            offset_minutes: 60,
        }
    }

    /// Whether `date` lies strictly between the transition days.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date < self.end
    }

    /// Minutes to add to a local incident time on `date` to express it on
    /// the table's clock. Zero outside the window.
    #[must_use]
    pub fn offset_on(&self, date: NaiveDate) -> u32 {
        if self.contains(date) {
            self.offset_minutes
        } else {
            0
        }
    }

    /// The offset as a duration.
    #[must_use]
    pub fn offset(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.offset_minutes))
    }
}
