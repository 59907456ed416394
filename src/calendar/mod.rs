pub mod date_utils;
pub mod event;
pub mod recurrence;
pub mod store;

pub use event::{
    CalendarEvent, EventColor, EventDraft, EventPatch, MultiDayPosition, RecurrenceOptions,
};
pub use recurrence::{
    generate_instances, MonthlyPosition, RecurrenceRule, RecurrenceType, DEFAULT_MAX_INSTANCES,
};
pub use store::CalendarStore;

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar scheduling errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("cannot schedule a timed event on {0}: the day already has an all-day event")]
    Conflict(chrono::NaiveDate),

    #[error("event title cannot be empty")]
    EmptyTitle,
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Calendar display mode, tracked per store so range queries and the host
/// view stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Month
    }
}

/// Time window for range queries. Events overlap the range when they start
/// before `end` and finish on or after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Per-store configuration supplied at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// View mode the store starts in (and returns to on `reset`).
    pub initial_view: ViewMode,
    /// First day of the week for week-window queries.
    pub week_start: Weekday,
    /// Fallback color for events created without one. The store carries
    /// this for the presentation layer; it never stamps it onto events.
    pub default_color: EventColor,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            initial_view: ViewMode::Month,
            week_start: Weekday::Sun,
            default_color: EventColor::new("#3788d8"),
        }
    }
}
