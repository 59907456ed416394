use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::recurrence::RecurrenceRule;

/// Presentation colors carried opaquely alongside an event. The store
/// never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColor {
    /// Main color (background).
    pub primary: String,
    /// Secondary color (border).
    pub secondary: Option<String>,
    pub text_color: Option<String>,
}

impl EventColor {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
            text_color: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    pub fn with_text_color(mut self, text_color: impl Into<String>) -> Self {
        self.text_color = Some(text_color.into());
        self
    }
}

/// Recurrence information attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceOptions {
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Shared by every instance of one series; assigned by the store.
    pub recurrence_group_id: Option<String>,
    /// Whether this instance deviates from its series pattern.
    pub is_exception: bool,
    /// The date the instance originally fell on, for exceptions.
    pub original_date: Option<NaiveDate>,
}

impl RecurrenceOptions {
    pub fn with_rule(rule: RecurrenceRule) -> Self {
        Self {
            is_recurring: true,
            recurrence_rule: Some(rule),
            ..Self::default()
        }
    }
}

/// Which part of a multi-day event a given day shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiDayPosition {
    Start,
    Middle,
    End,
}

/// A calendar event as held by the store.
///
/// `id` is assigned at creation and never changes. Every accessor on the
/// store returns clones of these; mutating a returned value has no effect
/// until it is written back through `update_event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    /// Optional end. The store never fabricates one; see [`Self::duration`]
    /// for the consumer-side default.
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub color: Option<EventColor>,
    /// Capability flags consumed by the presentation layer. The store does
    /// not enforce them; mutation methods succeed regardless.
    pub editable: bool,
    pub deletable: bool,
    pub draggable: bool,
    pub resizable: bool,
    /// Opaque caller payload, stored untouched.
    pub meta: Option<serde_json::Value>,
    pub recurrence: Option<RecurrenceOptions>,
}

impl CalendarEvent {
    /// Event duration, defaulting to one hour when no end is set.
    pub fn duration(&self) -> Duration {
        match self.end {
            Some(end) => end - self.start,
            None => Duration::hours(1),
        }
    }

    /// End timestamp used for interval comparisons: the start itself when
    /// no end was supplied.
    pub fn end_or_start(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }

    /// Check if this event overlaps another in time.
    pub fn overlaps_with(&self, other: &CalendarEvent) -> bool {
        self.start < other.end_or_start() && self.end_or_start() > other.start
    }

    /// Whether the event spans more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        match self.end {
            Some(end) => end.date() != self.start.date(),
            None => false,
        }
    }

    /// Classify `date` within a multi-day event's span: the day it starts,
    /// the day it ends, or a day in between. Returns `None` for
    /// single-day events. Callers pass a day the event is rendered on;
    /// days outside the span classify as `Middle`.
    pub fn multi_day_position(&self, date: NaiveDate) -> Option<MultiDayPosition> {
        let end = self.end?;
        if end.date() == self.start.date() {
            return None;
        }
        if date == self.start.date() {
            Some(MultiDayPosition::Start)
        } else if date == end.date() {
            Some(MultiDayPosition::End)
        } else {
            Some(MultiDayPosition::Middle)
        }
    }

    /// Check if this event is part of a recurring series.
    pub fn is_recurring(&self) -> bool {
        self.recurrence
            .as_ref()
            .map_or(false, |r| r.is_recurring && r.recurrence_rule.is_some())
    }

    /// The series id this event belongs to, if any.
    pub fn recurrence_group_id(&self) -> Option<&str> {
        self.recurrence.as_ref()?.recurrence_group_id.as_deref()
    }
}

/// A [`CalendarEvent`] without an id, handed to the store for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub color: Option<EventColor>,
    pub editable: bool,
    pub deletable: bool,
    pub draggable: bool,
    pub resizable: bool,
    pub meta: Option<serde_json::Value>,
    pub recurrence: Option<RecurrenceOptions>,
}

impl EventDraft {
    /// Create a timed event draft. Capability flags default to permissive.
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            start,
            end: None,
            all_day: false,
            color: None,
            editable: true,
            deletable: true,
            draggable: true,
            resizable: true,
            meta: None,
            recurrence: None,
        }
    }

    /// Create an all-day event draft. The store normalizes the window to
    /// the full day at write time.
    pub fn new_all_day(title: impl Into<String>, date: NaiveDate) -> Self {
        let mut draft = Self::new(title, date.and_hms_opt(0, 0, 0).unwrap());
        draft.all_day = true;
        draft
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(RecurrenceOptions::with_rule(rule));
        self
    }
}

/// Partial update applied by `update_event`. `None` leaves a field
/// untouched; for the clearable optionals an outer `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<Option<NaiveDateTime>>,
    pub all_day: Option<bool>,
    pub color: Option<Option<EventColor>>,
    pub editable: Option<bool>,
    pub deletable: Option<bool>,
    pub draggable: Option<bool>,
    pub resizable: Option<bool>,
    pub meta: Option<Option<serde_json::Value>>,
    pub recurrence: Option<Option<RecurrenceOptions>>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(Some(end));
        self
    }

    pub fn clear_end(mut self) -> Self {
        self.end = Some(None);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = Some(all_day);
        self
    }

    pub fn color(mut self, color: EventColor) -> Self {
        self.color = Some(Some(color));
        self
    }

    pub fn meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(Some(meta));
        self
    }

    pub fn recurrence(mut self, recurrence: RecurrenceOptions) -> Self {
        self.recurrence = Some(Some(recurrence));
        self
    }

    /// Overlay the patch onto an event. The id is not patchable.
    pub fn apply_to(&self, event: &mut CalendarEvent) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(color) = &self.color {
            event.color = color.clone();
        }
        if let Some(editable) = self.editable {
            event.editable = editable;
        }
        if let Some(deletable) = self.deletable {
            event.deletable = deletable;
        }
        if let Some(draggable) = self.draggable {
            event.draggable = draggable;
        }
        if let Some(resizable) = self.resizable {
            event.resizable = resizable;
        }
        if let Some(meta) = &self.meta {
            event.meta = meta.clone();
        }
        if let Some(recurrence) = &self.recurrence {
            event.recurrence = recurrence.clone();
        }
    }
}
