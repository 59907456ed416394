use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::calendar::date_utils::{
    end_of_week, first_day_of_month, last_day_of_month, start_of_week,
};
use crate::calendar::event::{CalendarEvent, EventColor, EventDraft, EventPatch};
use crate::calendar::recurrence::generate_instances;
use crate::calendar::{CalendarConfig, CalendarError, CalendarResult, DateRange, ViewMode};

/// In-memory store for calendar events.
///
/// The store owns the authoritative copy of every event; all accessors
/// return snapshots. It is single-threaded and synchronous: every method
/// runs to completion, and a failed mutation leaves the store exactly as
/// it was. Concurrent callers must serialize access themselves.
#[derive(Debug)]
pub struct CalendarStore {
    events: Vec<CalendarEvent>,
    selected_date: NaiveDate,
    view_mode: ViewMode,
    config: CalendarConfig,
}

impl CalendarStore {
    /// Create a store with default configuration. The selected-date
    /// cursor starts on the current local date.
    pub fn new() -> Self {
        Self::with_config(CalendarConfig::default())
    }

    pub fn with_config(config: CalendarConfig) -> Self {
        Self {
            events: Vec::new(),
            selected_date: Local::now().date_naive(),
            view_mode: config.initial_view,
            config,
        }
    }

    // CRUD operations

    /// Create a new event and return the stored snapshot.
    ///
    /// All-day drafts get their window normalized to the full calendar
    /// day. Timed drafts are rejected with [`CalendarError::Conflict`]
    /// when an all-day event already starts on the same day. Recurring
    /// drafts are stamped with a fresh series id.
    pub fn create_event(&mut self, draft: EventDraft) -> CalendarResult<CalendarEvent> {
        let mut event = CalendarEvent {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            start: draft.start,
            end: draft.end,
            all_day: draft.all_day,
            color: draft.color,
            editable: draft.editable,
            deletable: draft.deletable,
            draggable: draft.draggable,
            resizable: draft.resizable,
            meta: draft.meta,
            recurrence: draft.recurrence,
        };
        normalize_all_day(&mut event);
        self.check_invariants(&event, None)?;

        if let Some(recurrence) = event.recurrence.as_mut() {
            if recurrence.is_recurring && recurrence.recurrence_rule.is_some() {
                recurrence.recurrence_group_id = Some(Uuid::new_v4().to_string());
            }
        }

        tracing::debug!(id = %event.id, title = %event.title, "created calendar event");
        self.events.push(event.clone());
        Ok(event)
    }

    /// Get a specific event by id.
    pub fn get_event(&self, id: &str) -> Option<CalendarEvent> {
        self.events.iter().find(|event| event.id == id).cloned()
    }

    /// Apply a partial update to an existing event.
    ///
    /// Returns `Ok(None)` when the id is unknown. Normalization and the
    /// conflict check run against the merged result, with the event
    /// itself excluded from the conflict scan; on `Err` the store is
    /// unchanged.
    pub fn update_event(
        &mut self,
        id: &str,
        patch: EventPatch,
    ) -> CalendarResult<Option<CalendarEvent>> {
        let Some(index) = self.events.iter().position(|event| event.id == id) else {
            return Ok(None);
        };

        let mut candidate = self.events[index].clone();
        patch.apply_to(&mut candidate);
        normalize_all_day(&mut candidate);
        self.check_invariants(&candidate, Some(id))?;

        tracing::debug!(id = %candidate.id, "updated calendar event");
        self.events[index] = candidate.clone();
        Ok(Some(candidate))
    }

    /// Delete an event by id. Returns true iff an event was removed.
    pub fn delete_event(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        let removed = self.events.len() < before;
        if removed {
            tracing::debug!(id, "deleted calendar event");
        }
        removed
    }

    /// Delete every event belonging to a recurrence group. Returns true
    /// iff at least one member was removed.
    pub fn delete_recurring_event(&mut self, recurrence_group_id: &str) -> bool {
        if recurrence_group_id.is_empty() {
            return false;
        }
        let before = self.events.len();
        self.events
            .retain(|event| event.recurrence_group_id() != Some(recurrence_group_id));
        let removed = before - self.events.len();
        if removed > 0 {
            tracing::debug!(
                group = recurrence_group_id,
                removed,
                "deleted recurring series"
            );
        }
        removed > 0
    }

    /// Snapshot of all events, in insertion order. Insertion order carries
    /// no query semantics.
    pub fn get_all_events(&self) -> Vec<CalendarEvent> {
        self.events.clone()
    }

    // Date cursor and view state

    pub fn set_selected_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn get_selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn get_view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Fallback color for events created without one, for the
    /// presentation layer to apply at render time.
    pub fn default_event_color(&self) -> &EventColor {
        &self.config.default_color
    }

    // Queries

    /// Events overlapping the given calendar day.
    ///
    /// All-day events match when the day falls inside their calendar-day
    /// range; timed events match on any overlap with the day's 24-hour
    /// window, including spans that cross midnight.
    pub fn get_events_for_date(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap();
        let next_day = day_start + Duration::days(1);

        self.events
            .iter()
            .filter(|event| {
                let event_end = event.end_or_start();
                if event.all_day {
                    event.start.date() <= date && event_end.date() >= date
                } else {
                    event.start < next_day && event_end >= day_start
                }
            })
            .cloned()
            .collect()
    }

    /// Events overlapping the given time range.
    pub fn get_events_in_range(&self, range: &DateRange) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .filter(|event| event.start < range.end && event.end_or_start() >= range.start)
            .cloned()
            .collect()
    }

    /// Events in the week containing the selected date, using the
    /// configured week start day.
    pub fn get_events_for_current_week(&self) -> Vec<CalendarEvent> {
        let first = start_of_week(self.selected_date, self.config.week_start);
        let last = end_of_week(self.selected_date, self.config.week_start);
        self.get_events_in_range(&DateRange {
            start: first.and_hms_opt(0, 0, 0).unwrap(),
            end: last.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
        })
    }

    /// Events in the month containing the selected date.
    pub fn get_events_for_current_month(&self) -> Vec<CalendarEvent> {
        let year = self.selected_date.year();
        let month = self.selected_date.month();
        let (Some(first), Some(last)) = (
            first_day_of_month(year, month),
            last_day_of_month(year, month),
        ) else {
            return Vec::new();
        };
        self.get_events_in_range(&DateRange {
            start: first.and_hms_opt(0, 0, 0).unwrap(),
            end: last.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
        })
    }

    /// Expand a stored recurring event's rule into concrete occurrence
    /// timestamps, carrying the event's start time-of-day onto each
    /// occurrence day. Returns `None` for unknown or non-recurring ids.
    /// Pure preview: nothing is inserted.
    pub fn preview_occurrences(&self, id: &str, max_instances: usize) -> Option<Vec<NaiveDateTime>> {
        let event = self.events.iter().find(|event| event.id == id)?;
        let recurrence = event.recurrence.as_ref()?;
        if !recurrence.is_recurring {
            return None;
        }
        let rule = recurrence.recurrence_rule.as_ref()?;

        let time_of_day = event.start.time();
        Some(
            generate_instances(rule, max_instances)
                .into_iter()
                .map(|occurrence| occurrence.and_time(time_of_day))
                .collect(),
        )
    }

    /// Clear all events and return the cursor and view to their initial
    /// state.
    pub fn reset(&mut self) {
        self.events.clear();
        self.selected_date = Local::now().date_naive();
        self.view_mode = self.config.initial_view;
        tracing::debug!("calendar store reset");
    }

    /// Invariant checks shared by create and update. `exclude` removes
    /// the event being updated from the conflict scan.
    fn check_invariants(
        &self,
        candidate: &CalendarEvent,
        exclude: Option<&str>,
    ) -> CalendarResult<()> {
        if candidate.title.trim().is_empty() {
            return Err(CalendarError::EmptyTitle);
        }

        // All-day exclusivity is asymmetric: only timed events are
        // checked against existing all-day events, and the comparison is
        // against the day the all-day event starts on.
        if !candidate.all_day {
            let day = candidate.start.date();
            let clash = self.events.iter().any(|existing| {
                existing.all_day
                    && exclude != Some(existing.id.as_str())
                    && existing.start.date() == day
            });
            if clash {
                return Err(CalendarError::Conflict(day));
            }
        }
        Ok(())
    }
}

impl Default for CalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin an all-day event to the 00:00:00.000-23:59:59.999 window of its
/// calendar day(s). Timed events pass through untouched.
fn normalize_all_day(event: &mut CalendarEvent) {
    if !event.all_day {
        return;
    }
    let start_day = event.start.date();
    let end_day = event.end.map_or(start_day, |end| end.date());
    event.start = start_day.and_hms_opt(0, 0, 0).unwrap();
    event.end = end_day.and_hms_milli_opt(23, 59, 59, 999);
}
