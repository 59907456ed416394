pub mod calendar;

pub use calendar::{
    generate_instances, CalendarConfig, CalendarError, CalendarEvent, CalendarResult,
    CalendarStore, DateRange, EventColor, EventDraft, EventPatch, MonthlyPosition,
    MultiDayPosition, RecurrenceOptions, RecurrenceRule, RecurrenceType, ViewMode,
    DEFAULT_MAX_INSTANCES,
};
