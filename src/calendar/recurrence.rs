//! Recurrence rules and the bounded instance generator.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::date_utils::{first_day_of_month, last_day_of_month, start_of_week};

/// Safety bound on generated sequences. A rule with no end date and no
/// count still terminates at this many instances; callers that need more
/// must raise the limit explicitly.
pub const DEFAULT_MAX_INSTANCES: usize = 100;

/// Recurrence pattern kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Opaque external rule (RFC 5545 text in `rrule`). Expansion is
    /// delegated to the caller; the generator yields nothing for it.
    Custom,
}

/// Ordinal position of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthlyPosition {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl MonthlyPosition {
    fn week_index(self) -> i64 {
        match self {
            MonthlyPosition::First => 1,
            MonthlyPosition::Second => 2,
            MonthlyPosition::Third => 3,
            MonthlyPosition::Fourth => 4,
            MonthlyPosition::Last => 5,
        }
    }
}

/// Recurrence rule configuration.
///
/// Only the fields relevant to `rule_type` are consulted: `days_of_week`
/// for weekly rules, `day_of_month` or `position`/`day_of_week_position`
/// for monthly rules, `rrule` for custom rules. `end_date` and `count`
/// both bound the sequence; whichever is hit first wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub rule_type: RecurrenceType,
    /// Step between occurrences (every N days/weeks/months/years).
    /// Defaults to 1.
    pub interval: Option<u32>,
    /// Weekly rules: weekdays to include. Empty means the start date's
    /// weekday.
    pub days_of_week: Vec<Weekday>,
    /// Monthly-by-date rules: day of month to anchor on (1-31).
    pub day_of_month: Option<u32>,
    /// Monthly positional rules: which occurrence within the month.
    pub position: Option<MonthlyPosition>,
    /// Monthly positional rules: which weekday.
    pub day_of_week_position: Option<Weekday>,
    /// Month of the year (1-12), carried for yearly rules.
    pub month: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Number of occurrences when no end date is set.
    pub count: Option<usize>,
    /// Raw rule text for [`RecurrenceType::Custom`].
    pub rrule: Option<String>,
    /// Calendar days excluded from the generated pattern.
    pub exdates: Vec<NaiveDate>,
}

impl RecurrenceRule {
    fn base(rule_type: RecurrenceType, start_date: NaiveDate) -> Self {
        Self {
            rule_type,
            interval: None,
            days_of_week: Vec::new(),
            day_of_month: None,
            position: None,
            day_of_week_position: None,
            month: None,
            start_date,
            end_date: None,
            count: None,
            rrule: None,
            exdates: Vec::new(),
        }
    }

    pub fn daily(start_date: NaiveDate, interval: u32) -> Self {
        Self {
            interval: Some(interval),
            ..Self::base(RecurrenceType::Daily, start_date)
        }
    }

    pub fn weekly(start_date: NaiveDate, interval: u32, days_of_week: Vec<Weekday>) -> Self {
        Self {
            interval: Some(interval),
            days_of_week,
            ..Self::base(RecurrenceType::Weekly, start_date)
        }
    }

    pub fn monthly_by_date(start_date: NaiveDate, interval: u32, day_of_month: u32) -> Self {
        Self {
            interval: Some(interval),
            day_of_month: Some(day_of_month),
            ..Self::base(RecurrenceType::Monthly, start_date)
        }
    }

    pub fn monthly_positional(
        start_date: NaiveDate,
        interval: u32,
        position: MonthlyPosition,
        weekday: Weekday,
    ) -> Self {
        Self {
            interval: Some(interval),
            position: Some(position),
            day_of_week_position: Some(weekday),
            ..Self::base(RecurrenceType::Monthly, start_date)
        }
    }

    pub fn yearly(start_date: NaiveDate, interval: u32) -> Self {
        Self {
            interval: Some(interval),
            month: Some(start_date.month()),
            ..Self::base(RecurrenceType::Yearly, start_date)
        }
    }

    pub fn custom(start_date: NaiveDate, rrule: impl Into<String>) -> Self {
        Self {
            rrule: Some(rrule.into()),
            ..Self::base(RecurrenceType::Custom, start_date)
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_exdates(mut self, exdates: Vec<NaiveDate>) -> Self {
        self.exdates = exdates;
        self
    }
}

/// Expands a rule into an ordered sequence of occurrence days.
///
/// The sequence is bounded by `max_instances` regardless of what the rule
/// asks for, and by `rule.count`/`rule.end_date` when they bind sooner.
/// Days listed in `rule.exdates` are removed after expansion.
pub fn generate_instances(rule: &RecurrenceRule, max_instances: usize) -> Vec<NaiveDate> {
    let cap = rule.count.unwrap_or(max_instances).min(max_instances);
    let interval = rule.interval.unwrap_or(1).max(1);
    let mut out = Vec::new();

    match rule.rule_type {
        RecurrenceType::Daily => collect_daily(rule, interval, cap, &mut out),
        RecurrenceType::Weekly => collect_weekly(rule, interval, cap, &mut out),
        RecurrenceType::Monthly => {
            if let Some(day_of_month) = rule.day_of_month {
                collect_monthly_by_date(rule, interval, day_of_month, cap, &mut out);
            } else if let (Some(position), Some(weekday)) =
                (rule.position, rule.day_of_week_position)
            {
                collect_monthly_positional(rule, interval, position, weekday, cap, &mut out);
            }
        }
        RecurrenceType::Yearly => collect_yearly(rule, interval, cap, &mut out),
        RecurrenceType::Custom => {
            tracing::debug!("custom recurrence rules are expanded by the caller");
        }
    }

    if !rule.exdates.is_empty() {
        out.retain(|occurrence| !rule.exdates.contains(occurrence));
    }
    out
}

fn collect_daily(rule: &RecurrenceRule, interval: u32, cap: usize, out: &mut Vec<NaiveDate>) {
    let mut current = rule.start_date;
    while out.len() < cap && rule.end_date.map_or(true, |end| current <= end) {
        out.push(current);
        current += Duration::days(i64::from(interval));
    }
}

fn collect_weekly(rule: &RecurrenceRule, interval: u32, cap: usize, out: &mut Vec<NaiveDate>) {
    // An empty day list means "the weekday the series started on".
    let included: Vec<Weekday> = if rule.days_of_week.is_empty() {
        vec![rule.start_date.weekday()]
    } else {
        rule.days_of_week.clone()
    };

    let mut cursor = rule.start_date;
    while out.len() < cap && rule.end_date.map_or(true, |end| cursor <= end) {
        let week_start = start_of_week(cursor, Weekday::Sun);
        for offset in 0..7 {
            if out.len() >= cap {
                break;
            }
            let day = week_start + Duration::days(offset);
            if day < rule.start_date {
                continue;
            }
            if rule.end_date.is_some_and(|end| day > end) {
                break;
            }
            if included.contains(&day.weekday()) {
                out.push(day);
            }
        }
        cursor += Duration::days(7 * i64::from(interval));
    }
}

fn collect_monthly_by_date(
    rule: &RecurrenceRule,
    interval: u32,
    day_of_month: u32,
    cap: usize,
    out: &mut Vec<NaiveDate>,
) {
    if day_of_month == 0 || day_of_month > 31 {
        return;
    }

    let (mut year, mut month) = (rule.start_date.year(), rule.start_date.month());
    // When the anchor day in the start month has already passed, the
    // series begins the following month.
    if let Some(anchor) = NaiveDate::from_ymd_opt(year, month, day_of_month) {
        if anchor < rule.start_date {
            (year, month) = step_months(year, month, 1);
        }
    }

    while out.len() < cap {
        match first_day_of_month(year, month) {
            Some(month_start) => {
                if rule.end_date.is_some_and(|end| month_start > end) {
                    break;
                }
            }
            None => break,
        }
        // Months too short for the anchor day are skipped without
        // consuming a slot (no February 30).
        if let Some(occurrence) = NaiveDate::from_ymd_opt(year, month, day_of_month) {
            if rule.end_date.is_some_and(|end| occurrence > end) {
                break;
            }
            out.push(occurrence);
        }
        (year, month) = step_months(year, month, interval);
    }
}

fn collect_monthly_positional(
    rule: &RecurrenceRule,
    interval: u32,
    position: MonthlyPosition,
    weekday: Weekday,
    cap: usize,
    out: &mut Vec<NaiveDate>,
) {
    let (mut year, mut month) = (rule.start_date.year(), rule.start_date.month());
    while out.len() < cap {
        let Some(occurrence) = positional_date(year, month, position, weekday) else {
            break;
        };
        if rule.end_date.is_some_and(|end| occurrence > end) {
            break;
        }
        // Occurrences before the series start are dropped without
        // consuming a slot.
        if occurrence >= rule.start_date {
            out.push(occurrence);
        }
        (year, month) = step_months(year, month, interval);
    }
}

fn collect_yearly(rule: &RecurrenceRule, interval: u32, cap: usize, out: &mut Vec<NaiveDate>) {
    let mut current = rule.start_date;
    while out.len() < cap && rule.end_date.map_or(true, |end| current <= end) {
        out.push(current);
        // Month arithmetic clamps to the end of the month, so a Feb 29
        // anchor lands on Feb 28 in common years.
        current = match current.checked_add_months(Months::new(12u32.saturating_mul(interval))) {
            Some(next) => next,
            None => break,
        };
    }
}

/// Resolves a positional expression like "last Friday" for one month.
fn positional_date(
    year: i32,
    month: u32,
    position: MonthlyPosition,
    weekday: Weekday,
) -> Option<NaiveDate> {
    if position == MonthlyPosition::Last {
        let mut day = last_day_of_month(year, month)?;
        while day.weekday() != weekday {
            day = day.pred_opt()?;
        }
        Some(day)
    } else {
        let mut day = first_day_of_month(year, month)?;
        while day.weekday() != weekday {
            day = day.succ_opt()?;
        }
        Some(day + Duration::days(7 * (position.week_index() - 1)))
    }
}

fn step_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(months);
    ((index.div_euclid(12)) as i32, (index.rem_euclid(12) + 1) as u32)
}
