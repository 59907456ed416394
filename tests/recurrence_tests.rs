//! Recurrence generator tests against known calendars: pattern shapes,
//! boundedness, exclusions, and ordering.

use chrono::{Datelike, NaiveDate, Weekday};
use eventide::{
    generate_instances, MonthlyPosition, RecurrenceRule, DEFAULT_MAX_INSTANCES,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn daily_series_over_a_month_boundary() {
    let rule = RecurrenceRule::daily(date(2024, 1, 30), 1).with_count(4);
    let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);

    assert_eq!(
        instances,
        vec![
            date(2024, 1, 30),
            date(2024, 1, 31),
            date(2024, 2, 1),
            date(2024, 2, 2),
        ]
    );
}

#[test]
fn weekly_series_on_work_days() {
    let rule = RecurrenceRule::weekly(
        date(2024, 3, 4),
        1,
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
    )
    .with_end_date(date(2024, 3, 8));
    let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);

    assert_eq!(instances.len(), 5);
    assert_eq!(instances.first(), Some(&date(2024, 3, 4)));
    assert_eq!(instances.last(), Some(&date(2024, 3, 8)));
    assert!(instances.iter().all(|d| d.weekday() != Weekday::Sat));
}

#[test]
fn monthly_day_thirty_skips_february() {
    let rule = RecurrenceRule::monthly_by_date(date(2024, 1, 30), 1, 30)
        .with_end_date(date(2024, 4, 30));
    let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);

    // February 2024 tops out at 29 days and contributes nothing.
    assert_eq!(
        instances,
        vec![date(2024, 1, 30), date(2024, 3, 30), date(2024, 4, 30)]
    );
    assert!(instances.iter().all(|d| d.month() != 2));
}

#[test]
fn last_friday_resolution() {
    let rule = RecurrenceRule::monthly_positional(
        date(2024, 1, 1),
        1,
        MonthlyPosition::Last,
        Weekday::Fri,
    )
    .with_count(1);

    assert_eq!(
        generate_instances(&rule, DEFAULT_MAX_INSTANCES),
        vec![date(2024, 1, 26)]
    );
}

#[test]
fn fourth_thursday_of_november() {
    // Thanksgiving 2024.
    let rule = RecurrenceRule::monthly_positional(
        date(2024, 11, 1),
        12,
        MonthlyPosition::Fourth,
        Weekday::Thu,
    )
    .with_count(2);

    assert_eq!(
        generate_instances(&rule, DEFAULT_MAX_INSTANCES),
        vec![date(2024, 11, 28), date(2025, 11, 27)]
    );
}

#[test]
fn yearly_anniversary() {
    let rule = RecurrenceRule::yearly(date(2020, 6, 15), 2).with_end_date(date(2026, 12, 31));
    let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);

    assert_eq!(
        instances,
        vec![
            date(2020, 6, 15),
            date(2022, 6, 15),
            date(2024, 6, 15),
            date(2026, 6, 15),
        ]
    );
}

#[test]
fn unbounded_rules_stay_finite() {
    // No end date, no count: the ceiling is the only bound.
    for rule in [
        RecurrenceRule::daily(date(2024, 1, 1), 1),
        RecurrenceRule::weekly(date(2024, 1, 1), 1, Vec::new()),
        RecurrenceRule::monthly_by_date(date(2024, 1, 1), 1, 15),
        RecurrenceRule::yearly(date(2024, 1, 1), 1),
    ] {
        let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);
        assert_eq!(instances.len(), DEFAULT_MAX_INSTANCES);
    }
}

#[test]
fn excluded_dates_never_appear() {
    let exdates = vec![date(2024, 3, 11), date(2024, 3, 18)];
    let rule = RecurrenceRule::weekly(date(2024, 3, 4), 1, Vec::new())
        .with_count(5)
        .with_exdates(exdates.clone());
    let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);

    for excluded in &exdates {
        assert!(!instances.contains(excluded));
    }
    // Five slots were generated; the two exclusions leave three.
    assert_eq!(
        instances,
        vec![date(2024, 3, 4), date(2024, 3, 25), date(2024, 4, 1)]
    );
}

#[test]
fn sequences_are_strictly_increasing() {
    let rules = [
        RecurrenceRule::daily(date(2024, 1, 1), 3).with_count(20),
        RecurrenceRule::monthly_by_date(date(2024, 1, 31), 1, 31).with_count(12),
        RecurrenceRule::monthly_positional(
            date(2024, 1, 1),
            1,
            MonthlyPosition::Last,
            Weekday::Sun,
        )
        .with_count(12),
        RecurrenceRule::yearly(date(2024, 2, 29), 1).with_count(8),
    ];

    for rule in rules {
        let instances = generate_instances(&rule, DEFAULT_MAX_INSTANCES);
        assert!(
            instances.windows(2).all(|pair| pair[0] < pair[1]),
            "out-of-order instances for {:?}",
            rule.rule_type
        );
    }
}
