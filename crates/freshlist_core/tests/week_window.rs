use chrono::{Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use freshlist_core::{resolve_week, WeekSelection};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn wednesday_resolves_to_sunday_through_saturday() {
    let reference = Utc.with_ymd_and_hms(2024, 1, 10, 15, 42, 7).unwrap();

    let week = resolve_week(&reference).unwrap();
    assert_eq!(*week.start(), Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
    assert_eq!(
        *week.end(),
        Utc.with_ymd_and_hms(2024, 1, 13, 23, 59, 59).unwrap() + Duration::milliseconds(999)
    );
    assert_eq!(week.label(), "01/07 - 01/13");
}

#[test]
fn span_is_six_days_plus_end_of_day() {
    let week = WeekSelection::for_date(date(2024, 5, 22), &Utc).unwrap();
    let span = week.end().clone() - week.start().clone();
    assert_eq!(
        span,
        Duration::days(6) + Duration::hours(23) + Duration::minutes(59) + Duration::milliseconds(59_999)
    );
    assert_eq!(week.start_date().weekday(), Weekday::Sun);
    assert_eq!(week.end().nanosecond(), 999_000_000);
}

#[test]
fn every_day_of_a_week_resolves_to_the_same_selection() {
    let base = WeekSelection::for_date(date(2024, 7, 9), &Utc).unwrap();
    for day in base.dates() {
        assert_eq!(WeekSelection::for_date(day, &Utc).unwrap(), base);
    }
    let last_instant = resolve_week(base.end()).unwrap();
    assert_eq!(last_instant, base);
}

#[test]
fn week_crossing_year_boundary_uses_calendar_arithmetic() {
    let week = WeekSelection::for_date(date(2025, 1, 2), &Utc).unwrap();
    assert_eq!(week.start_date(), date(2024, 12, 29));
    assert_eq!(week.end_date(), date(2025, 1, 4));
    assert_eq!(week.label(), "12/29 - 01/04");
}

#[test]
fn week_crossing_month_boundary_in_leap_february() {
    let week = WeekSelection::for_date(date(2024, 3, 1), &Utc).unwrap();
    assert_eq!(week.start_date(), date(2024, 2, 25));
    assert_eq!(week.end_date(), date(2024, 3, 2));
}

#[test]
fn local_zone_decides_the_reference_day() {
    let zone = FixedOffset::west_opt(8 * 3600).unwrap();
    // Sunday 02:00 UTC is still Saturday evening in UTC-8.
    let reference = Utc
        .with_ymd_and_hms(2024, 1, 7, 2, 0, 0)
        .unwrap()
        .with_timezone(&zone);

    let week = resolve_week(&reference).unwrap();
    assert_eq!(week.start_date(), date(2023, 12, 31));
    assert_eq!(week.start().hour(), 0);
}

#[test]
fn contains_is_inclusive_at_both_ends() {
    let week = WeekSelection::for_date(date(2024, 1, 10), &Utc).unwrap();
    assert!(week.contains(week.start()));
    assert!(week.contains(week.end()));
    assert!(!week.contains(&(week.start().clone() - Duration::milliseconds(1))));
    assert!(!week.contains(&(week.end().clone() + Duration::milliseconds(1))));
}

#[test]
fn next_and_previous_step_whole_weeks() {
    let week = WeekSelection::for_date(date(2024, 1, 10), &Utc).unwrap();
    assert_eq!(week.next().unwrap().start_date(), date(2024, 1, 14));
    assert_eq!(week.previous().unwrap().start_date(), date(2023, 12, 31));
    assert_eq!(week.next().unwrap().previous().unwrap(), week);
}
