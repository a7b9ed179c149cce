use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::America::{New_York, Santiago};
use freshlist_core::{compute_expiration, ExpirationPolicy, GroceryItem, WeekSelection};

#[test]
fn day_addition_keeps_wall_time_across_spring_forward() {
    let policy = ExpirationPolicy::new(New_York);
    // 2024-03-10 is a 23-hour day in New York.
    let item = GroceryItem::new("ny-1", "Milk", "2024-03-09T12:00:00").with_shelf_life(None, Some(1));

    let expiration = compute_expiration(&item, &policy).unwrap().unwrap();
    assert_eq!(
        expiration.at,
        New_York.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    );
    assert_eq!(
        expiration.at.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap()
    );
}

#[test]
fn wall_time_in_spring_gap_moves_forward() {
    let policy = ExpirationPolicy::new(New_York);

    let parsed = policy.parse_created_at("2024-03-10T02:30:00").unwrap();
    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap()
    );
    assert_eq!(parsed.to_rfc3339(), "2024-03-10T03:30:00-04:00");
}

#[test]
fn ambiguous_fall_back_time_takes_earlier_instant() {
    let policy = ExpirationPolicy::new(New_York);

    let parsed = policy.parse_created_at("2024-11-03T01:30:00").unwrap();
    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap()
    );
    assert_eq!(parsed.to_rfc3339(), "2024-11-03T01:30:00-04:00");
}

#[test]
fn week_starting_on_a_midnight_gap_begins_at_first_valid_instant() {
    // Santiago skips 2024-09-08 00:00 ..01:00.
    let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
    let week = WeekSelection::for_date(date, &Santiago).unwrap();

    assert_eq!(week.start_date().weekday(), Weekday::Sun);
    assert_eq!(week.start().to_rfc3339(), "2024-09-08T01:00:00-03:00");
    assert_eq!(
        *week.end(),
        Santiago.with_ymd_and_hms(2024, 9, 14, 23, 59, 59).unwrap() + Duration::milliseconds(999)
    );
    assert_eq!(week.label(), "09/08 - 09/14");
}

#[test]
fn date_only_created_at_on_a_midnight_gap_is_first_valid_instant() {
    let policy = ExpirationPolicy::new(Santiago);

    let parsed = policy.parse_created_at("2024-09-08").unwrap();
    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 9, 8, 4, 0, 0).unwrap()
    );
}
