use chrono::{FixedOffset, TimeZone, Utc};
use freshlist_core::{
    compute_expiration, ExpirationBasis, ExpirationError, ExpirationPolicy, GroceryItem,
};

fn utc_policy() -> ExpirationPolicy<Utc> {
    ExpirationPolicy::new(Utc)
}

#[test]
fn max_days_only_adds_calendar_days() {
    let item = GroceryItem::new("a", "Yogurt", "2024-01-01").with_shelf_life(None, Some(5));

    let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
    assert_eq!(expiration.at, Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap());
    assert_eq!(expiration.basis, ExpirationBasis::MaxDays);
}

#[test]
fn min_days_only_is_an_estimate() {
    let item = GroceryItem::new("b", "Spinach", "2024-01-01").with_shelf_life(Some(3), None);

    let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
    assert_eq!(expiration.at, Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    assert!(expiration.basis.is_estimate());
}

#[test]
fn max_days_wins_over_min_days() {
    for (min, max) in [(2, 7), (9, 4), (0, 1)] {
        let item = GroceryItem::new("c", "Cheese", "2024-03-10T08:30:00Z")
            .with_shelf_life(Some(min), Some(max));

        let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 10 + max as u32, 8, 30, 0)
            .unwrap();
        assert_eq!(expiration.at, expected, "min={min} max={max}");
        assert_eq!(expiration.basis, ExpirationBasis::MaxDays);
    }
}

#[test]
fn missing_shelf_life_is_unknown_not_created_at() {
    let item = GroceryItem::new("d", "Mystery jar", "2024-01-01");
    assert_eq!(compute_expiration(&item, &utc_policy()).unwrap(), None);
}

#[test]
fn negative_max_days_falls_back_to_min_days() {
    let item = GroceryItem::new("e", "Apples", "2024-01-01").with_shelf_life(Some(10), Some(-2));

    let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
    assert_eq!(expiration.at, Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap());
    assert_eq!(expiration.basis, ExpirationBasis::MinDaysEstimate);
}

#[test]
fn negative_offsets_only_are_unknown() {
    let item = GroceryItem::new("f", "Pears", "2024-01-01").with_shelf_life(Some(-1), Some(-1));
    assert_eq!(compute_expiration(&item, &utc_policy()).unwrap(), None);
}

#[test]
fn unparseable_created_at_is_an_error() {
    let item = GroceryItem::new("g", "Butter", "not a date").with_shelf_life(None, Some(30));

    let err = compute_expiration(&item, &utc_policy()).unwrap_err();
    assert_eq!(
        err,
        ExpirationError::InvalidTimestamp {
            id: "g".to_string(),
            raw: "not a date".to_string(),
        }
    );
    assert_eq!(err.item_id(), "g");
    assert!(err.to_string().contains("unparseable created_at"));
}

#[test]
fn unparseable_created_at_is_an_error_even_without_shelf_life() {
    let item = GroceryItem::new("h", "Salt", "");
    assert!(compute_expiration(&item, &utc_policy()).is_err());
}

#[test]
fn day_addition_crosses_year_and_leap_day() {
    let item = GroceryItem::new("i", "Ham", "2023-12-30T18:00:00Z").with_shelf_life(None, Some(61));

    let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
    assert_eq!(expiration.at, Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap());
}

#[test]
fn local_wall_time_is_kept_in_policy_zone() {
    let zone = FixedOffset::east_opt(9 * 3600).unwrap();
    let policy = ExpirationPolicy::new(zone);
    // 2024-01-31T20:00Z is 2024-02-01T05:00 in UTC+9.
    let item = GroceryItem::new("j", "Tofu", "2024-01-31T20:00:00Z").with_shelf_life(None, Some(28));

    let expiration = compute_expiration(&item, &policy).unwrap().unwrap();
    assert_eq!(
        expiration.at,
        zone.with_ymd_and_hms(2024, 2, 29, 5, 0, 0).unwrap()
    );
}

#[test]
fn out_of_range_offset_is_reported() {
    let item =
        GroceryItem::new("k", "Honey", "2024-01-01").with_shelf_life(None, Some(i64::MAX));

    let err = compute_expiration(&item, &utc_policy()).unwrap_err();
    assert!(matches!(err, ExpirationError::OutOfRange { ref id, .. } if id == "k"));
}

#[test]
fn wire_record_decodes_nullable_and_missing_fields() {
    let value = serde_json::json!({
        "id": "rec-1",
        "name": " Milk ",
        "min_days": null,
        "created_at": "2024-01-01T10:00:00.000Z"
    });

    let item: GroceryItem = serde_json::from_value(value).unwrap();
    assert_eq!(item.min_days, None);
    assert_eq!(item.max_days, None);
    assert_eq!(item.name, " Milk ");
    assert_eq!(compute_expiration(&item, &utc_policy()).unwrap(), None);
}

#[test]
fn iso_offset_variants_outside_rfc3339_are_accepted() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
    for raw in [
        "2024-01-01T10:00:00+0000",
        "2024-01-01 10:00:00+00",
        "2024-01-01T10:00Z",
        "2024-01-01T12:00:00.000+0200",
        "2024-01-01T05:00-05",
    ] {
        let item = GroceryItem::new("iso", "Eggs", raw).with_shelf_life(None, Some(1));
        let expiration = compute_expiration(&item, &utc_policy()).unwrap().unwrap();
        assert_eq!(expiration.at, expected, "created_at {raw}");
    }
}
