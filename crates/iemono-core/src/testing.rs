// Shared fixtures for the unit tests
use crate::models::{Category, Item, Location, DEFAULT_UNIT};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// An item expiring `offset` days from `today()`, no per-item threshold
pub(crate) fn item(name: &str, category: Category, location: Location, offset: Option<i64>) -> Item {
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    Item {
        id: format!("id-{}", name),
        name: name.to_string(),
        category,
        location,
        quantity: 1,
        unit: DEFAULT_UNIT.to_string(),
        expiry_date: offset.map(|d| today() + Duration::days(d)),
        alert_days: None,
        memo: None,
        created_at: created,
        updated_at: created,
    }
}
