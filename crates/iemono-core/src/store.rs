use crate::models::{Item, Settings};
use serde_json::{Map, Value};
use std::cell::RefCell;

/// Durable home of the item collection
///
/// `load` never fails: a missing or corrupt collection comes back empty and
/// the problem is logged. Saves replace the whole list (last write wins).
#[cfg_attr(test, mockall::automock)]
pub trait ItemStore {
    fn load_items(&self) -> Vec<Item>;
    fn save_items(&self, items: &[Item]) -> crate::Result<()>;
}

/// Durable home of the settings object
///
/// `load` merges whatever is stored over `Settings::default()`, and falls
/// back to the defaults entirely when the stored value can't be read.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore {
    fn load_settings(&self) -> Settings;
    fn save_settings(&self, settings: &Settings) -> crate::Result<()>;
}

/// In-memory store, handy for tests and throwaway sessions
///
/// Holds the serialized JSON just like the durable stores do, so what
/// comes back out has been through the same round trip.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<Option<String>>,
    settings: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw stored text, for exercising the corrupt-data paths
    pub fn with_raw(items: Option<&str>, settings: Option<&str>) -> Self {
        Self {
            items: RefCell::new(items.map(str::to_string)),
            settings: RefCell::new(settings.map(str::to_string)),
        }
    }
}

impl ItemStore for MemoryStore {
    fn load_items(&self) -> Vec<Item> {
        decode_items(self.items.borrow().as_deref())
    }

    fn save_items(&self, items: &[Item]) -> crate::Result<()> {
        *self.items.borrow_mut() = Some(serde_json::to_string(items)?);
        Ok(())
    }
}

impl SettingsStore for MemoryStore {
    fn load_settings(&self) -> Settings {
        decode_settings(self.settings.borrow().as_deref())
    }

    fn save_settings(&self, settings: &Settings) -> crate::Result<()> {
        *self.settings.borrow_mut() = Some(serde_json::to_string(settings)?);
        Ok(())
    }
}

/// Parse a stored item array, empty on absence or corruption
pub fn decode_items(raw: Option<&str>) -> Vec<Item> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Stored item list is unreadable, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Parse a stored settings object, defaults on absence or corruption
///
/// Keys are merged one at a time over `Settings::default()`, so a single
/// value this build can't read only costs that one setting.
pub fn decode_settings(raw: Option<&str>) -> Settings {
    let Some(raw) = raw else {
        return Settings::default();
    };

    let stored: Map<String, Value> = match serde_json::from_str(raw) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("Stored settings are unreadable, using defaults: {}", e);
            return Settings::default();
        }
    };

    let mut settings = Settings::default();
    for (key, value) in stored {
        let mut candidate = match serde_json::to_value(&settings) {
            Ok(Value::Object(map)) => map,
            _ => break,
        };
        candidate.insert(key.clone(), value);

        match serde_json::from_value::<Settings>(Value::Object(candidate)) {
            Ok(merged) => settings = merged,
            Err(e) => tracing::warn!("Ignoring stored setting '{}': {}", key, e),
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Location, Theme};
    use crate::testing::item;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load_items().is_empty());
        assert_eq!(store.load_settings(), Settings::default());

        let items = vec![item("milk", Category::Food, Location::Fridge, Some(2))];
        store.save_items(&items).unwrap();
        assert_eq!(store.load_items(), items);

        let settings = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn test_corrupt_data_falls_back() {
        let store = MemoryStore::with_raw(Some("[{\"id\": oops"), Some("not json"));
        assert!(store.load_items().is_empty());
        assert_eq!(store.load_settings(), Settings::default());
    }

    #[test]
    fn test_partial_settings_merge() {
        let store = MemoryStore::with_raw(None, Some(r#"{"defaultAlertDays": 7}"#));
        let settings = store.load_settings();
        assert_eq!(settings.default_alert_days, 7);
        assert!(settings.show_expired);
    }

    #[test]
    fn test_unreadable_setting_keeps_the_others() {
        let settings = decode_settings(Some(
            r#"{"defaultAlertDays": 7, "showExpired": false, "theme": "sepia"}"#,
        ));
        assert_eq!(settings.default_alert_days, 7);
        assert!(!settings.show_expired);
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_settings_not_an_object_fall_back() {
        assert_eq!(decode_settings(Some("[]")), Settings::default());
        assert_eq!(decode_settings(Some("3")), Settings::default());
    }
}
