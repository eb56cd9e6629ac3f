use crate::error::Result;
use iemono_core::store::{decode_items, decode_settings};
use iemono_core::{Item, ItemStore, Settings, SettingsStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key holding the JSON item array
pub const ITEMS_KEY: &str = "iemono-items";
/// Key holding the JSON settings object
pub const SETTINGS_KEY: &str = "iemono-settings";

/// Key-value store on top of SQLite
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Atomic writes, so a crash mid-save doesn't leave half an item list
/// - Doesn't require a separate process
///
/// Values are opaque strings; the item list and settings are stored as
/// JSON under their own keys and always replaced wholesale.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;
        tracing::debug!("Opened store at {}", path.display());

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Wipe everything, items and settings alike
    pub fn clear(&self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM kv", [])?;
        tracing::info!("Cleared store ({} keys)", removed);
        Ok(())
    }

    /// Read a key, treating a failed read as absent
    fn read_or_log(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read '{}' from store: {}", key, e);
                None
            }
        }
    }
}

impl ItemStore for LocalStore {
    fn load_items(&self) -> Vec<Item> {
        decode_items(self.read_or_log(ITEMS_KEY).as_deref())
    }

    fn save_items(&self, items: &[Item]) -> iemono_core::Result<()> {
        let raw = serde_json::to_string(items)?;
        self.set(ITEMS_KEY, &raw)?;
        tracing::debug!("Saved {} items", items.len());
        Ok(())
    }
}

impl SettingsStore for LocalStore {
    fn load_settings(&self) -> Settings {
        decode_settings(self.read_or_log(SETTINGS_KEY).as_deref())
    }

    fn save_settings(&self, settings: &Settings) -> iemono_core::Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.set(SETTINGS_KEY, &raw)?;
        Ok(())
    }
}
