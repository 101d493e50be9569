// src/modules/preferences.rs
// Persisted client preferences (key/value), currently just the dark-mode flag

use rusqlite::{params, OptionalExtension, Result};

use crate::util::database::Database;

/// Fixed key the dark-mode flag is stored under.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Trait to add preference storage to Database
pub trait PreferencesDatabase {
    fn init_preferences_schema(&self) -> Result<()>;
    fn get_preference(&self, key: &str) -> Result<Option<String>>;
    fn set_preference(&self, key: &str, value: &str) -> Result<()>;

    /// Missing or unparsable values read as light mode.
    fn load_dark_mode(&self) -> Result<bool> {
        Ok(self.get_preference(DARK_MODE_KEY)?.as_deref() == Some("true"))
    }

    fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set_preference(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }
}

impl PreferencesDatabase for Database {
    fn init_preferences_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = chrono::Utc::now().timestamp();

        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, updated_at],
        )?;
        Ok(())
    }
}
