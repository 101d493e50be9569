// src/util/database.rs
// Core database struct with connection management only

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct Database {
    pub(crate) app_conn: Arc<Mutex<Connection>>,
}

// Manual Debug implementation since Mutex<Connection> doesn't implement Debug
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("app_conn", &"Arc<Mutex<Connection>>")
            .finish()
    }
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                        Some(format!("Failed to create db directory: {}", e))
                    )
                })?;
            }
        }

        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Database {
            app_conn: Arc::new(Mutex::new(conn)),
        };

        db.init_all_schemas()?;

        Ok(db)
    }

    fn init_all_schemas(&self) -> Result<()> {
        use crate::modules::preferences::PreferencesDatabase;

        self.init_preferences_schema()?;

        Ok(())
    }

    /// A poisoned lock only means another thread panicked mid-statement;
    /// SQLite itself is still consistent, so keep going.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.app_conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
