// src/util/log.rs

//! File-based logging. The terminal belongs to the chat UI, so nothing here
//! ever writes to stdout or stderr.
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::{LazyLock, OnceLock};
use chrono::Local;

pub static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Directory chosen at startup. Must be set before the first log line.
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Global logger instance
pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| {
    let dir = LOG_DIR.get().cloned().unwrap_or_else(|| PathBuf::from("./logs"));
    Logger::new(&dir).unwrap_or_else(|_| Logger::disabled(dir))
});

/// Points the global logger at `dir`. Returns false if the logger was
/// already configured or already in use.
pub fn init_log_dir(dir: impl Into<PathBuf>) -> bool {
    LOG_DIR.set(dir.into()).is_ok()
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn filename(&self) -> &str {
        match self {
            LogLevel::Error => "error.log",
            LogLevel::Warn => "warn.log",
            LogLevel::Info => "info.log",
            LogLevel::Debug => "debug.log",
        }
    }
}

/// Logger that writes to separate files by severity
pub struct Logger {
    log_dir: PathBuf,
    files: Option<[Mutex<File>; 4]>,
}

impl Logger {
    /// Create a new logger writing into `log_dir`
    pub fn new(log_dir: &Path) -> std::io::Result<Self> {
        DEBUG_ENABLED.get_or_init(|| {
            std::env::var("DEBUG").unwrap_or_default() == "true"
        });

        create_dir_all(log_dir)?;

        // Start fresh each session, like the transcript itself
        let open = |level: LogLevel| File::create(log_dir.join(level.filename())).map(Mutex::new);

        Ok(Self {
            log_dir: log_dir.to_path_buf(),
            files: Some([
                open(LogLevel::Error)?,
                open(LogLevel::Warn)?,
                open(LogLevel::Info)?,
                open(LogLevel::Debug)?,
            ]),
        })
    }

    /// A logger that drops every line. Used when the log directory is unwritable.
    pub fn disabled(log_dir: PathBuf) -> Self {
        Self { log_dir, files: None }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn write_log(&self, level: LogLevel, message: &str) {
        let Some(files) = &self.files else {
            return;
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{}] [{}] {}\n", timestamp, level.as_str(), message);

        let file = match level {
            LogLevel::Error => &files[0],
            LogLevel::Warn => &files[1],
            LogLevel::Info => &files[2],
            LogLevel::Debug => &files[3],
        };

        if let Ok(mut file) = file.lock() {
            let _ = file.write_all(formatted.as_bytes());
            let _ = file.flush();
        }
    }

    pub fn error(&self, message: &str) {
        self.write_log(LogLevel::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.write_log(LogLevel::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.write_log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.write_log(LogLevel::Debug, message);
    }
}

/// Convenience macro for error logging with formatting
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::LOGGER.error(&message);
    }};
}

/// Convenience macro for warning logging with formatting
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::LOGGER.warn(&message);
    }};
}

/// Convenience macro for info logging with formatting
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::LOGGER.info(&message);
    }};
}

/// Convenience macro for debug logging with formatting
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if *$crate::util::log::DEBUG_ENABLED.get().unwrap_or(&false) {
            let message = format!($($arg)*);
            $crate::util::log::LOGGER.debug(&message);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logger_creates_one_file_per_level() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let logger = Logger::new(temp_dir.path()).expect("Failed to create logger");

        logger.error("Test error");
        logger.warn("Test warning");
        logger.info("Test info");
        logger.debug("Test debug");

        for name in ["error.log", "warn.log", "info.log", "debug.log"] {
            assert!(temp_dir.path().join(name).exists(), "{} missing", name);
        }

        let warn = fs::read_to_string(temp_dir.path().join("warn.log")).unwrap();
        assert!(warn.contains("[WARN] Test warning"));
        assert!(!warn.contains("Test error"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let logger = Logger::disabled(temp_dir.path().join("nowhere"));

        logger.error("dropped");

        assert!(!temp_dir.path().join("nowhere").exists());
    }
}
