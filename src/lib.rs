pub mod app;
pub mod error;
pub mod modules;
pub mod ui;
pub mod util;

pub use app::{App, AppMode};
pub use error::{AssistantError, ConfigError, Result};
