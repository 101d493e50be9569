pub mod assistant;
pub mod chat;
pub mod files;
pub mod preferences;
