use std::fs::{File, create_dir_all};
use std::sync::{Arc, Mutex};

use assistant_chat::app::App;
use assistant_chat::modules::assistant::AssistantClient;
use assistant_chat::util::config::AppConfig;
use assistant_chat::util::database::Database;
use assistant_chat::util::io::event::EventHandler;
use assistant_chat::util::log::{DEBUG_ENABLED, init_log_dir};
use assistant_chat::{log_error, log_info};
use color_eyre::eyre::WrapErr;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load().wrap_err("Failed to load configuration")?;

    let _ = DEBUG_ENABLED.set(std::env::var("DEBUG").is_ok_and(|v| v == "true"));
    init_log_dir(&config.log_dir);
    init_tracing(&config)?;
    log_info!("Starting assistant chat for '{}'", config.assistant_name);

    // Without a database the app still runs, it just forgets the theme
    let database = match Database::open(&config.database_path) {
        Ok(db) => Some(db),
        Err(e) => {
            log_error!("Failed to open preferences database: {}", e);
            None
        }
    };

    let client = AssistantClient::new(&config).wrap_err("Failed to build HTTP client")?;

    let terminal = ratatui::init();
    let app = App::new(config, Arc::new(client), database, EventHandler::new());
    let result = app.run(terminal).await;
    ratatui::restore();

    if let Err(e) = &result {
        log_error!("Exited with error: {}", e);
    }
    result
}

/// HTTP-level tracing goes to a file so it never draws over the UI.
fn init_tracing(config: &AppConfig) -> color_eyre::Result<()> {
    create_dir_all(&config.log_dir)?;
    let file = File::create(config.log_dir.join("trace.log"))?;
    let level = if *DEBUG_ENABLED.get().unwrap_or(&false) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
