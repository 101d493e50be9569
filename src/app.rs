use crate::modules::assistant::{AssistantApi, AssistantStatus};
use crate::modules::chat::{run_chat_turn, ChatSession, ChatUpdate};
use crate::modules::files::FilesState;
use crate::modules::preferences::PreferencesDatabase;
use crate::util::config::AppConfig;
use crate::util::database::Database;
use crate::util::io::event::{AppEvent, Event, EventHandler};
use crate::{log_error, log_info};
use color_eyre::Result;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use std::cell::Cell;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const MISSING_ASSISTANT_ERROR: &str = "Please create an Assistant";
pub const CONNECTION_ERROR: &str = "Error connecting to the Assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Waiting on the assistant existence check
    Connecting,
    Chat,
    /// Assistant missing or unreachable; shows remediation steps
    SetupError,
}

/// Application.
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current app mode/screen
    pub mode: AppMode,
    pub config: AppConfig,
    /// Transcript, input buffer and streaming flag
    pub session: ChatSession,
    pub files: FilesState,
    pub dark_mode: bool,
    /// Name reported by the existence check
    pub assistant_name: String,
    /// Text for the setup panel
    pub setup_error: Option<String>,
    /// Advances on ticks while something is loading
    pub spinner_frame: usize,
    /// Event handler.
    pub events: EventHandler,

    /// Furthest the transcript can scroll, measured at the last draw
    chat_max_scroll: Cell<usize>,
    database: Option<Database>,
    api: Arc<dyn AssistantApi>,
    chat_tx: mpsc::UnboundedSender<ChatUpdate>,
    chat_rx: mpsc::UnboundedReceiver<ChatUpdate>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("running", &self.running)
            .field("mode", &self.mode)
            .field("session", &self.session)
            .field("files", &self.files)
            .field("dark_mode", &self.dark_mode)
            .field("database", &self.database)
            .field("api", &"Arc<dyn AssistantApi>")
            .finish()
    }
}

impl App {
    /// Constructs a new instance of [`App`]. A missing preferences database
    /// only costs the dark-mode setting.
    pub fn new(
        config: AppConfig,
        api: Arc<dyn AssistantApi>,
        database: Option<Database>,
        events: EventHandler,
    ) -> Self {
        let dark_mode = match &database {
            Some(db) => db.load_dark_mode().unwrap_or_else(|e| {
                log_error!("Failed to read dark mode preference: {}", e);
                false
            }),
            None => false,
        };
        let (chat_tx, chat_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            mode: AppMode::Connecting,
            files: FilesState::new(config.show_assistant_files),
            config,
            session: ChatSession::new(),
            dark_mode,
            assistant_name: String::new(),
            setup_error: None,
            spinner_frame: 0,
            events,
            chat_max_scroll: Cell::new(usize::MAX),
            database,
            api,
            chat_tx,
            chat_rx,
        }
    }

    /// Kicks off the existence check and the file listing in the background.
    pub fn start(&self) {
        let sender = self.events.app_sender();
        let api = self.api.clone();
        tokio::spawn(async move {
            let result = api.check_assistant().await.map_err(|e| e.to_string());
            sender.send(AppEvent::AssistantChecked(result));
        });

        let sender = self.events.app_sender();
        let api = self.api.clone();
        tokio::spawn(async move {
            let listing = api.list_files().await;
            sender.send(AppEvent::FilesLoaded(listing));
        });
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.start();
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                needs_redraw = false;
            }

            tokio::select! {
                event = self.events.next() => {
                    match event? {
                        Event::Tick => {
                            needs_redraw = self.tick();
                        }
                        Event::Crossterm(event) => match event {
                            crossterm::event::Event::Key(key_event) => {
                                self.handle_key_events(key_event)?;
                                needs_redraw = true;
                            }
                            crossterm::event::Event::Resize(_, _) => needs_redraw = true,
                            _ => {}
                        },
                        Event::App(app_event) => {
                            self.handle_app_event(app_event);
                            needs_redraw = true;
                        }
                    }
                }
                update = self.chat_rx.recv() => {
                    if let Some(update) = update {
                        self.handle_chat_update(update);
                        needs_redraw = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        if key_event.kind == KeyEventKind::Release {
            return Ok(());
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            match key_event.code {
                KeyCode::Char('c' | 'C') => self.events.send(AppEvent::Quit),
                KeyCode::Char('d' | 'D') => self.events.send(AppEvent::ToggleDarkMode),
                _ => {}
            }
            return Ok(());
        }

        if self.mode != AppMode::Chat {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
                _ => {}
            }
            return Ok(());
        }

        match key_event.code {
            KeyCode::Esc => self.events.send(AppEvent::Quit),
            KeyCode::Enter => self.events.send(AppEvent::ChatSubmit),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(ch) => self.session.input_char(ch),
            KeyCode::F(2) => self.events.send(AppEvent::ToggleFiles),
            KeyCode::PageUp | KeyCode::Up => self.events.send(AppEvent::ScrollChatUp),
            KeyCode::PageDown | KeyCode::Down => self.events.send(AppEvent::ScrollChatDown),
            KeyCode::End => self.events.send(AppEvent::ScrollChatToBottom),
            _ => {}
        }
        Ok(())
    }

    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::ToggleDarkMode => self.toggle_dark_mode(),
            AppEvent::ToggleFiles => self.files.toggle_visible(),
            AppEvent::ChatSubmit => self.submit_chat_message(),
            AppEvent::ScrollChatUp => {
                self.session.scroll_up();
                self.session.clamp_scroll(self.chat_max_scroll.get());
            }
            AppEvent::ScrollChatDown => self.session.scroll_down(),
            AppEvent::ScrollChatToBottom => self.session.scroll_to_bottom(),
            AppEvent::AssistantChecked(result) => self.on_assistant_checked(result),
            AppEvent::FilesLoaded(listing) => self.files.record(listing),
        }
    }

    pub fn handle_chat_update(&mut self, update: ChatUpdate) {
        self.session.apply_update(update);
    }

    /// Handles the tick event of the terminal. Returns true when the spinner moved.
    pub fn tick(&mut self) -> bool {
        if self.mode == AppMode::Connecting || self.session.is_streaming() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            return true;
        }
        false
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Some(db) = &self.database {
            if let Err(e) = db.save_dark_mode(self.dark_mode) {
                log_error!("Failed to save dark mode preference: {}", e);
            }
        }
    }

    fn on_assistant_checked(&mut self, result: std::result::Result<AssistantStatus, String>) {
        match result {
            Ok(status) => {
                self.assistant_name = status.assistant_name;
                if status.exists {
                    log_info!("Connected to assistant '{}'", self.assistant_name);
                    self.mode = AppMode::Chat;
                    self.setup_error = None;
                } else {
                    self.mode = AppMode::SetupError;
                    self.setup_error = Some(MISSING_ASSISTANT_ERROR.to_string());
                }
            }
            Err(e) => {
                log_error!("Error connecting to the Assistant: {}", e);
                self.mode = AppMode::SetupError;
                self.setup_error = Some(CONNECTION_ERROR.to_string());
            }
        }
    }

    /// Starts a chat turn unless the input is blank or one is already running.
    pub fn submit_chat_message(&mut self) {
        if self.mode != AppMode::Chat {
            return;
        }
        let Some(history) = self.session.submit() else {
            return;
        };

        let api = self.api.clone();
        let updates = self.chat_tx.clone();
        tokio::spawn(run_chat_turn(api, history, updates));
    }

    /// Waits for the next update from the running turn. Used by tests that
    /// drive the App without a terminal.
    pub async fn next_chat_update(&mut self) -> Option<ChatUpdate> {
        self.chat_rx.recv().await
    }

    pub fn record_chat_max_scroll(&self, max_offset: usize) {
        self.chat_max_scroll.set(max_offset);
    }

    pub fn show_citations(&self) -> bool {
        self.config.show_citations
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::error::{AssistantError, Result as AssistantResult};
    use crate::modules::assistant::{ChunkStream, FileListing};
    use crate::modules::chat::HistoryMessage;
    use async_trait::async_trait;
    use futures::StreamExt;

    /// Answers every chat with the given chunks and reports the assistant as present.
    pub struct ScriptedApi {
        pub exists: bool,
        pub chunks: Vec<AssistantResult<String>>,
    }

    #[async_trait]
    impl AssistantApi for ScriptedApi {
        async fn check_assistant(&self) -> AssistantResult<AssistantStatus> {
            Ok(AssistantStatus { exists: self.exists, assistant_name: "docs-bot".to_string() })
        }

        async fn list_files(&self) -> FileListing {
            FileListing::success(Vec::new())
        }

        async fn chat(&self, _history: Vec<HistoryMessage>) -> AssistantResult<ChunkStream> {
            let chunks: Vec<AssistantResult<String>> = self
                .chunks
                .iter()
                .map(|c| match c {
                    Ok(s) => Ok(s.clone()),
                    Err(e) => Err(AssistantError::StreamError(e.to_string())),
                })
                .collect();
            Ok(futures::stream::iter(chunks).boxed())
        }
    }

    pub fn delta(text: &str) -> AssistantResult<String> {
        Ok(serde_json::json!({"choices": [{"delta": {"content": text}}]}).to_string())
    }

    pub fn app_with(api: ScriptedApi) -> App {
        App::new(AppConfig::default(), Arc::new(api), None, EventHandler::detached())
    }

    pub fn test_app() -> App {
        app_with(ScriptedApi { exists: true, chunks: Vec::new() })
    }
}
