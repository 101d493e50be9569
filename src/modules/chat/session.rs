// src/modules/chat/session.rs
use super::consumer::{ChatUpdate, TranscriptSink};
use super::state::{
    HistoryMessage, Reference, TranscriptEvent, TranscriptIntent, TranscriptState,
    TranscriptStateMachine,
};
use crate::{log_debug, log_error};

pub const GENERIC_CHAT_ERROR: &str = "An error occurred while chatting.";

/// Everything the chat screen needs, owned by the App and handed to the
/// renderer by reference.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: TranscriptState,
    input: String,
    is_streaming: bool,
    error: Option<String>,
    referenced_files: Vec<Reference>,
    /// Lines scrolled up from the bottom of the transcript; 0 follows new text.
    scroll_offset: usize,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn referenced_files(&self) -> &[Reference] {
        &self.referenced_files
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    // The input field is disabled while a reply streams in

    pub fn input_char(&mut self, ch: char) {
        if !self.is_streaming {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_streaming {
            self.input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Starts a turn from the input buffer. Returns the history to send, or
    /// `None` without touching anything when the input is blank or a reply is
    /// still streaming.
    pub fn submit(&mut self) -> Option<Vec<HistoryMessage>> {
        if self.input.trim().is_empty() {
            return None;
        }
        if self.is_streaming {
            log_debug!("Submit ignored: stream still active");
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.is_streaming = true;
        self.error = None;
        self.referenced_files.clear();
        self.scroll_offset = 0;

        self.apply(TranscriptIntent::AppendUserMessage(text));
        self.apply(TranscriptIntent::AppendAssistantPlaceholder);

        Some(self.transcript.history())
    }

    pub fn apply(&mut self, intent: TranscriptIntent) -> Vec<TranscriptEvent> {
        let state = std::mem::take(&mut self.transcript);
        let (state, events) = TranscriptStateMachine::transition(state, intent);
        self.transcript = state;

        for event in &events {
            if let TranscriptEvent::ReferencesAttached { references, .. } = event {
                self.referenced_files = references.clone();
            }
        }

        events
    }

    /// Routes an update from the running turn. Returns true once the turn is over.
    pub fn apply_update(&mut self, update: ChatUpdate) -> bool {
        match update {
            ChatUpdate::Intent(intent) => {
                self.apply(intent);
                false
            }
            ChatUpdate::Finished(result) => {
                self.finish_stream(result);
                true
            }
        }
    }

    pub fn finish_stream(&mut self, result: Result<(), String>) {
        self.is_streaming = false;

        if let Err(e) = result {
            log_error!("Error in chat: {}", e);
            self.error = Some(GENERIC_CHAT_ERROR.to_string());
        }

        // Normally already closed by the reference step; a failed turn is not
        self.apply(TranscriptIntent::CloseOpenMessage);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Keeps the offset inside what the view can actually scroll.
    pub fn clamp_scroll(&mut self, max_offset: usize) {
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

impl TranscriptSink for ChatSession {
    fn update_last_assistant_content(&mut self, content: &str) {
        self.apply(TranscriptIntent::UpdateLastAssistantContent(content.to_string()));
    }

    fn attach_references(&mut self, references: Vec<Reference>) {
        self.apply(TranscriptIntent::AttachReferences(references));
    }
}
