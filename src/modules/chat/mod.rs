// src/modules/chat/mod.rs
//! Transcript, stream consumer and the session state the chat screen renders.

pub mod chunk;
pub mod consumer;
pub mod references;
pub mod session;
pub mod state;

pub use consumer::{run_chat_turn, ChatUpdate, StreamConsumer, TranscriptSink};
pub use references::extract_references;
pub use session::{ChatSession, GENERIC_CHAT_ERROR};
pub use state::{HistoryMessage, Message, Reference, Role, TranscriptIntent, TranscriptState};
