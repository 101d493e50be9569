// src/modules/chat/consumer.rs
//! Drains a chunk stream into the trailing assistant message.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::chunk::parse_delta;
use super::references::extract_references;
use super::state::{HistoryMessage, Reference, TranscriptIntent};
use crate::error::AssistantError;
use crate::modules::assistant::AssistantApi;
use crate::{log_debug, log_error, log_warn};

/// Whatever holds the transcript the consumer writes into.
pub trait TranscriptSink {
    fn update_last_assistant_content(&mut self, content: &str);
    fn attach_references(&mut self, references: Vec<Reference>);
}

/// Messages from a running chat turn back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatUpdate {
    Intent(TranscriptIntent),
    /// The turn is over. `Err` carries a diagnostic, not user-facing text.
    Finished(Result<(), String>),
}

impl TranscriptSink for mpsc::UnboundedSender<ChatUpdate> {
    fn update_last_assistant_content(&mut self, content: &str) {
        // A closed receiver means the app is shutting down
        let _ = self.send(ChatUpdate::Intent(TranscriptIntent::UpdateLastAssistantContent(
            content.to_string(),
        )));
    }

    fn attach_references(&mut self, references: Vec<Reference>) {
        let _ = self.send(ChatUpdate::Intent(TranscriptIntent::AttachReferences(references)));
    }
}

#[derive(Debug, Default)]
pub struct StreamConsumer {
    accumulator: String,
    chunks_seen: usize,
    malformed_chunks: usize,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.accumulator
    }

    pub fn malformed_chunks(&self) -> usize {
        self.malformed_chunks
    }

    /// One step of the drain loop. The sink is updated even when the chunk
    /// is dropped, so the view always mirrors the accumulator.
    pub fn push_chunk<K: TranscriptSink + ?Sized>(&mut self, chunk: &str, sink: &mut K) {
        self.chunks_seen += 1;

        match parse_delta(chunk) {
            Ok(Some(delta)) => self.accumulator.push_str(&delta),
            Ok(None) => {}
            Err(e) => {
                self.malformed_chunks += 1;
                log_warn!("Error parsing chunk {}: {}", self.chunks_seen, e);
            }
        }

        sink.update_last_assistant_content(&self.accumulator);
    }

    /// Runs reference extraction over the final text and closes the message.
    pub fn finish<K: TranscriptSink + ?Sized>(self, sink: &mut K) -> String {
        let references = extract_references(&self.accumulator);
        log_debug!(
            "Stream finished: {} chunks, {} malformed, {} references",
            self.chunks_seen, self.malformed_chunks, references.len()
        );
        sink.attach_references(references);
        self.accumulator
    }

    /// Drains `stream` in order. An `Err` item aborts the loop and leaves the
    /// transcript with whatever was accumulated so far; references are only
    /// attached when the stream runs out cleanly.
    pub async fn drain<S, K>(mut self, stream: S, sink: &mut K) -> Result<String, AssistantError>
    where
        S: Stream<Item = Result<String, AssistantError>>,
        K: TranscriptSink + ?Sized,
    {
        let mut stream = std::pin::pin!(stream);

        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => self.push_chunk(&chunk, &mut *sink),
                Err(e) => {
                    log_error!("Chat stream aborted after {} chunks: {}", self.chunks_seen, e);
                    return Err(e);
                }
            }
        }

        Ok(self.finish(&mut *sink))
    }
}

/// One full chat turn: open the stream, drain it, report completion. Every
/// outcome ends with exactly one `ChatUpdate::Finished`.
pub async fn run_chat_turn(
    api: Arc<dyn AssistantApi>,
    history: Vec<HistoryMessage>,
    mut updates: mpsc::UnboundedSender<ChatUpdate>,
) {
    let outcome = match api.chat(history).await {
        Ok(stream) => StreamConsumer::new()
            .drain(stream, &mut updates)
            .await
            .map(|_| ()),
        Err(e) => {
            log_error!("Error in chat: {}", e);
            Err(e)
        }
    };

    let _ = updates.send(ChatUpdate::Finished(outcome.map_err(|e| e.to_string())));
}
