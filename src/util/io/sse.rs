// src/util/io/sse.rs
//! Server-sent-events framing for the streaming chat endpoint.
//!
//! Only `data:` lines matter; each one carries a single serialized chunk.
//! `[DONE]` and end-of-body both end the sequence.

use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;

use crate::error::AssistantError;
use crate::log_debug;

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    Done,
}

/// Incremental line splitter. Bytes are buffered until a full line arrives
/// so multi-byte characters split across network reads survive intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            if let Some(frame) = Self::parse_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flushes a trailing line that never got its newline.
    pub fn finish(&mut self) -> Vec<SseFrame> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let line_bytes = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&line_bytes);
        Self::parse_line(&line).into_iter().collect()
    }

    fn parse_line(line: &str) -> Option<SseFrame> {
        let line = line.trim_end_matches(['\n', '\r']);
        let data = line.strip_prefix("data:")?;
        let data = data.strip_prefix(' ').unwrap_or(data);

        if data.trim() == DONE_MARKER {
            Some(SseFrame::Done)
        } else if data.is_empty() {
            None
        } else {
            Some(SseFrame::Data(data.to_string()))
        }
    }
}

struct DataStreamState<S> {
    inner: S,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> DataStreamState<S> {
    fn enqueue(&mut self, frames: Vec<SseFrame>) {
        for frame in frames {
            match frame {
                SseFrame::Data(data) => self.pending.push_back(data),
                SseFrame::Done => {
                    log_debug!("SSE stream signalled done");
                    self.finished = true;
                    break;
                }
            }
        }
    }
}

/// Turns a raw byte stream into the sequence of `data:` payloads. A transport
/// error is yielded once and ends the sequence.
pub fn data_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, AssistantError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<AssistantError> + Send + 'static,
{
    let state = DataStreamState {
        inner: bytes,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.pending.pop_front() {
                return Some((Ok(chunk), state));
            }
            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(bytes)) => {
                    let frames = state.decoder.push(bytes.as_ref());
                    state.enqueue(frames);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.clear();
                    return Some((Err(e.into()), state));
                }
                None => {
                    let frames = state.decoder.finish();
                    state.enqueue(frames);
                    state.finished = true;
                }
            }
        }
    })
}
