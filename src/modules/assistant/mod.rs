// src/modules/assistant/mod.rs
//! The hosted assistant as seen from the chat UI: an existence check, a file
//! listing and a streaming chat call. Everything behind [`AssistantApi`] is a
//! black box.

pub mod client;

pub use client::AssistantClient;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::modules::chat::state::HistoryMessage;

/// Serialized chunks as they come off the wire, one JSON document each.
pub type ChunkStream = BoxStream<'static, Result<String>>;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantStatus {
    pub exists: bool,
    pub assistant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantFile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub updated_on: Option<String>,
    #[serde(default)]
    pub percent_done: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListing {
    pub status: String,
    #[serde(default)]
    pub files: Vec<AssistantFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileListing {
    pub fn success(files: Vec<AssistantFile>) -> Self {
        Self { status: STATUS_SUCCESS.to_string(), files, message: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: "error".to_string(), files: Vec::new(), message: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn check_assistant(&self) -> Result<AssistantStatus>;

    /// Transport failures are folded into a non-success listing.
    async fn list_files(&self) -> FileListing;

    /// Opens a chat turn. Fails before any chunk if the request is rejected;
    /// later failures arrive as an `Err` item in the stream.
    async fn chat(&self, history: Vec<HistoryMessage>) -> Result<ChunkStream>;
}
