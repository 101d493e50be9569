// src/modules/assistant/client.rs
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AssistantApi, AssistantFile, AssistantStatus, ChunkStream, FileListing};
use crate::error::{AssistantError, Result};
use crate::modules::chat::state::HistoryMessage;
use crate::util::config::AppConfig;
use crate::util::io::sse::data_stream;
use crate::{log_error, log_info};

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2025-01";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [HistoryMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct FilesResponse {
    #[serde(default)]
    files: Vec<AssistantFile>,
}

/// reqwest-backed client for a Pinecone-style assistant.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    api_key: String,
    assistant_name: String,
    control_url: String,
    data_url: String,
    request_timeout: Duration,
}

impl AssistantClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            assistant_name: config.assistant_name.clone(),
            control_url: config.control_url.trim_end_matches('/').to_string(),
            data_url: config.data_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    fn assistant_url(&self) -> String {
        format!("{}/assistant/assistants/{}", self.control_url, self.assistant_name)
    }

    fn files_url(&self) -> String {
        format!("{}/assistant/files/{}", self.data_url, self.assistant_name)
    }

    fn chat_url(&self) -> String {
        format!("{}/assistant/chat/{}/chat/completions", self.data_url, self.assistant_name)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .timeout(self.request_timeout)
    }

    async fn error_for_status(response: reqwest::Response) -> AssistantError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        AssistantError::StatusError { status, body }
    }

    async fn fetch_files(&self) -> Result<Vec<AssistantFile>> {
        let response = self.get(&self.files_url()).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }
        let parsed: FilesResponse = response.json().await?;
        Ok(parsed.files)
    }
}

#[async_trait]
impl AssistantApi for AssistantClient {
    async fn check_assistant(&self) -> Result<AssistantStatus> {
        if self.assistant_name.trim().is_empty() {
            return Ok(AssistantStatus { exists: false, assistant_name: String::new() });
        }

        let url = self.assistant_url();
        tracing::debug!(%url, "checking assistant");

        let response = self.get(&url).send().await?;
        let exists = match response.status() {
            status if status.is_success() => true,
            StatusCode::NOT_FOUND => false,
            _ => return Err(Self::error_for_status(response).await),
        };

        log_info!("Assistant '{}' exists: {}", self.assistant_name, exists);
        Ok(AssistantStatus { exists, assistant_name: self.assistant_name.clone() })
    }

    async fn list_files(&self) -> FileListing {
        match self.fetch_files().await {
            Ok(files) => FileListing::success(files),
            Err(e) => {
                log_error!("Error fetching files: {}", e);
                FileListing::error(e.to_string())
            }
        }
    }

    async fn chat(&self, history: Vec<HistoryMessage>) -> Result<ChunkStream> {
        let url = self.chat_url();
        tracing::debug!(%url, messages = history.len(), "opening chat stream");

        // No total timeout here: a long answer is still a healthy stream
        let response = self.http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&ChatRequest { messages: &history, stream: true })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        Ok(data_stream(Box::pin(response.bytes_stream())).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            api_key: "key".to_string(),
            assistant_name: "helper".to_string(),
            control_url: "https://control.example/".to_string(),
            data_url: "https://data.example".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_urls_are_built_from_config() {
        let client = AssistantClient::new(&config()).unwrap();

        assert_eq!(client.assistant_url(), "https://control.example/assistant/assistants/helper");
        assert_eq!(client.files_url(), "https://data.example/assistant/files/helper");
        assert_eq!(client.chat_url(), "https://data.example/assistant/chat/helper/chat/completions");
    }

    #[test]
    fn test_chat_request_body_shape() {
        let history = vec![HistoryMessage {
            role: crate::modules::chat::state::Role::User,
            content: "hola".to_string(),
        }];
        let body = serde_json::to_value(ChatRequest { messages: &history, stream: true }).unwrap();

        assert_eq!(body, serde_json::json!({
            "messages": [{"role": "user", "content": "hola"}],
            "stream": true
        }));
    }

    #[tokio::test]
    async fn test_missing_name_reports_absent_without_request() {
        let mut cfg = config();
        cfg.assistant_name = "  ".to_string();
        let client = AssistantClient::new(&cfg).unwrap();

        let status = client.check_assistant().await.unwrap();
        assert!(!status.exists);
    }
}
