//! HTTP implementation of the backend gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::json;
use tracing::debug;

use super::{BackendGateway, ChatReply, SaveSettingsReply, TranscribeReply};
use crate::audio::AudioBlob;
use crate::settings::{ModelList, Settings};
use crate::{NatterError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gateway speaking JSON and multipart over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway for the given base URL with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a gateway with an explicit request timeout.
    ///
    /// A timed-out request surfaces as a transport error, same as any
    /// other connection failure.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NatterError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse a response body as JSON.
    ///
    /// The backend reports logical failures as JSON `error` bodies with
    /// non-2xx status codes, so the status is not checked here; a body
    /// that is not JSON is a transport error.
    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        debug!(%status, "backend responded");
        response.json::<T>().await.map_err(NatterError::from)
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn send_text(&self, message: &str, language: &str) -> Result<ChatReply> {
        let body = json!({ "message": message, "language": language });
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn send_audio(&self, audio: AudioBlob, language: &str) -> Result<TranscribeReply> {
        let file_name = audio.file_name();
        let part = multipart::Part::bytes(audio.bytes)
            .file_name(file_name)
            .mime_str(&audio.mime_type)?;

        let mut form = multipart::Form::new().part("audio", part);
        if !language.is_empty() {
            form = form.text("language", language.to_string());
        }

        let response = self
            .client
            .post(self.url("/transcribe"))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_models(&self) -> Result<ModelList> {
        let response = self.client.get(self.url("/models")).send().await?;
        Self::read_json(response).await
    }

    async fn fetch_settings(&self) -> Result<Settings> {
        let response = self.client.get(self.url("/settings")).send().await?;
        Self::read_json(response).await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<SaveSettingsReply> {
        let response = self
            .client
            .post(self.url("/settings"))
            .json(settings)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
