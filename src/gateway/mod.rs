//! Backend gateway
//!
//! The five calls the client makes against its backend, as a trait so the
//! session can be driven against stubs in tests. `http` holds the real
//! implementation.

pub mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde::Deserialize;

use crate::audio::AudioBlob;
use crate::settings::{ModelList, Settings};
use crate::Result;

/// Reply to a text chat request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    /// AI response text
    #[serde(default)]
    pub ai_response: Option<String>,

    /// Older backends reply with this field instead
    #[serde(default, rename = "response")]
    pub legacy_response: Option<String>,

    /// Backend-reported failure detail
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// The response text, preferring the current field over the legacy one
    pub fn message(&self) -> Option<&str> {
        self.ai_response
            .as_deref()
            .or(self.legacy_response.as_deref())
    }
}

/// Reply to an audio upload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscribeReply {
    /// What the user said
    #[serde(default)]
    pub text: Option<String>,

    /// AI response to the transcription, when the backend generated one
    #[serde(default)]
    pub ai_response: Option<String>,

    /// Backend-reported failure detail
    #[serde(default)]
    pub error: Option<String>,
}

impl TranscribeReply {
    /// Non-empty transcription text, if the upload produced one
    pub fn transcription(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Reply to a settings save
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSettingsReply {
    #[serde(default)]
    pub success: bool,

    /// Canonical settings as stored, echoed back on success
    #[serde(default)]
    pub settings: Option<Settings>,

    /// Backend-reported failure detail
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend operations the client depends on
///
/// `language` is the selector code; empty means auto-detect.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send a typed message for an AI response
    async fn send_text(&self, message: &str, language: &str) -> Result<ChatReply>;

    /// Upload a finished recording for transcription (and usually a response)
    async fn send_audio(&self, audio: AudioBlob, language: &str) -> Result<TranscribeReply>;

    /// Fetch the available models
    async fn list_models(&self) -> Result<ModelList>;

    /// Fetch the stored settings
    async fn fetch_settings(&self) -> Result<Settings>;

    /// Persist model selections
    async fn save_settings(&self, settings: &Settings) -> Result<SaveSettingsReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_prefers_current_field() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"ai_response": "new", "response": "old"}"#).unwrap();
        assert_eq!(reply.message(), Some("new"));
    }

    #[test]
    fn test_chat_reply_falls_back_to_legacy_field() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "old"}"#).unwrap();
        assert_eq!(reply.message(), Some("old"));
    }

    #[test]
    fn test_chat_reply_error_body_has_no_message() {
        let reply: ChatReply = serde_json::from_str(r#"{"error": "no message"}"#).unwrap();
        assert_eq!(reply.message(), None);
        assert_eq!(reply.error.as_deref(), Some("no message"));
    }

    #[test]
    fn test_transcribe_reply_filters_empty_text() {
        let empty: TranscribeReply = serde_json::from_str(r#"{"text": ""}"#).unwrap();
        assert_eq!(empty.transcription(), None);

        let spoken: TranscribeReply =
            serde_json::from_str(r#"{"text": "hello", "ai_response": "hi"}"#).unwrap();
        assert_eq!(spoken.transcription(), Some("hello"));
        assert_eq!(spoken.ai_response.as_deref(), Some("hi"));
    }

    #[test]
    fn test_save_reply_parses_echoed_settings() {
        let reply: SaveSettingsReply = serde_json::from_str(
            r#"{"success": true, "settings": {"transcription_model": "whisper-1", "response_model": "gpt-4o"}}"#,
        )
        .unwrap();
        assert!(reply.success);
        assert_eq!(
            reply.settings.as_ref().map(|s| s.transcription_model.as_str()),
            Some("whisper-1")
        );
    }

    #[test]
    fn test_save_reply_defaults_to_failure() {
        let reply: SaveSettingsReply = serde_json::from_str(r#"{"error": "rejected"}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.settings.is_none());
    }
}
