//! Speech-to-text over an OpenAI-compatible transcription endpoint.

use crate::config::ModelSize;
use crate::error::{Result, YtsumError};
use crate::fetch::AudioArtifact;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

/// Default transcription endpoint (OpenAI-compatible servers expose the
/// same route, so a local whisper server drops in via `with_endpoint`).
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// A plain-text transcript. Whitespace-only text is treated as a failed run
/// by the orchestrator, never as a valid empty result.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub text: String,
}

impl TranscriptResult {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// External collaborator converting an audio artifact to plain text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &AudioArtifact) -> Result<TranscriptResult>;
    fn name(&self) -> &'static str;
}

/// Client for a whisper-style transcription HTTP API.
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model_size: ModelSize,
}

impl WhisperClient {
    /// Create a client for the given model size. The size is chosen by the
    /// caller (accuracy/latency trade-off) and threaded in here, never
    /// hardcoded.
    pub fn new(api_key: Option<String>, model_size: ModelSize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_size,
        }
    }

    /// Point the client at a different OpenAI-compatible server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model_size(&self) -> ModelSize {
        self.model_size
    }

    async fn build_form(&self, audio: &AudioArtifact) -> Result<Form> {
        let file_bytes = fs::read(&audio.path).await?;
        let file_name = audio
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let mime_type = match audio.path.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "audio/mpeg",
            Some("m4a") => "audio/mp4",
            Some("wav") => "audio/wav",
            Some("webm") => "audio/webm",
            _ => "application/octet-stream",
        };

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_type)?;

        Ok(Form::new()
            .part("file", file_part)
            .text("model", self.model_size.as_str())
            .text("response_format", "json"))
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio: &AudioArtifact) -> Result<TranscriptResult> {
        debug!(
            "Transcribing {} with model size {}",
            audio.path.display(),
            self.model_size
        );

        let form = self.build_form(audio).await?;

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| YtsumError::Transcription(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| YtsumError::Transcription(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(YtsumError::Transcription(format!(
                    "API error: {}",
                    api_error.error.message
                )));
            }
            return Err(YtsumError::Transcription(format!(
                "API error ({status}): {body}"
            )));
        }

        let parsed: WhisperResponse = serde_json::from_str(&body)
            .map_err(|e| YtsumError::Transcription(format!("unexpected response: {e}")))?;

        debug!("Transcription returned {} chars", parsed.text.len());

        Ok(TranscriptResult { text: parsed.text })
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WhisperClient::new(Some("sk-test".to_string()), ModelSize::Base);
        assert_eq!(client.name(), "whisper");
        assert_eq!(client.model_size(), ModelSize::Base);
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_with_endpoint() {
        let client = WhisperClient::new(None, ModelSize::Tiny)
            .with_endpoint("http://localhost:8000/v1/audio/transcriptions");
        assert_eq!(client.endpoint, "http://localhost:8000/v1/audio/transcriptions");
    }

    #[test]
    fn test_blank_detection() {
        assert!(TranscriptResult { text: String::new() }.is_blank());
        assert!(TranscriptResult { text: "  \n\t ".to_string() }.is_blank());
        assert!(!TranscriptResult { text: "hello".to_string() }.is_blank());
    }

    #[tokio::test]
    async fn test_transcribe_missing_file_fails() {
        let client = WhisperClient::new(None, ModelSize::Base);
        let artifact = AudioArtifact {
            path: "/tmp/ytsum_nonexistent_test.mp3".into(),
            video_id: "abcdefghijk".to_string(),
        };

        assert!(client.transcribe(&artifact).await.is_err());
    }
}
