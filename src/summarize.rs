//! Abstractive summarization over the Hugging Face inference API.

use crate::error::{Result, YtsumError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default summarization endpoint (facebook/bart-large-cnn).
const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Default length bounds handed to the model, in tokens.
const DEFAULT_MAX_LENGTH: u32 = 150;
const DEFAULT_MIN_LENGTH: u32 = 40;

/// External collaborator condensing one text chunk. Each call is independent
/// and stateless; sampling is disabled, so outputs are deterministic.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize_chunk(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Client for a BART-style summarization HTTP API.
pub struct BartClient {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
    max_length: u32,
    min_length: u32,
}

impl BartClient {
    pub fn new(api_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_token,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }

    /// Point the client at a different inference endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the summary length bounds.
    pub fn with_lengths(mut self, max_length: u32, min_length: u32) -> Self {
        self.max_length = max_length;
        self.min_length = min_length;
        self
    }
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: SummarizeParameters,
}

#[derive(Serialize)]
struct SummarizeParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    summary_text: String,
}

#[async_trait]
impl Summarizer for BartClient {
    async fn summarize_chunk(&self, text: &str) -> Result<String> {
        debug!("Summarizing chunk of {} chars", text.len());

        let request = SummarizeRequest {
            inputs: text,
            parameters: SummarizeParameters {
                max_length: self.max_length,
                min_length: self.min_length,
                do_sample: false,
            },
        };

        let mut req = self.client.post(&self.endpoint).json(&request);
        if let Some(ref token) = self.api_token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let response = req
            .send()
            .await
            .map_err(|e| YtsumError::Summarization(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| YtsumError::Summarization(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(YtsumError::Summarization(format!(
                "API error ({status}): {body}"
            )));
        }

        let payloads: Vec<SummaryPayload> = serde_json::from_str(&body)
            .map_err(|e| YtsumError::Summarization(format!("unexpected response: {e}")))?;

        payloads
            .into_iter()
            .next()
            .map(|p| p.summary_text)
            .ok_or_else(|| YtsumError::Summarization("empty response".to_string()))
    }

    fn name(&self) -> &'static str {
        "bart-large-cnn"
    }
}
