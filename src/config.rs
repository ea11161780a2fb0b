use crate::error::{Result, YtsumError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whisper model size. Larger models are more accurate and slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    #[default]
    Base,
    Medium,
    Large,
}

impl ModelSize {
    /// Model name sent to an OpenAI-compatible transcription server.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            _ => Err(format!(
                "Unknown model size: {}. Use 'tiny', 'base', 'medium', or 'large'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI-compatible transcription endpoint key.
    pub openai_api_key: Option<String>,
    /// Hugging Face inference API token for the summarization model.
    pub hf_api_token: Option<String>,
    /// Transcription endpoint base URL (None uses the OpenAI default).
    pub whisper_base_url: Option<String>,
    /// Summarization endpoint URL (None uses the Hugging Face default).
    pub summarizer_url: Option<String>,
    /// Feedback collection endpoint.
    pub feedback_url: Option<String>,
    pub model_size: ModelSize,
    pub max_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            hf_api_token: None,
            whisper_base_url: None,
            summarizer_url: None,
            feedback_url: None,
            model_size: ModelSize::default(),
            max_chunk_size: crate::segment::DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            config.hf_api_token = Some(token);
        }
        if let Ok(url) = std::env::var("YTSUM_WHISPER_URL") {
            config.whisper_base_url = Some(url);
        }
        if let Ok(url) = std::env::var("YTSUM_SUMMARIZER_URL") {
            config.summarizer_url = Some(url);
        }
        if let Ok(url) = std::env::var("YTSUM_FEEDBACK_URL") {
            config.feedback_url = Some(url);
        }
        if let Ok(size) = std::env::var("YTSUM_MODEL_SIZE") {
            if let Ok(s) = size.parse() {
                config.model_size = s;
            }
        }
        if let Ok(chunk) = std::env::var("YTSUM_MAX_CHUNK_SIZE") {
            if let Ok(c) = chunk.parse() {
                config.max_chunk_size = c;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_none() && self.whisper_base_url.is_none() {
            return Err(YtsumError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-... \
                 (or point YTSUM_WHISPER_URL at a local transcription server)"
                    .to_string(),
            ));
        }

        if self.hf_api_token.is_none() && self.summarizer_url.is_none() {
            return Err(YtsumError::Config(
                "HF_API_TOKEN not set. Get one at https://huggingface.co/settings/tokens"
                    .to_string(),
            ));
        }

        if self.max_chunk_size == 0 {
            return Err(YtsumError::Config(
                "Chunk size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ytsum").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_size_parsing() {
        assert_eq!("tiny".parse::<ModelSize>().unwrap(), ModelSize::Tiny);
        assert_eq!("base".parse::<ModelSize>().unwrap(), ModelSize::Base);
        assert_eq!("MEDIUM".parse::<ModelSize>().unwrap(), ModelSize::Medium);
        assert_eq!("large".parse::<ModelSize>().unwrap(), ModelSize::Large);
        assert!("huge".parse::<ModelSize>().is_err());
    }

    #[test]
    fn test_model_size_display() {
        assert_eq!(ModelSize::Tiny.to_string(), "tiny");
        assert_eq!(ModelSize::Large.to_string(), "large");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model_size, ModelSize::Base);
        assert_eq!(config.max_chunk_size, 1000);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_validate_missing_keys() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_with_keys() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            hf_api_token: Some("hf-test".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_chunk_size() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            hf_api_token: Some("hf-test".to_string()),
            max_chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_local_endpoints_need_no_keys() {
        let config = Config {
            whisper_base_url: Some("http://localhost:8000".to_string()),
            summarizer_url: Some("http://localhost:8001/summarize".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
