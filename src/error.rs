use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtsumError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Video is too long: {duration_secs}s exceeds the {limit_secs}s limit")]
    VideoTooLong { duration_secs: u64, limit_secs: u64 },

    #[error("Audio download failed: {0}")]
    Download(String),

    #[error("No downloaded audio file found for base name: {0}")]
    FileNotFoundAfterDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcription returned an empty result")]
    EmptyTranscript,

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Feedback submission failed: {0}")]
    Feedback(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YtsumError>;
