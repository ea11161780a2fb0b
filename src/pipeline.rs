//! Pipeline orchestration: fetch -> transcribe -> segment+summarize.
//!
//! The stages are strictly sequential (each depends on the previous stage's
//! output) and every exit path that leaves a downloaded audio file behind
//! must remove it before the run ends.

use crate::cache::{CacheEntry, ResultCache};
use crate::config::Config;
use crate::error::{Result, YtsumError};
use crate::fetch::{
    extract_video_id, is_valid_youtube_url, MediaFetcher, VideoMetadata, YtDlpFetcher,
};
use crate::segment::segment;
use crate::summarize::{BartClient, Summarizer};
use crate::transcribe::{Transcriber, WhisperClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Videos longer than this are rejected before any download.
pub const MAX_DURATION_SECS: u64 = 3600;

/// Fixed output file names for the downloadable artifacts.
pub const TRANSCRIPT_FILENAME: &str = "transcript.txt";
pub const SUMMARY_FILENAME: &str = "summary.txt";

/// A discrete progress checkpoint. Observational only: rendering is the
/// caller's concern and failures never flow through this channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineProgress {
    pub percent: u8,
    pub label: &'static str,
}

type ProgressFn = dyn Fn(PipelineProgress) + Send + Sync;

/// The engine handles shared across requests. Construction is expensive for
/// the real backends, so this is built once at startup and injected into the
/// orchestrator; there is no hidden global.
pub struct EngineRegistry {
    pub fetcher: Arc<dyn MediaFetcher>,
    pub transcriber: Arc<dyn Transcriber>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl EngineRegistry {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            fetcher,
            transcriber,
            summarizer,
        }
    }

    /// Build the production engines from configuration. The transcription
    /// model size comes from config, never a hardcoded default.
    pub fn from_config(config: &Config) -> Self {
        let mut transcriber = WhisperClient::new(config.openai_api_key.clone(), config.model_size);
        if let Some(ref url) = config.whisper_base_url {
            transcriber = transcriber.with_endpoint(url.clone());
        }

        let mut summarizer = BartClient::new(config.hf_api_token.clone());
        if let Some(ref url) = config.summarizer_url {
            summarizer = summarizer.with_endpoint(url.clone());
        }

        Self::new(
            Arc::new(YtDlpFetcher::new()),
            Arc::new(transcriber),
            Arc::new(summarizer),
        )
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Metadata is absent on a cache hit, where no fetch happens.
    pub metadata: Option<VideoMetadata>,
    pub transcript: String,
    pub summary: String,
    pub from_cache: bool,
}

/// Removes the audio artifact when dropped, unless cleanup already ran.
/// Backstop for panic unwinding; the happy and error paths call `cleanup`
/// explicitly right after transcription.
struct ArtifactGuard {
    path: Option<PathBuf>,
}

impl ArtifactGuard {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn cleanup(&mut self) {
        if let Some(path) = self.path.take() {
            remove_artifact(&path);
        }
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_artifact(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not delete temp audio file {}: {e}", path.display());
        } else {
            debug!("Deleted temp audio file {}", path.display());
        }
    }
}

/// Sequences the pipeline stages, owns the per-process result cache, and
/// reports coarse progress to an optional callback.
pub struct Orchestrator {
    engines: EngineRegistry,
    cache: ResultCache,
    max_chunk_size: usize,
    max_duration_secs: u64,
    work_dir: PathBuf,
    progress: Option<Box<ProgressFn>>,
}

impl Orchestrator {
    pub fn new(engines: EngineRegistry) -> Self {
        Self {
            engines,
            cache: ResultCache::new(),
            max_chunk_size: crate::segment::DEFAULT_MAX_CHUNK_SIZE,
            max_duration_secs: MAX_DURATION_SECS,
            work_dir: std::env::temp_dir().join("ytsum"),
            progress: None,
        }
    }

    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    pub fn with_max_duration(mut self, secs: u64) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Directory where downloaded audio lives for the duration of a run.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(PipelineProgress) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    fn report(&self, percent: u8, label: &'static str) {
        if let Some(ref callback) = self.progress {
            callback(PipelineProgress { percent, label });
        }
    }

    /// Run the full pipeline for one URL.
    ///
    /// A cached URL returns immediately without touching any engine. Invalid
    /// input never reaches the cache or an engine.
    pub async fn run(&self, url: &str) -> Result<PipelineRun> {
        if url.is_empty() || !is_valid_youtube_url(url) {
            return Err(YtsumError::InvalidUrl(url.to_string()));
        }

        if let Some(entry) = self.cache.get(url) {
            info!("Cache hit for {url}");
            return Ok(PipelineRun {
                metadata: None,
                transcript: entry.transcript,
                summary: entry.summary,
                from_cache: true,
            });
        }

        info!("Stage 1/4: Fetching metadata for {url}");
        let metadata = self.engines.fetcher.fetch_metadata(url).await.into_metadata();

        if metadata.duration_secs > self.max_duration_secs {
            return Err(YtsumError::VideoTooLong {
                duration_secs: metadata.duration_secs,
                limit_secs: self.max_duration_secs,
            });
        }

        let video_id = extract_video_id(url)?;

        info!("Stage 2/4: Downloading audio for {video_id}");
        self.report(0, "Downloading audio...");
        let artifact = self
            .engines
            .fetcher
            .fetch_audio(url, &video_id, &self.work_dir)
            .await?;

        info!("Stage 3/4: Transcribing audio");
        self.report(33, "Transcribing audio...");
        let mut guard = ArtifactGuard::new(artifact.path.clone());
        let transcribed = self.engines.transcriber.transcribe(&artifact).await;
        // The artifact never outlives this transition, on any outcome.
        guard.cleanup();

        let transcript = transcribed?;
        if transcript.is_blank() {
            return Err(YtsumError::EmptyTranscript);
        }

        info!("Stage 4/4: Summarizing transcript");
        self.report(66, "Summarizing transcript...");
        let chunks = segment(&transcript.text, self.max_chunk_size);
        debug!("Segmented transcript into {} chunks", chunks.len());

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            summaries.push(self.engines.summarizer.summarize_chunk(chunk).await?);
        }
        let summary = summaries.join(" ");

        self.report(100, "Done!");

        self.cache.insert(
            url.to_string(),
            CacheEntry {
                transcript: transcript.text.clone(),
                summary: summary.clone(),
            },
        );

        info!(
            "Pipeline complete: {} transcript chars, {} summary chars",
            transcript.text.len(),
            summary.len()
        );

        Ok(PipelineRun {
            metadata: Some(metadata),
            transcript: transcript.text,
            summary,
            from_cache: false,
        })
    }
}

/// Write the transcript and summary as UTF-8 text files with fixed names.
pub fn write_artifacts(run: &PipelineRun, output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)?;

    let transcript_path = output_dir.join(TRANSCRIPT_FILENAME);
    let summary_path = output_dir.join(SUMMARY_FILENAME);

    std::fs::write(&transcript_path, run.transcript.as_bytes())?;
    std::fs::write(&summary_path, run.summary.as_bytes())?;

    info!(
        "Wrote {} and {}",
        transcript_path.display(),
        summary_path.display()
    );

    Ok((transcript_path, summary_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abcdefghijk.mp3");
        std::fs::write(&path, b"audio").unwrap();

        {
            let _guard = ArtifactGuard::new(path.clone());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_guard_cleanup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abcdefghijk.mp3");
        std::fs::write(&path, b"audio").unwrap();

        let mut guard = ArtifactGuard::new(path.clone());
        guard.cleanup();
        assert!(!path.exists());
        // Second cleanup (and the drop) must be a no-op.
        guard.cleanup();
    }

    #[test]
    fn test_artifact_guard_tolerates_missing_file() {
        let mut guard = ArtifactGuard::new(PathBuf::from("/tmp/ytsum_never_existed.mp3"));
        guard.cleanup();
    }

    #[test]
    fn test_write_artifacts_fixed_names() {
        let dir = tempfile::tempdir().unwrap();
        let run = PipelineRun {
            metadata: None,
            transcript: "the transcript".to_string(),
            summary: "the summary".to_string(),
            from_cache: false,
        };

        let (t, s) = write_artifacts(&run, dir.path()).unwrap();
        assert_eq!(t, dir.path().join("transcript.txt"));
        assert_eq!(s, dir.path().join("summary.txt"));
        assert_eq!(std::fs::read_to_string(t).unwrap(), "the transcript");
        assert_eq!(std::fs::read_to_string(s).unwrap(), "the summary");
    }
}
