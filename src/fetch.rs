//! Video metadata and audio retrieval backed by yt-dlp.
//!
//! yt-dlp already tracks YouTube's moving extraction target, so we shell out
//! to it rather than scrape anything ourselves.

use crate::error::{Result, YtsumError};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Bounded retry count handed to the downloader.
const DOWNLOAD_RETRIES: u32 = 3;

/// Metadata for a video, fetched once per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: u64,
}

impl VideoMetadata {
    /// Fallback value substituted when metadata retrieval fails. Duration 0
    /// passes the length gate, so a metadata failure never blocks the run.
    pub fn sentinel() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            thumbnail_url: None,
            duration_secs: 0,
        }
    }
}

/// Outcome of a metadata fetch. Failure is folded into `Sentinel` rather
/// than an error so the fail-open policy is visible at the type level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataFetch {
    Fetched(VideoMetadata),
    Sentinel,
}

impl MetadataFetch {
    pub fn into_metadata(self) -> VideoMetadata {
        match self {
            MetadataFetch::Fetched(meta) => meta,
            MetadataFetch::Sentinel => VideoMetadata::sentinel(),
        }
    }
}

/// A downloaded audio file, owned by the orchestrator for one pipeline run.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub video_id: String,
}

/// External collaborator resolving a URL to downloadable audio plus metadata.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch title/thumbnail/duration. Never fails: any underlying error
    /// collapses to `MetadataFetch::Sentinel`.
    async fn fetch_metadata(&self, url: &str) -> MetadataFetch;

    /// Download the best available audio-only stream into `work_dir`,
    /// transcoded to mp3 and named after the video id.
    async fn fetch_audio(&self, url: &str, video_id: &str, work_dir: &Path)
        -> Result<AudioArtifact>;

    fn name(&self) -> &'static str;
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("static regex"))
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").expect("static regex")
    })
}

/// Extract the 11-character video identifier from a YouTube URL.
pub fn extract_video_id(url: &str) -> Result<String> {
    video_id_regex()
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| YtsumError::InvalidUrl(format!("unable to extract video ID from {url}")))
}

/// Check whether the input looks like a YouTube URL at all.
pub fn is_valid_youtube_url(url: &str) -> bool {
    url_pattern().is_match(url)
}

/// Check that yt-dlp is installed and accessible.
pub fn check_ytdlp() -> Result<()> {
    let output = Command::new("yt-dlp").arg("--version").output().map_err(|e| {
        YtsumError::Download(format!(
            "yt-dlp not found. Please install yt-dlp and ensure it's in your PATH. Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(YtsumError::Download("yt-dlp check failed".to_string()));
    }

    debug!("yt-dlp is available");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
}

/// yt-dlp-backed fetcher.
#[derive(Debug, Default)]
pub struct YtDlpFetcher;

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self
    }

    fn dump_metadata(&self, url: &str) -> Result<VideoMetadata> {
        let output = Command::new("yt-dlp")
            .args(["--dump-json", "--skip-download", "--no-warnings", "--no-playlist"])
            .arg(url)
            .output()
            .map_err(|e| YtsumError::Download(format!("Failed to run yt-dlp: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtsumError::Download(format!("yt-dlp metadata dump failed: {stderr}")));
        }

        let info: YtDlpInfo = serde_json::from_slice(&output.stdout)?;

        Ok(VideoMetadata {
            title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
            thumbnail_url: info.thumbnail,
            duration_secs: info.duration.unwrap_or(0.0).max(0.0) as u64,
        })
    }

    /// Locate the downloaded file by its expected base name. The transcode
    /// step decides the final extension, so match on the stem.
    fn find_downloaded_file(work_dir: &Path, basename: &str) -> Option<PathBuf> {
        let entries = std::fs::read_dir(work_dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && path.file_stem().and_then(|s| s.to_str()) == Some(basename)
            {
                return Some(path);
            }
        }
        None
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch_metadata(&self, url: &str) -> MetadataFetch {
        match self.dump_metadata(url) {
            Ok(meta) => {
                debug!("Fetched metadata: {} ({}s)", meta.title, meta.duration_secs);
                MetadataFetch::Fetched(meta)
            }
            Err(e) => {
                // Fail open: a metadata failure must not fail the pipeline.
                warn!("Metadata fetch failed, using sentinel: {e}");
                MetadataFetch::Sentinel
            }
        }
    }

    async fn fetch_audio(
        &self,
        url: &str,
        video_id: &str,
        work_dir: &Path,
    ) -> Result<AudioArtifact> {
        check_ytdlp()?;

        std::fs::create_dir_all(work_dir)
            .map_err(|e| YtsumError::Download(format!("Failed to create work directory: {e}")))?;

        let out_template = work_dir.join(format!("{video_id}.%(ext)s"));

        info!("Downloading audio for video {video_id}");

        let output = Command::new("yt-dlp")
            .args([
                "-f",
                "bestaudio[ext=m4a]/bestaudio/best",
                "-x",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--no-playlist",
                "--geo-bypass",
                "--retries",
            ])
            .arg(DOWNLOAD_RETRIES.to_string())
            .args(["--quiet", "--no-warnings", "-o"])
            .arg(&out_template)
            .arg(url)
            .output()
            .map_err(|e| YtsumError::Download(format!("Failed to run yt-dlp: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtsumError::Download(format!("yt-dlp exited with an error: {stderr}")));
        }

        let path = Self::find_downloaded_file(work_dir, video_id)
            .ok_or_else(|| YtsumError::FileNotFoundAfterDownload(video_id.to_string()))?;

        info!("Audio downloaded to {}", path.display());

        Ok(AudioArtifact {
            path,
            video_id: video_id.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
