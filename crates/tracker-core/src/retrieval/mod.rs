//! Retrieval pipeline: turns a catalog link or media reference into a local
//! file, and media files into a decoded stream, off the event loop.
//!
//! Each request carries a [`Ticket`]; the navigation state only installs the
//! result of the newest ticket it issued, so late results of superseded
//! requests are dropped where they arrive.

pub mod fetch;
pub mod link;
pub mod ytdlp;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::RetrievalConfig;
use crate::playback::{self, DecodeError, DecodedStream};

pub use link::{
    classify, convert_sheet_url, media_fallback_name, sanitize_filename, source_host,
    MediaSource, CATALOG_FALLBACK_NAME,
};

/// Tag of one retrieval request. Issued in increasing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl Ticket {
    pub fn next(self) -> Ticket {
        Ticket(self.0 + 1)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Catalog,
    Media,
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid Google Sheets URL")]
    InvalidLink,
    #[error("unexpected URL format")]
    UnexpectedUrlFormat,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("yt-dlp failed: {0}")]
    Downloader(String),
    #[error("{} never appeared on disk", .0.display())]
    FileNotReady(PathBuf),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RetrievalError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| RetrievalError::Io { context, source }
    }
}

/// What a media retrieval needs from the selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub reference: String,
    pub fallback_name: String,
}

/// Directories and knobs a [`Retriever`] works with.
#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub catalog_dir: PathBuf,
    pub media_dir: PathBuf,
    pub api_base: String,
    pub yt_dlp: PathBuf,
    pub wait_interval: Duration,
    pub wait_attempts: u32,
}

impl RetrievalSettings {
    pub fn from_config(config: &RetrievalConfig, catalog_dir: PathBuf, media_dir: PathBuf) -> Self {
        Self {
            catalog_dir,
            media_dir,
            api_base: config.download_api_base.clone(),
            yt_dlp: config.yt_dlp_binary(),
            wait_interval: config.file_wait_interval(),
            wait_attempts: config.file_wait_attempts,
        }
    }
}

/// Cheap to clone; every spawned retrieval task takes its own copy.
#[derive(Debug, Clone)]
pub struct Retriever {
    client: reqwest::Client,
    settings: RetrievalSettings,
}

impl Retriever {
    pub fn new(settings: RetrievalSettings) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tracker-tui/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Download a catalog export into the catalog directory.
    pub async fn resolve_catalog(&self, export_url: &str) -> Result<PathBuf, RetrievalError> {
        fetch::download(
            &self.client,
            export_url,
            &self.settings.catalog_dir,
            CATALOG_FALLBACK_NAME,
        )
        .await
    }

    /// Fetch the media behind `reference` into the media directory and wait
    /// until the file is visible on disk.
    pub async fn resolve_media(
        &self,
        reference: &str,
        fallback_name: &str,
    ) -> Result<PathBuf, RetrievalError> {
        let path = match classify(reference, &self.settings.api_base)? {
            MediaSource::Streaming(url) => {
                let stem = Path::new(fallback_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| fallback_name.to_string());
                ytdlp::download_audio(&self.settings.yt_dlp, &url, &self.settings.media_dir, &stem)
                    .await?
            }
            MediaSource::Direct(url) => {
                fetch::download(&self.client, &url, &self.settings.media_dir, fallback_name).await?
            }
        };

        wait_for_file(
            &path,
            self.settings.wait_interval,
            self.settings.wait_attempts,
        )
        .await?;
        Ok(path)
    }

    /// Resolve then decode. The decoder is opened on the blocking pool.
    pub async fn retrieve_media(
        &self,
        request: &MediaRequest,
    ) -> Result<DecodedStream, RetrievalError> {
        let path = self
            .resolve_media(&request.reference, &request.fallback_name)
            .await?;
        info!("decoding {}", path.display());
        let stream = tokio::task::spawn_blocking(move || playback::open(&path)).await??;
        Ok(stream)
    }
}

/// Poll for `path` every `interval`, at most `attempts` times.
pub async fn wait_for_file(
    path: &Path,
    interval: Duration,
    attempts: u32,
) -> Result<(), RetrievalError> {
    for attempt in 0..attempts.max(1) {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }
        debug!("waiting for {} (attempt {})", path.display(), attempt + 1);
        tokio::time::sleep(interval).await;
    }
    Err(RetrievalError::FileNotReady(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let first = Ticket::default().next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "#2");
    }

    #[tokio::test]
    async fn test_wait_for_file_sees_late_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.mp3");

        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            tokio::fs::write(writer_path, b"x").await.unwrap();
        });

        wait_for_file(&path, Duration::from_millis(10), 100)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_file_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.mp3");
        let err = wait_for_file(&path, Duration::from_millis(1), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::FileNotReady(p) if p == path));
    }

    #[tokio::test]
    async fn test_unexpected_reference_fails_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = Retriever::new(RetrievalSettings {
            catalog_dir: dir.path().join("csv"),
            media_dir: dir.path().join("songs"),
            api_base: "http://127.0.0.1:9/api".into(),
            yt_dlp: "yt-dlp".into(),
            wait_interval: Duration::from_millis(1),
            wait_attempts: 1,
        })
        .unwrap();

        let err = retriever
            .resolve_media("https://pillows.su/nope", "x.mp3")
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::UnexpectedUrlFormat));
        assert!(!dir.path().join("songs").exists());
    }
}
