//! yt-dlp wrapper for streaming-host links.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::RetrievalError;

/// Extract the audio of `url` as `<output_dir>/<stem>.mp3`.
///
/// The child is killed if the future is dropped, so aborting the task that
/// runs this also stops the download.
pub async fn download_audio(
    yt_dlp_path: &Path,
    url: &str,
    output_dir: &Path,
    stem: &str,
) -> Result<PathBuf, RetrievalError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(RetrievalError::io(format!("creating {}", output_dir.display())))?;

    let output_template = output_dir.join(format!("{}.%(ext)s", stem));
    info!("yt-dlp {} -> {}", url, output_template.display());

    let mut cmd = Command::new(yt_dlp_path);
    cmd.arg("-x")
        .arg("--audio-format")
        .arg("mp3")
        .arg("--no-progress")
        .arg("-o")
        .arg(&output_template)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| {
        RetrievalError::Downloader(format!("cannot start {}: {}", yt_dlp_path.display(), e))
    })?;

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("yt-dlp: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let mut lines = BufReader::new(stderr).lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("yt-dlp stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .map_err(|e| RetrievalError::Downloader(format!("waiting for yt-dlp: {}", e)))?;
    if !status.success() {
        return Err(RetrievalError::Downloader(format!(
            "exited with status {:?}",
            status.code()
        )));
    }

    Ok(output_dir.join(format!("{}.mp3", stem)))
}
