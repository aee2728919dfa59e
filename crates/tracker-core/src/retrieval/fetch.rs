//! Plain HTTP downloads written through a `.tmp` file.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::link::{disposition_filename, sanitize_filename};
use super::RetrievalError;

/// GET `url` into `dir`.
///
/// The file is named after the response's `Content-Disposition` when it has
/// one, `fallback_name` otherwise. The body is streamed into `<name>.tmp`
/// and renamed into place once complete; a failed transfer leaves the
/// `.tmp` file behind.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    fallback_name: &str,
) -> Result<PathBuf, RetrievalError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(RetrievalError::io(format!("creating {}", dir.display())))?;

    debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RetrievalError::Status {
            status,
            url: url.to_string(),
        });
    }

    let declared = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename);
    let name = file_name(declared.as_deref(), fallback_name);

    let final_path = dir.join(&name);
    let tmp_path = dir.join(format!("{}.tmp", name));
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .map_err(RetrievalError::io(format!("creating {}", tmp_path.display())))?;

    let mut written: u64 = 0;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(RetrievalError::io(format!("writing {}", tmp_path.display())))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(RetrievalError::io(format!("writing {}", tmp_path.display())))?;
    drop(file);

    tokio::fs::rename(&tmp_path, &final_path)
        .await
        .map_err(RetrievalError::io(format!(
            "renaming {} into place",
            tmp_path.display()
        )))?;

    info!("downloaded {} bytes to {}", written, final_path.display());
    Ok(final_path)
}

/// Sanitized server name, or the sanitized fallback when the server's name
/// would not make a usable file.
fn file_name(declared: Option<&str>, fallback_name: &str) -> String {
    let usable = |name: &str| !name.trim_matches('.').trim().is_empty();
    declared
        .map(sanitize_filename)
        .filter(|n| usable(n))
        .unwrap_or_else(|| sanitize_filename(fallback_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_prefers_declared() {
        assert_eq!(file_name(Some("a/b.mp3"), "x.mp3"), "a_b.mp3");
        assert_eq!(file_name(None, "x.mp3"), "x.mp3");
        assert_eq!(file_name(Some(".."), "x.mp3"), "x.mp3");
        assert_eq!(file_name(Some("  "), "x/y.mp3"), "x_y.mp3");
    }
}
