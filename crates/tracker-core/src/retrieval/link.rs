//! Link handling: sheet-link conversion, media reference classification and
//! filename hygiene.

use regex::Regex;
use reqwest::Url;

use super::RetrievalError;

/// Hosts whose links go through yt-dlp rather than a plain download.
const STREAMING_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Fallback name for a catalog export whose response names no file.
pub const CATALOG_FALLBACK_NAME: &str = "SomeSheet.csv";

/// Fallback name for media when the entry has no usable title.
pub const MEDIA_FALLBACK_NAME: &str = "somesong.mp3";

/// Turn a Google Sheets sharing link into its CSV export URL.
///
/// Accepts `/edit` and `/htmlview` links carrying a `gid`; anything else is
/// [`RetrievalError::InvalidLink`].
pub fn convert_sheet_url(link: &str) -> Result<String, RetrievalError> {
    let re = Regex::new(
        r"https://docs\.google\.com/spreadsheets/d/([a-zA-Z0-9_-]+)/(?:edit|htmlview)[^#]*?[?&#]gid=([0-9]+)",
    )
    .map_err(|_| RetrievalError::InvalidLink)?;

    let caps = re.captures(link.trim()).ok_or(RetrievalError::InvalidLink)?;
    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        &caps[1], &caps[2]
    ))
}

/// Where a media reference is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Streaming-host link, handed to yt-dlp untouched.
    Streaming(String),
    /// Direct download endpoint.
    Direct(String),
}

/// Classify a media reference.
///
/// Streaming-host links are returned unchanged. A share link whose path is
/// exactly `/f/<id>` is rewritten onto `api_base`. Everything else is
/// [`RetrievalError::UnexpectedUrlFormat`].
pub fn classify(reference: &str, api_base: &str) -> Result<MediaSource, RetrievalError> {
    let url = Url::parse(reference.trim()).map_err(|_| RetrievalError::UnexpectedUrlFormat)?;
    let host = url.host_str().unwrap_or_default();
    if STREAMING_HOSTS.iter().any(|h| host.contains(h)) {
        return Ok(MediaSource::Streaming(reference.to_string()));
    }

    let segments: Vec<&str> = url.path().trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["f", id] if !id.is_empty() => Ok(MediaSource::Direct(format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            id
        ))),
        _ => Err(RetrievalError::UnexpectedUrlFormat),
    }
}

/// `https://<host>` of a reference, for the "file from" line.
pub fn source_host(reference: &str) -> Option<String> {
    let url = Url::parse(reference.trim()).ok()?;
    url.host_str().map(|h| format!("https://{}", h))
}

/// Replace every run of `/` or `\` with a single `_`.
pub fn sanitize_filename(name: &str) -> String {
    Regex::new(r"[\\/]+")
        .map(|re| re.replace_all(name, "_").into_owned())
        .unwrap_or_else(|_| name.replace(['/', '\\'], "_"))
}

/// Fallback file name for an entry titled `title`.
pub fn media_fallback_name(title: &str) -> String {
    let stem = sanitize_filename(title.trim());
    if stem.trim_matches('.').is_empty() {
        MEDIA_FALLBACK_NAME.to_string()
    } else {
        format!("{}.mp3", stem)
    }
}

/// File name declared by a `Content-Disposition` header, preferring the
/// RFC 5987 `filename*` form over plain `filename`.
pub fn disposition_filename(header: &str) -> Option<String> {
    let extended = Regex::new(r#"(?i)filename\*\s*=\s*([^']*)'[^']*'([^;]+)"#).ok()?;
    if let Some(caps) = extended.captures(header) {
        let value = caps[2].trim().trim_matches('"');
        let bytes = urlencoding::decode_binary(value.as_bytes()).into_owned();
        if let Ok(decoded) = String::from_utf8(bytes) {
            if !decoded.is_empty() {
                return Some(decoded);
            }
        }
    }

    let plain = Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;]+))"#).ok()?;
    let caps = plain.captures(header)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = "https://api.example.test/api/download";

    #[test]
    fn test_convert_sheet_url() {
        let url = "https://docs.google.com/spreadsheets/d/1a-B_c9/edit?gid=12345#gid=12345";
        assert_eq!(
            convert_sheet_url(url).unwrap(),
            "https://docs.google.com/spreadsheets/d/1a-B_c9/export?format=csv&gid=12345"
        );

        let html = "https://docs.google.com/spreadsheets/d/XYZ/htmlview?usp=sharing&gid=0";
        assert_eq!(
            convert_sheet_url(html).unwrap(),
            "https://docs.google.com/spreadsheets/d/XYZ/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_convert_sheet_url_rejects_other_links() {
        for bad in [
            "",
            "not a link",
            "https://docs.google.com/spreadsheets/d/abc/edit",
            "https://example.com/spreadsheets/d/abc/edit?gid=1",
        ] {
            assert!(
                matches!(convert_sheet_url(bad), Err(RetrievalError::InvalidLink)),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_streaming_links_are_never_rewritten() {
        for link in [
            "https://www.youtube.com/watch?v=abc",
            "https://youtu.be/abc?t=3",
            "https://music.youtube.com/watch?v=f/x",
        ] {
            assert_eq!(
                classify(link, API).unwrap(),
                MediaSource::Streaming(link.to_string())
            );
        }
    }

    #[test]
    fn test_share_links_rewrite_to_api() {
        assert_eq!(
            classify("https://pillows.su/f/XYZ123", API).unwrap(),
            MediaSource::Direct(format!("{API}/XYZ123"))
        );
        assert_eq!(
            classify("https://pillows.su/f/XYZ123", "https://api.example.test/").unwrap(),
            MediaSource::Direct("https://api.example.test/XYZ123".into())
        );
    }

    #[test]
    fn test_other_shapes_are_unexpected() {
        for link in [
            "https://pillows.su/XYZ123",
            "https://pillows.su/f/",
            "https://pillows.su/f/a/b",
            "https://pillows.su/g/XYZ123",
            "no scheme at all",
        ] {
            let err = classify(link, API).unwrap_err();
            assert!(matches!(err, RetrievalError::UnexpectedUrlFormat), "{link}");
            assert_eq!(err.to_string(), "unexpected URL format");
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("a//\\/b"), "a_b");
        assert_eq!(sanitize_filename("plain.mp3"), "plain.mp3");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["", "/", "a/b", "..\\..//x", "song (v2) / final.mp3", "\\\\"] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
            assert!(!once.contains('/') && !once.contains('\\'));
        }
    }

    #[test]
    fn test_media_fallback_name() {
        assert_eq!(media_fallback_name("Track / One"), "Track _ One.mp3");
        assert_eq!(media_fallback_name("  "), MEDIA_FALLBACK_NAME);
        assert_eq!(media_fallback_name(".."), MEDIA_FALLBACK_NAME);
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="Track One.mp3""#).as_deref(),
            Some("Track One.mp3")
        );
        assert_eq!(
            disposition_filename("attachment; filename=plain.flac").as_deref(),
            Some("plain.flac")
        );
        assert_eq!(
            disposition_filename(
                r#"attachment; filename="fallback.mp3"; filename*=UTF-8''Caf%C3%A9%20Song.mp3"#
            )
            .as_deref(),
            Some("Café Song.mp3")
        );
        assert_eq!(
            disposition_filename(
                r#"attachment; filename="plain.mp3"; filename*=UTF-8''%FF%FE.mp3"#
            )
            .as_deref(),
            Some("plain.mp3")
        );
        assert_eq!(disposition_filename("inline"), None);
        assert_eq!(disposition_filename(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_source_host() {
        assert_eq!(
            source_host("https://pillows.su/f/abc").as_deref(),
            Some("https://pillows.su")
        );
        assert_eq!(source_host("nope"), None);
    }
}
