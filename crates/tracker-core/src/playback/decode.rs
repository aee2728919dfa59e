//! Opening media files as decoded sample streams.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Container kinds we decode. Chosen from the extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "wav" => Ok(MediaKind::Wav),
            "mp3" => Ok(MediaKind::Mp3),
            "flac" => Ok(MediaKind::Flac),
            "ogg" => Ok(MediaKind::Ogg),
            _ => Err(DecodeError::UnsupportedFormat(ext)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} ch", n),
        };
        write!(f, "{:.1} kHz {}", self.sample_rate as f64 / 1000.0, layout)
    }
}

/// An opened file ready to be handed to an output device.
pub struct DecodedStream {
    path: PathBuf,
    kind: MediaKind,
    format: SampleFormat,
    total: Option<Duration>,
    source: Decoder<BufReader<File>>,
}

impl DecodedStream {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// `None` when the container does not say.
    pub fn total_duration(&self) -> Option<Duration> {
        self.total
    }

    pub fn into_source(self) -> Decoder<BufReader<File>> {
        self.source
    }
}

impl fmt::Debug for DecodedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedStream")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("format", &self.format)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Open `path` with the decoder its extension names.
pub fn open(path: &Path) -> Result<DecodedStream, DecodeError> {
    let kind = MediaKind::from_path(path)?;
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let source = match kind {
        MediaKind::Wav => Decoder::new_wav(reader),
        MediaKind::Mp3 => Decoder::new_mp3(reader),
        MediaKind::Flac => Decoder::new_flac(reader),
        MediaKind::Ogg => Decoder::new_vorbis(reader),
    }
    .map_err(|source| DecodeError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let format = SampleFormat {
        sample_rate: source.sample_rate(),
        channels: source.channels(),
    };
    let total = source.total_duration();

    Ok(DecodedStream {
        path: path.to_path_buf(),
        kind,
        format,
        total,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::test_support::write_wav;

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(
            MediaKind::from_path(Path::new("a/b.MP3")).unwrap(),
            MediaKind::Mp3
        );
        assert_eq!(
            MediaKind::from_path(Path::new("x.Flac")).unwrap(),
            MediaKind::Flac
        );
        assert_eq!(
            MediaKind::from_path(Path::new("x.wav")).unwrap(),
            MediaKind::Wav
        );
        assert_eq!(
            MediaKind::from_path(Path::new("x.ogg")).unwrap(),
            MediaKind::Ogg
        );
    }

    #[test]
    fn test_unsupported_extension_never_touches_file() {
        // The file does not exist; an open attempt would be an Open error.
        let err = open(Path::new("/nonexistent/song.m4a")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ref e) if e == "m4a"));
        assert_eq!(err.to_string(), "unsupported file format: m4a");

        assert!(matches!(
            open(Path::new("/nonexistent/no_extension")),
            Err(DecodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_open_wav_reports_format_and_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.WAV");
        write_wav(&path, 8_000, 16_000);

        let stream = open(&path).unwrap();
        assert_eq!(stream.kind(), MediaKind::Wav);
        assert_eq!(
            stream.format(),
            SampleFormat {
                sample_rate: 8_000,
                channels: 1
            }
        );
        assert_eq!(stream.total_duration(), Some(Duration::from_secs(2)));
        assert_eq!(stream.format().to_string(), "8.0 kHz mono");
    }

    #[test]
    fn test_garbage_with_known_extension_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();

        assert!(matches!(open(&path), Err(DecodeError::Corrupt { .. })));
    }
}
