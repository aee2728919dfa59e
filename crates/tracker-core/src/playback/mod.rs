//! Playback: one decoded stream on one output device at a time.
//!
//! [`Player`] owns the only [`PlaybackSession`]. Starting a new session
//! stops the previous output before the new stream reaches the device, so
//! two sessions never sound together.

mod decode;
mod rodio_output;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::retrieval::Ticket;

pub use decode::{open, DecodeError, DecodedStream, MediaKind, SampleFormat};
pub use rodio_output::RodioOutput;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Runs on the device thread once the stream is exhausted.
pub type FinishCallback = Box<dyn Fn() + Send>;

/// An output device that plays one stream at a time.
pub trait AudioOutput {
    fn play(&mut self, stream: DecodedStream, on_finish: FinishCallback)
        -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Close the current stream, if any.
    fn stop(&mut self);
    /// Time played of the current stream.
    fn elapsed(&self) -> Duration;
}

/// The live session. Its id is the ticket of the retrieval that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub id: Ticket,
    pub path: PathBuf,
    pub format: SampleFormat,
    pub total: Option<Duration>,
    paused: bool,
}

impl PlaybackSession {
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

pub struct Player<O> {
    output: O,
    session: Option<PlaybackSession>,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Replace whatever is playing with `stream`.
    pub fn start(
        &mut self,
        id: Ticket,
        stream: DecodedStream,
        on_finish: FinishCallback,
    ) -> Result<&PlaybackSession, PlaybackError> {
        self.stop();

        let session = PlaybackSession {
            id,
            path: stream.path().to_path_buf(),
            format: stream.format(),
            total: stream.total_duration(),
            paused: false,
        };
        self.output.play(stream, on_finish)?;
        info!(
            "session {} playing {} ({})",
            id,
            session.path.display(),
            session.format
        );
        Ok(self.session.insert(session))
    }

    pub fn pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.output.pause();
            session.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.output.resume();
            session.paused = false;
        }
    }

    /// Flip pause state; returns the new paused flag, `None` when idle.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let paused = self.session.as_ref()?.paused;
        if paused {
            self.resume();
        } else {
            self.pause();
        }
        Some(!paused)
    }

    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            self.output.stop();
            debug!("session {} stopped", session.id);
        }
    }

    /// Session id and played fraction in `[0, 1]`.
    pub fn position(&self) -> Option<(Ticket, f64)> {
        let session = self.session.as_ref()?;
        Some((session.id, fraction(self.output.elapsed(), session.total)))
    }
}

/// `elapsed / total`, clamped. Unknown or zero length reads as `0.0`.
pub fn fraction(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(total) if !total.is_zero() => {
            (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    /// Write a silent 16-bit mono PCM WAV file.
    pub(crate) fn write_wav(path: &Path, sample_rate: u32, frames: u32) {
        let data_len = frames * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);
        std::fs::write(path, bytes).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use test_support::write_wav;

    /// Output that records calls and refuses to open over a live stream.
    #[derive(Clone, Default)]
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
        live: Arc<Mutex<Option<PathBuf>>>,
        elapsed: Arc<Mutex<Duration>>,
    }

    impl AudioOutput for Recorder {
        fn play(
            &mut self,
            stream: DecodedStream,
            _on_finish: FinishCallback,
        ) -> Result<(), PlaybackError> {
            let mut live = self.live.lock().unwrap();
            if live.is_some() {
                return Err(PlaybackError::Device("overlapping output".into()));
            }
            let name = stream.path().file_name().unwrap().to_string_lossy();
            self.log.lock().unwrap().push(format!("play {}", name));
            *live = Some(stream.path().to_path_buf());
            Ok(())
        }

        fn pause(&mut self) {
            self.log.lock().unwrap().push("pause".into());
        }

        fn resume(&mut self) {
            self.log.lock().unwrap().push("resume".into());
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().push("stop".into());
            *self.live.lock().unwrap() = None;
        }

        fn elapsed(&self) -> Duration {
            *self.elapsed.lock().unwrap()
        }
    }

    fn wav(dir: &Path, name: &str) -> DecodedStream {
        let path = dir.join(name);
        write_wav(&path, 8_000, 8_000);
        open(&path).unwrap()
    }

    #[test]
    fn test_second_start_stops_first_output() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut player = Player::new(recorder.clone());

        player
            .start(Ticket(1), wav(dir.path(), "a.wav"), Box::new(|| {}))
            .unwrap();
        let second = player
            .start(Ticket(2), wav(dir.path(), "b.wav"), Box::new(|| {}))
            .unwrap();
        assert_eq!(second.id, Ticket(2));

        assert_eq!(
            *recorder.log.lock().unwrap(),
            vec!["play a.wav", "stop", "play b.wav"]
        );
        assert_eq!(
            recorder.live.lock().unwrap().as_deref(),
            Some(dir.path().join("b.wav").as_path())
        );
        assert_eq!(player.session().map(|s| s.id), Some(Ticket(2)));
    }

    #[test]
    fn test_toggle_pause_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut player = Player::new(recorder.clone());
        assert_eq!(player.toggle_pause(), None);

        player
            .start(Ticket(7), wav(dir.path(), "a.wav"), Box::new(|| {}))
            .unwrap();
        assert_eq!(player.toggle_pause(), Some(true));
        assert!(player.session().unwrap().is_paused());
        assert_eq!(player.toggle_pause(), Some(false));

        player.stop();
        player.stop();
        assert!(player.session().is_none());
        assert_eq!(
            *recorder.log.lock().unwrap(),
            vec!["play a.wav", "pause", "resume", "stop"]
        );
    }

    #[test]
    fn test_position_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut player = Player::new(recorder.clone());
        assert_eq!(player.position(), None);

        player
            .start(Ticket(3), wav(dir.path(), "a.wav"), Box::new(|| {}))
            .unwrap();
        *recorder.elapsed.lock().unwrap() = Duration::from_millis(250);
        assert_eq!(player.position(), Some((Ticket(3), 0.25)));

        *recorder.elapsed.lock().unwrap() = Duration::from_secs(5);
        assert_eq!(player.position(), Some((Ticket(3), 1.0)));
    }

    #[test]
    fn test_fraction_without_length() {
        assert_eq!(fraction(Duration::from_secs(3), None), 0.0);
        assert_eq!(fraction(Duration::from_secs(3), Some(Duration::ZERO)), 0.0);
        assert_eq!(
            fraction(Duration::from_secs(1), Some(Duration::from_secs(4))),
            0.25
        );
    }
}
