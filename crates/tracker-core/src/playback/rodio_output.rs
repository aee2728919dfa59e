use std::time::Duration;

use rodio::source::EmptyCallback;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{info, warn};

use super::{AudioOutput, DecodedStream, FinishCallback, PlaybackError};

/// The default system output. The device is opened on first use and kept
/// for the life of the process; each stream gets a fresh [`Sink`].
///
/// Not `Send`: it must stay on the thread that created it.
pub struct RodioOutput {
    device: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioOutput {
    pub fn new() -> Self {
        let mut output = Self {
            device: None,
            sink: None,
        };
        if let Err(e) = output.ensure_device() {
            warn!("{}; will retry on first playback", e);
        }
        output
    }

    fn ensure_device(&mut self) -> Result<&OutputStreamHandle, PlaybackError> {
        if self.device.is_none() {
            let device =
                OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
            info!("audio output opened");
            self.device = Some(device);
        }
        match &self.device {
            Some((_, handle)) => Ok(handle),
            None => Err(PlaybackError::Device("no output stream".into())),
        }
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for RodioOutput {
    fn play(
        &mut self,
        stream: DecodedStream,
        on_finish: FinishCallback,
    ) -> Result<(), PlaybackError> {
        self.stop();
        let handle = self.ensure_device()?;
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.append(stream.into_source());
        // Reached only once the stream above has been drained.
        sink.append(EmptyCallback::<f32>::new(on_finish));
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn elapsed(&self) -> Duration {
        self.sink.as_ref().map(Sink::get_pos).unwrap_or_default()
    }
}
