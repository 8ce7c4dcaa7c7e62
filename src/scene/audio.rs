use std::time::Duration;

use crate::foundation::error::VitrineResult;

/// Seam for the host's actual audio output.
///
/// The runtime itself only tracks playback state; a host embeds whatever
/// output device it has behind this trait. Backends loop playback until
/// paused. `play` may be refused (autoplay policy); the handle logs the
/// refusal and moves on.
pub trait AudioBackend {
    fn play(&mut self) -> VitrineResult<()>;
    fn pause(&mut self);
    fn rewind(&mut self);
}

/// Backend that accepts every command and produces no sound.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self) -> VitrineResult<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}
}

/// The scene's single audio handle, exclusively owned by the app and mutated
/// only through the reveal controller's effects.
pub struct AudioHandle {
    source: String,
    backend: Box<dyn AudioBackend>,
    playing: bool,
    position: Duration,
}

impl AudioHandle {
    pub fn new(source: impl Into<String>, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            source: source.into(),
            backend,
            playing: false,
            position: Duration::ZERO,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Start looping playback. A refused `play` is logged and swallowed; the
    /// handle stays paused. No retry, no fallback.
    pub fn start(&mut self) {
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(err) => {
                tracing::warn!(source = %self.source, %err, "audio playback refused");
                self.playing = false;
            }
        }
    }

    /// Pause and rewind to the start.
    pub fn stop(&mut self) {
        self.backend.pause();
        self.backend.rewind();
        self.playing = false;
        self.position = Duration::ZERO;
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.playing {
            self.position += dt;
        }
    }
}
