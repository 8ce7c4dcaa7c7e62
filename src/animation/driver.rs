use std::time::Duration;

use crate::foundation::error::{VitrineError, VitrineResult};

/// Looping linear interpolation over a frame-index range.
///
/// Advances a virtual index from `start_index` to
/// `start_index + num_images - 1` over `duration_secs`, then restarts from
/// `start_index`, forever. There is no pause or resume; dropping the driver
/// is the only way to stop it. The owning sprite reads the rounded integer
/// index after each [`step`](Self::step).
#[derive(Clone, Debug)]
pub struct FrameDriver {
    start_index: u32,
    span: u32, // num_images - 1
    duration_secs: f64,
    elapsed_secs: f64,
}

impl FrameDriver {
    pub fn new(start_index: u32, num_images: u32, duration_secs: f64) -> VitrineResult<Self> {
        if num_images == 0 {
            return Err(VitrineError::animation("frame driver needs num_images > 0"));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(VitrineError::animation(
                "frame driver duration must be finite and > 0",
            ));
        }
        Ok(Self {
            start_index,
            span: num_images - 1,
            duration_secs,
            elapsed_secs: 0.0,
        })
    }

    /// Current virtual index, in `[start_index, start_index + span]`.
    pub fn value(&self) -> f64 {
        let phase = self.elapsed_secs / self.duration_secs;
        f64::from(self.start_index) + f64::from(self.span) * phase
    }

    /// Current published index: `round(value)`.
    pub fn current_index(&self) -> u32 {
        self.value().round() as u32
    }

    /// Advance by `dt` and return the published index.
    ///
    /// The elapsed clock wraps at `duration_secs`, which restarts the sweep
    /// at `start_index` (wraparound via restart, never decrement).
    pub fn step(&mut self, dt: Duration) -> u32 {
        self.elapsed_secs = (self.elapsed_secs + dt.as_secs_f64()) % self.duration_secs;
        self.current_index()
    }
}
