//! Frame timestamps

use crate::consts::MS_TO_SECS;

/// Converts raw frame timestamps (milliseconds since an arbitrary epoch)
/// into monotonic elapsed seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_secs: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds for this frame. A timestamp earlier than the last one
    /// repeats the previous value.
    pub fn sample(&mut self, timestamp_ms: f64) -> f32 {
        let secs = (timestamp_ms * MS_TO_SECS) as f32;
        if secs.is_finite() && secs > self.last_secs {
            self.last_secs = secs;
        }
        self.frames += 1;
        self.last_secs
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
