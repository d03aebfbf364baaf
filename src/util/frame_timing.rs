use web_time::{Duration, Instant};

/// Wall-clock frame delta.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Start timing from now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start timing from `start`.
    #[must_use]
    pub const fn starting_at(start: Instant) -> Self {
        Self { last_frame: start }
    }

    /// Mark a new frame and return the seconds since the previous one.
    pub fn next_frame(&mut self) -> f32 {
        self.next_frame_at(Instant::now())
    }

    /// [`next_frame`](Self::next_frame) with an explicit timestamp.
    /// Timestamps earlier than the previous frame count as zero.
    pub fn next_frame_at(&mut self, now: Instant) -> f32 {
        let elapsed = now
            .checked_duration_since(self.last_frame)
            .unwrap_or(Duration::ZERO);
        self.last_frame = now;
        elapsed.as_secs_f32()
    }
}
