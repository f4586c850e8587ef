use std::time::{Duration, Instant};

/// Elapsed time since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    delta: Duration,
}

impl FrameTime {
    pub const ZERO: Self = Self {
        delta: Duration::ZERO,
    };

    pub fn new(delta: Duration) -> Self {
        Self { delta }
    }

    /// Engines commonly report the frame delta in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Wall-clock frame timer for drivers that don't get a delta from their engine.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous call. The first call returns zero.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        FrameTime::new(delta)
    }
}
