use std::time::{Duration, Instant};

/// Интервал одного кадра при 60 Гц
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Пропускает не более одного срабатывания за кадр
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}
