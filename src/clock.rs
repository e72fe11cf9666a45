use std::time::{Duration, Instant};

use crate::Millis;

/// Monotonic game clock. Time spent paused does not count.
pub struct Clock {
    start: Instant,
    last_frame: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Clock { start: now, last_frame: now, paused_at: None, paused_total: Duration::ZERO }
    }

    /// Milliseconds of unpaused time since the clock was created.
    pub fn ticks(&self) -> Millis {
        let end = self.paused_at.unwrap_or_else(Instant::now);
        let elapsed = end.duration_since(self.start).saturating_sub(self.paused_total);
        elapsed.as_millis() as Millis
    }

    /// Seconds since the previous frame.
    pub fn frame_dt(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        dt
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    /// Resumes counting; the next `frame_dt` starts from here so the pause is
    /// not integrated.
    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            let now = Instant::now();
            self.paused_total += now.duration_since(at);
            self.last_frame = now;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_paused_time_is_excluded() {
        let mut clock = Clock::new();
        clock.pause();
        let frozen = clock.ticks();
        sleep(Duration::from_millis(30));
        assert_eq!(clock.ticks(), frozen);

        clock.resume();
        assert!(clock.ticks() < frozen + 25);
        assert!(clock.frame_dt() < 0.025);
    }
}
