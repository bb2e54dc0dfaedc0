//! Frames-per-second display in the window title.

use crate::ContextError;
use sdl2::video::Window;
use std::time::{Duration, Instant};

/// Counts frames and reports the count once per interval (one second by
/// default).
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
    interval: Duration,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
            interval,
        }
    }

    /// Count one frame. Returns the accumulated frame count once per
    /// elapsed interval, `None` otherwise.
    pub fn tick(&mut self) -> Option<u32> {
        self.frames += 1;
        if self.window_start.elapsed() < self.interval {
            return None;
        }
        let fps = self.frames;
        self.frames = 0;
        self.window_start = Instant::now();
        Some(fps)
    }

    /// Count one frame and, once per interval, rewrite the window title as
    /// `"{base} (FPS: {n})"`.
    pub fn update_title(&mut self, window: &mut Window, base: &str) -> Result<(), ContextError> {
        if let Some(fps) = self.tick() {
            window.set_title(&format_title(base, fps))?;
        }
        Ok(())
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_title(base: &str, fps: u32) -> String {
    format!("{base} (FPS: {fps})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_frame_with_zero_interval() {
        let mut counter = FpsCounter::with_interval(Duration::ZERO);
        assert_eq!(counter.tick(), Some(1));
        assert_eq!(counter.tick(), Some(1));
    }

    #[test]
    fn silent_within_interval() {
        let mut counter = FpsCounter::with_interval(Duration::from_secs(3600));
        for _ in 0..100 {
            assert_eq!(counter.tick(), None);
        }
    }

    #[test]
    fn count_resets_after_report() {
        let mut counter = FpsCounter::with_interval(Duration::ZERO);
        counter.tick();
        counter.frames = 59;
        assert_eq!(counter.tick(), Some(60));
        assert_eq!(counter.tick(), Some(1));
    }

    #[test]
    fn title_format() {
        assert_eq!(format_title("glbase demo", 144), "glbase demo (FPS: 144)");
    }
}
