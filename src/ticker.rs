// Fixed-rate frame pacing plus the once-a-second FPS report.

use log::debug;
use std::thread;
use std::time::{Duration, Instant};

pub struct Ticker {
    interval: Duration,
    next_deadline: Instant,
    last_fps_time: Instant,
    frames_this_second: u32,
    label: &'static str,
}

impl Ticker {
    pub fn new(hz: u32, label: &'static str) -> Self {
        let now = Instant::now();
        let interval = Duration::from_secs(1) / hz.max(1);
        Self {
            interval,
            next_deadline: now + interval,
            last_fps_time: now,
            frames_this_second: 0,
            label,
        }
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep until the next frame is due. A late frame does not try to catch
    /// up: the schedule restarts from now.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            self.next_deadline = now + self.interval;
        }

        self.frames_this_second += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_time);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_this_second as f32 / elapsed.as_secs_f32();
            debug!("{}: {:.1} FPS", self.label, fps);
            self.frames_this_second = 0;
            self.last_fps_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_matches_rate() {
        let ticker = Ticker::new(50, "test");
        assert_eq!(ticker.interval(), Duration::from_millis(20));
    }

    #[test]
    fn wait_paces_frames() {
        let mut ticker = Ticker::new(200, "test");
        let start = Instant::now();
        for _ in 0..4 {
            ticker.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
