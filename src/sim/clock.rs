//! Frame pacing
//!
//! The host calls `FramePacer::frame` with its animation-frame timestamp.
//! Frames arriving sooner than the cap allows are skipped; accepted frames
//! yield a delta clamped so a backgrounded tab cannot produce a huge step.

use crate::tuning::Tuning;

const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FramePacer {
    /// Minimum spacing between accepted frames (0 = uncapped)
    min_frame_ms: f64,
    max_dt: f32,
    last_ms: Option<f64>,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl FramePacer {
    pub fn new(max_fps: f64, max_dt: f32) -> Self {
        let min_frame_ms = if max_fps > 0.0 { 1000.0 / max_fps } else { 0.0 };
        Self {
            min_frame_ms,
            max_dt: max_dt.max(0.0),
            last_ms: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.max_fps, tuning.max_frame_dt)
    }

    /// Delta in seconds for this frame, or `None` if it should be skipped
    ///
    /// The very first frame has nothing to measure against and yields 0.
    pub fn frame(&mut self, now_ms: f64) -> Option<f32> {
        let dt = match self.last_ms {
            None => 0.0,
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed >= 0.0 && elapsed < self.min_frame_ms {
                    return None;
                }
                (elapsed / 1000.0) as f32
            }
        };
        self.last_ms = Some(now_ms);
        self.track_fps(now_ms);

        // Timestamps can go backwards after a host clock reset
        Some(if dt.is_finite() { dt.clamp(0.0, self.max_dt) } else { 0.0 })
    }

    /// Forget the last timestamp (e.g. after a pause) so the next frame starts fresh
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Accepted frames per second over the last `FPS_WINDOW` frames
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_skips_early_frames() {
        let mut pacer = FramePacer::new(30.0, 0.05);
        assert_eq!(pacer.frame(1000.0), Some(0.0));
        // 60 Hz frames: every other one is dropped
        assert_eq!(pacer.frame(1016.7), None);
        let dt = pacer.frame(1033.4).unwrap();
        assert!((dt - 0.0334).abs() < 1e-4);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut pacer = FramePacer::new(0.0, 0.05);
        pacer.frame(0.0);
        assert_eq!(pacer.frame(10_000.0), Some(0.05));
        // Clock went backwards
        assert_eq!(pacer.frame(5_000.0), Some(0.0));
    }

    #[test]
    fn test_reset_restarts_measurement() {
        let mut pacer = FramePacer::new(0.0, 1.0);
        pacer.frame(100.0);
        pacer.reset();
        assert_eq!(pacer.frame(900.0), Some(0.0));
    }

    #[test]
    fn test_fps_estimate() {
        let mut pacer = FramePacer::new(0.0, 0.05);
        for i in 1..=120 {
            pacer.frame(i as f64 * 20.0);
        }
        assert_eq!(pacer.fps(), 50);
    }
}
