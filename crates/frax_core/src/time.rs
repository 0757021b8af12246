use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Frames longer than this are reported as this long (window drags, breakpoints).
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct FrameClock {
    pub frame_count: u64,
    pub total_time: f64,
    frame_time: f64,
    target_fps: Option<u32>,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(target_fps: Option<u32>) -> Self {
        Self {
            frame_count: 0,
            total_time: 0.0,
            frame_time: 1.0 / 60.0,
            target_fps: target_fps.filter(|&fps| fps > 0),
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Duration of the previous frame in seconds, including any limiter sleep.
    pub fn frame_time(&self) -> f32 {
        self.frame_time as f32
    }

    pub fn target_fps(&self) -> Option<u32> {
        self.target_fps
    }

    /// `None` or `Some(0)` removes the limit.
    pub fn set_target_fps(&mut self, target_fps: Option<u32>) {
        self.target_fps = target_fps.filter(|&fps| fps > 0);
    }

    /// Close the current frame: sleep out the rest of the target frame budget,
    /// then measure the frame.
    pub fn end_frame(&mut self) {
        let sleep = self.remaining_sleep(self.last_instant.elapsed());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.record_frame(dt);
    }

    /// Time left in the target frame budget after `work` has elapsed.
    pub fn remaining_sleep(&self, work: Duration) -> Duration {
        match self.target_fps {
            Some(fps) => Duration::from_secs_f64(1.0 / fps as f64).saturating_sub(work),
            None => Duration::ZERO,
        }
    }

    pub fn record_frame(&mut self, dt: f64) {
        let mut dt = dt.max(0.0);
        if dt > MAX_FRAME_TIME {
            log::warn!(
                "Frame took {:.1}ms, reporting {}ms",
                dt * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            dt = MAX_FRAME_TIME;
        }

        self.frame_time = dt;
        self.total_time += dt;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(None)
    }
}
