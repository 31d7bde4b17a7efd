//! Fixed-timestep clock.
//!
//! The simulation advances in whole ticks; physics constants are expressed
//! per tick and never scaled by wall-clock time. `begin_frame` feeds elapsed
//! real time into an accumulator and `should_step` hands out one tick per
//! `fixed_dt` of accumulated time.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new(tick_rate_hz: u32) -> Self {
        let fixed_dt = 1.0 / f64::from(tick_rate_hz.max(1));
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Change the tick rate in place. Accumulated time carries over, capped
    /// so a slower rate does not owe more than one tick.
    pub fn set_tick_rate(&mut self, tick_rate_hz: u32) {
        self.fixed_dt = 1.0 / f64::from(tick_rate_hz.max(1));
        self.accumulator = self.accumulator.min(self.fixed_dt);
    }

    pub fn tick_rate_hz(&self) -> u32 {
        (1.0 / self.fixed_dt).round() as u32
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Feed an explicit amount of elapsed time. `begin_frame` uses this with
    /// the measured wall-clock delta.
    pub fn advance(&mut self, elapsed: Duration) {
        self.real_dt = elapsed.as_secs_f64();

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(time: &mut TimeState) -> u32 {
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn no_step_before_a_full_tick_accumulates() {
        let mut time = TimeState::new(60);
        time.advance(Duration::from_millis(10));
        assert_eq!(drain(&mut time), 0);
        time.advance(Duration::from_millis(10));
        assert_eq!(drain(&mut time), 1);
    }

    #[test]
    fn long_frame_runs_multiple_ticks() {
        let mut time = TimeState::new(60);
        time.advance(Duration::from_millis(55));
        assert_eq!(drain(&mut time), 3);
        assert_eq!(time.steps_this_frame, 3);
        assert_eq!(time.fixed_step_count, 3);
    }

    #[test]
    fn huge_frame_is_capped() {
        let mut time = TimeState::new(60);
        time.advance(Duration::from_secs(5));
        // 0.25s cap at 60 Hz is 15 ticks, give or take float rounding.
        let steps = drain(&mut time);
        assert!((14..=15).contains(&steps), "got {steps} steps");
    }

    #[test]
    fn tick_rate_change_applies_to_following_frames() {
        let mut time = TimeState::new(60);
        time.advance(Duration::from_millis(10));
        time.set_tick_rate(30);
        assert_eq!(time.tick_rate_hz(), 30);
        // 10ms carried over plus 30ms covers one 33.3ms tick.
        time.advance(Duration::from_millis(30));
        assert_eq!(drain(&mut time), 1);
        time.advance(Duration::from_millis(100));
        assert_eq!(drain(&mut time), 3);
    }

    #[test]
    fn zero_tick_rate_is_treated_as_one_hz() {
        let mut time = TimeState::new(60);
        time.set_tick_rate(0);
        assert_eq!(time.fixed_dt, 1.0);
    }

    #[test]
    fn steps_this_frame_resets_each_frame() {
        let mut time = TimeState::new(60);
        time.advance(Duration::from_millis(34));
        drain(&mut time);
        time.advance(Duration::from_millis(1));
        assert_eq!(time.steps_this_frame, 0);
        assert_eq!(time.frame_count, 2);
    }
}
