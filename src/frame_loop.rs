//! Frame loop state machine and frame clock.
//!
//! The per-frame callback is cooperative: the host asks [`FrameLoop::should_run`]
//! after each frame and only then schedules the next one. Tests drive the same
//! state machine by calling the frame function directly, with a
//! [`FrameClock`] on a fixed delta instead of wall-clock time.
//!
//! ```text
//! Idle --start--> Running --stop--> Stopped
//!   \______________stop_______________/
//! ```

use std::time::{Duration, Instant};

/// Lifecycle of a frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Created but never started.
    #[default]
    Idle,
    /// Scheduling a frame after every frame.
    Running,
    /// Torn down. Terminal.
    Stopped,
}

/// Start/stop state machine for a self-rescheduling frame callback.
#[derive(Debug, Default)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. Only valid from `Idle`; returns whether it started.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            true
        } else {
            false
        }
    }

    /// Stop the loop permanently.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the host should schedule another frame.
    #[inline]
    pub fn should_run(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Count a completed frame. Returns `false` (and counts nothing) unless running.
    pub fn record_frame(&mut self) -> bool {
        if self.should_run() {
            self.frames += 1;
            true
        } else {
            false
        }
    }

    /// Frames completed while running.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Frame timing: elapsed time, delta, frame count and an FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    elapsed: f64,
    delta: f32,
    frame: u64,
    fps: f32,
    fps_window_start: f64,
    fps_window_frames: u64,
    fixed_delta: Option<f32>,
}

const FPS_WINDOW_SECS: f64 = 0.5;

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
            frame: 0,
            fps: 0.0,
            fps_window_start: 0.0,
            fps_window_frames: 0,
            fixed_delta: None,
        }
    }

    /// A clock that advances by exactly `delta` seconds per update.
    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta.max(0.0)),
            ..Self::new()
        }
    }

    /// Advance to the current frame, using wall-clock time unless a fixed
    /// delta is set. Returns the delta in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;
        let dt = self.fixed_delta.unwrap_or(raw.as_secs_f32());
        self.advance(dt)
    }

    /// Advance by an explicit delta.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt as f64;
        self.frame += 1;

        self.fps_window_frames += 1;
        let window = self.elapsed - self.fps_window_start;
        if window >= FPS_WINDOW_SECS {
            self.fps = (self.fps_window_frames as f64 / window) as f32;
            self.fps_window_start = self.elapsed;
            self.fps_window_frames = 0;
        }
        dt
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds since the clock started, as `f32` for animation maths.
    #[inline]
    pub fn now(&self) -> f32 {
        self.elapsed as f32
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn delta_duration(&self) -> Duration {
        Duration::from_secs_f32(self.delta)
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_transitions() {
        let mut lp = FrameLoop::new();
        assert_eq!(lp.state(), LoopState::Idle);
        assert!(!lp.should_run());

        assert!(lp.start());
        assert!(lp.should_run());
        assert!(!lp.start(), "starting twice is rejected");

        lp.stop();
        assert_eq!(lp.state(), LoopState::Stopped);
        assert!(!lp.start(), "stopped is terminal");
    }

    #[test]
    fn test_idle_can_stop_directly() {
        let mut lp = FrameLoop::new();
        lp.stop();
        assert_eq!(lp.state(), LoopState::Stopped);
    }

    #[test]
    fn test_frames_only_counted_while_running() {
        let mut lp = FrameLoop::new();
        assert!(!lp.record_frame());
        lp.start();
        assert!(lp.record_frame());
        assert!(lp.record_frame());
        lp.stop();
        assert!(!lp.record_frame());
        assert_eq!(lp.frames(), 2);
    }

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        for _ in 0..60 {
            clock.update();
        }
        assert_eq!(clock.frame(), 60);
        assert!((clock.elapsed() - 1.0).abs() < 1e-4);
        assert!((clock.fps() - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_advance_ignores_bad_deltas() {
        let mut clock = FrameClock::new();
        clock.advance(f32::NAN);
        clock.advance(-1.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 2);
    }
}
