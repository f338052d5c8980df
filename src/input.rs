//! Scroll tracking: turns wheel input into a normalized progress signal.
//!
//! The vignette is driven by one number — how far the viewer has scrolled
//! through the experience, from 0 to 1. [`ScrollTracker`] accumulates winit
//! wheel events into that signal; the camera rig and anything else that
//! cares read it once per frame.

use winit::event::{MouseScrollDelta, WindowEvent};

/// Accumulates scroll-wheel travel into a clamped [0, 1] progress value.
pub struct ScrollTracker {
    travelled: f32,
    full_range: f32,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl ScrollTracker {
    /// A tracker whose progress reaches 1.0 after `full_range_lines` wheel
    /// lines of downward scrolling.
    pub fn new(full_range_lines: f32) -> Self {
        assert!(full_range_lines > 0.0, "scroll range must be positive");
        Self {
            travelled: 0.0,
            full_range: full_range_lines,
        }
    }

    /// Feeds a window event; non-wheel events are ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let lines = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                // Typical OS pixel-per-line ratio.
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
            };
            self.scroll_by(lines);
        }
    }

    /// Applies wheel travel directly. Wheel-down reports negative line
    /// deltas and moves progress forward.
    pub fn scroll_by(&mut self, lines: f32) {
        self.travelled = (self.travelled - lines).clamp(0.0, self.full_range);
    }

    /// Current progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.travelled / self.full_range
    }

    /// Jumps directly to a progress value (clamped).
    pub fn set_progress(&mut self, progress: f32) {
        self.travelled = progress.clamp(0.0, 1.0) * self.full_range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(ScrollTracker::default().progress(), 0.0);
    }

    #[test]
    fn wheel_down_accumulates_forward() {
        let mut tracker = ScrollTracker::new(10.0);
        tracker.scroll_by(-1.0);
        tracker.scroll_by(-1.0);
        assert!((tracker.progress() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn progress_clamps_at_both_ends() {
        let mut tracker = ScrollTracker::new(10.0);
        tracker.scroll_by(-100.0);
        assert_eq!(tracker.progress(), 1.0);
        tracker.scroll_by(100.0);
        assert_eq!(tracker.progress(), 0.0);
    }

    #[test]
    fn scrolling_back_reverses() {
        let mut tracker = ScrollTracker::new(10.0);
        tracker.scroll_by(-6.0);
        tracker.scroll_by(2.0);
        assert!((tracker.progress() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn set_progress_clamps() {
        let mut tracker = ScrollTracker::new(10.0);
        tracker.set_progress(1.7);
        assert_eq!(tracker.progress(), 1.0);
        tracker.set_progress(-0.5);
        assert_eq!(tracker.progress(), 0.0);
    }
}
